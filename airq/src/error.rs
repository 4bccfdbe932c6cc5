//! Error types for the airq library.

use thiserror::Error;

/// Coarse classification of an [`AirQualityError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent missing or malformed input.
    InvalidInput,
    /// The provider answered, but not with a usable feed.
    UpstreamProtocol,
    /// The provider did not answer in time.
    UpstreamTimeout,
    /// No response was received from the provider at all.
    UpstreamUnavailable,
    /// Anything not anticipated by the other kinds.
    Internal,
}

/// Errors that can occur while resolving air quality for a coordinate.
///
/// The `Display` output is the message handed back to API callers, so it
/// must never carry transport details or upstream payload fragments.
#[derive(Error, Debug)]
pub enum AirQualityError {
    /// Query parameters were missing, unparsable or out of range.
    #[error("{message}")]
    InvalidInput { message: String },

    /// The provider responded with a bad status, a non-2xx code or an
    /// incomplete payload.
    #[error("{message}")]
    UpstreamProtocol { message: String },

    /// The provider did not respond within the configured timeout.
    #[error("timed out fetching data from upstream API")]
    UpstreamTimeout,

    /// The provider could not be reached (refused connection, DNS failure).
    #[error("upstream API is unavailable")]
    UpstreamUnavailable,

    /// Unclassified failure.
    #[error("{message}")]
    Internal { message: String },
}

impl AirQualityError {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new upstream protocol error.
    pub fn upstream_protocol<S: Into<String>>(message: S) -> Self {
        Self::UpstreamProtocol {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::UpstreamProtocol { .. } => ErrorKind::UpstreamProtocol,
            Self::UpstreamTimeout => ErrorKind::UpstreamTimeout,
            Self::UpstreamUnavailable => ErrorKind::UpstreamUnavailable,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// HTTP status code this error should be reported with.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 400,
            ErrorKind::UpstreamProtocol => 502,
            ErrorKind::UpstreamUnavailable => 503,
            ErrorKind::UpstreamTimeout => 504,
            ErrorKind::Internal => 500,
        }
    }
}

/// Result type alias using [`AirQualityError`].
pub type Result<T> = std::result::Result<T, AirQualityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AirQualityError::invalid_input("latitude must be between -90 and 90");
        assert_eq!(err.to_string(), "latitude must be between -90 and 90");

        let err = AirQualityError::UpstreamTimeout;
        assert!(err.to_string().contains("timed out"));

        let err = AirQualityError::UpstreamUnavailable;
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AirQualityError::invalid_input("x").status_code(), 400);
        assert_eq!(AirQualityError::upstream_protocol("x").status_code(), 502);
        assert_eq!(AirQualityError::UpstreamUnavailable.status_code(), 503);
        assert_eq!(AirQualityError::UpstreamTimeout.status_code(), 504);
        assert_eq!(AirQualityError::internal("x").status_code(), 500);
    }

    #[test]
    fn test_kind() {
        assert_eq!(
            AirQualityError::upstream_protocol("bad").kind(),
            ErrorKind::UpstreamProtocol
        );
        assert_eq!(AirQualityError::internal("oops").kind(), ErrorKind::Internal);
    }
}
