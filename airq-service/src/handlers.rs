//! HTTP request handlers for the air quality service.

use std::any::Any;
use std::sync::Arc;

use airq::{normalize, AirQualityError, AirQualityResult, Coordinates};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

const MISSING_PARAMS: &str = "lat and lon parameters are required";

/// API version reported by `GET /`, independent of the crate version.
pub const API_VERSION: &str = "1.0.0";

/// Query parameters for the air quality endpoint.
///
/// Both are kept as raw strings so that missing, empty and non-numeric
/// values can be told apart and reported with the right message.
#[derive(Debug, Default, Deserialize)]
pub struct AirQualityQuery {
    /// Latitude in decimal degrees (-90 to 90).
    pub lat: Option<String>,
    /// Longitude in decimal degrees (-180 to 180).
    pub lon: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

/// Service status response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `ok`.
    pub status: String,
    /// Service name.
    pub message: String,
    /// Service version.
    pub version: String,
}

/// An [`AirQualityError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AirQualityError);

impl From<AirQualityError> for ApiError {
    fn from(err: AirQualityError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, kind = ?self.0.kind(), "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        (status, Json(ErrorResponse::new("API Error", self.0.to_string()))).into_response()
    }
}

/// Service status.
///
/// Answers independently of upstream health.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: "Air Quality API".to_string(),
        version: API_VERSION.to_string(),
    })
}

/// Get current air quality for given coordinates.
///
/// # Query Parameters
///
/// - `lat`: Latitude in decimal degrees (-90 to 90)
/// - `lon`: Longitude in decimal degrees (-180 to 180)
///
/// # Returns
///
/// - `200 OK` with the normalized reading
/// - `400 Bad Request` if parameters are missing or invalid
/// - `502 Bad Gateway` if the provider answered with an unusable payload
/// - `503 Service Unavailable` if the provider could not be reached
/// - `504 Gateway Timeout` if the provider did not answer in time
#[axum::debug_handler]
pub async fn get_air_quality(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AirQualityQuery>, QueryRejection>,
) -> Result<Json<AirQualityResult>, ApiError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!(error = %e, "Unparsable query string");
        AirQualityError::invalid_input(MISSING_PARAMS)
    })?;

    let (lat, lon) = match (query.lat.as_deref(), query.lon.as_deref()) {
        (Some(lat), Some(lon)) if !lat.is_empty() && !lon.is_empty() => (lat, lon),
        _ => return Err(AirQualityError::invalid_input(MISSING_PARAMS).into()),
    };

    tracing::debug!(lat = lat, lon = lon, "Air quality query");

    let coords = Coordinates::parse(lat, lon)?;
    let feed = state.client.fetch(coords.lat, coords.lon).await?;
    let result = normalize(&feed);

    tracing::info!(
        lat = coords.lat,
        lon = coords.lon,
        aqi = %result.aqi,
        location = %result.location,
        pollutants = result.pollutants.len(),
        "Air quality found"
    );

    Ok(Json(result))
}

/// Fallback for unknown routes and unsupported methods.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not Found", "route not found")),
    )
}

/// Turn a panic inside a handler into a generic 500 response.
///
/// The panic payload is logged and never sent to the caller.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Unhandled error");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(
            "Internal Server Error",
            "an internal server error occurred",
        )),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_query_deserialize() {
        let json = r#"{"lat": "35.5", "lon": "138.7"}"#;
        let query: AirQualityQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.lat.as_deref(), Some("35.5"));
        assert_eq!(query.lon.as_deref(), Some("138.7"));

        let query: AirQualityQuery = serde_json::from_str("{}").unwrap();
        assert!(query.lat.is_none());
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let response = ApiError(AirQualityError::UpstreamTimeout).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let json = body_json(response).await;
        assert_eq!(json["error"], "API Error");
        assert_eq!(json["message"], "timed out fetching data from upstream API");
    }

    #[tokio::test]
    async fn test_api_error_statuses() {
        let cases = [
            (AirQualityError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (AirQualityError::upstream_protocol("bad"), StatusCode::BAD_GATEWAY),
            (AirQualityError::UpstreamUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (AirQualityError::internal("bad"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_panic_is_mapped_to_internal_error() {
        async fn boom() -> &'static str {
            panic!("database password is hunter2")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response.into_response()).await;
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "an internal server error occurred");
        assert!(!json.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, Json(body)) = not_found().await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "route not found");
    }

    #[tokio::test]
    async fn test_root_payload() {
        let Json(body) = root().await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.message, "Air Quality API");
        assert_eq!(body.version, "1.0.0");
        assert_eq!(API_VERSION, "1.0.0");
    }
}
