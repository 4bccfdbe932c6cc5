//! # airq - Air Quality by Coordinates
//!
//! Looks up current air quality for a latitude/longitude pair from the
//! [World Air Quality Index](https://aqicn.org/api/) feed and reshapes the
//! provider's payload into a small, stable model.
//!
//! ## Quick Start
//!
//! ```ignore
//! use airq::{normalize, AqicnClient, Config, Coordinates};
//!
//! let config = Config::from_env();
//! let client = AqicnClient::new(&config)?;
//!
//! let coords = Coordinates::parse("-23.55", "-46.63")?;
//! let feed = client.fetch(coords.lat, coords.lon).await?;
//! let result = normalize(&feed);
//! println!("AQI {} at {}", result.aqi, result.location);
//! ```
//!
//! ## Pipeline
//!
//! 1. [`Coordinates::parse`] rejects non-numeric and out-of-range input.
//! 2. [`AqicnClient::fetch`] performs exactly one request and validates the envelope.
//! 3. [`normalize`] keeps the six known pollutants and the weather readings.
//!
//! Every failure is an [`AirQualityError`] carrying the HTTP status it maps to.

pub mod client;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod normalize;

// Re-export main types at crate root for convenience
pub use client::{AqicnClient, FeedData};
pub use config::Config;
pub use coordinates::Coordinates;
pub use error::{AirQualityError, ErrorKind, Result};
pub use normalize::{normalize, AirQualityResult, Pollutant, Weather, POLLUTANT_UNITS};
