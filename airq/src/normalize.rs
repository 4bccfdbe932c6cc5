//! Reshaping of the WAQI feed into the public air quality model.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::client::FeedData;

/// Pollutant codes that are reported, with their measurement units.
///
/// Any other `iaqi` key (weather readings such as `t`, `h`, `p`, `w`) is
/// not a pollutant and is left out of [`AirQualityResult::pollutants`].
pub const POLLUTANT_UNITS: [(&str, &str); 6] = [
    ("pm25", "µg/m³"),
    ("pm10", "µg/m³"),
    ("o3", "µg/m³"),
    ("co", "ppm"),
    ("so2", "µg/m³"),
    ("no2", "µg/m³"),
];

const TEMPERATURE_KEY: &str = "t";
const HUMIDITY_KEY: &str = "h";

/// Look up the unit of a known pollutant code.
pub fn unit_for(code: &str) -> Option<&'static str> {
    POLLUTANT_UNITS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, unit)| *unit)
}

/// Normalized air quality for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityResult {
    /// Composite air quality index.
    pub aqi: Number,
    /// Name of the monitoring station.
    pub location: String,
    /// Code of the pollutant driving the index.
    pub dominant_pollutant: String,
    /// ISO-8601 timestamp of the measurement.
    pub last_update: String,
    /// Known pollutants in upstream order.
    pub pollutants: Vec<Pollutant>,
    /// Weather readings reported alongside the pollutants.
    pub weather: Weather,
}

/// A single pollutant reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pollutant {
    /// Pollutant code, e.g. `pm25`.
    pub id: String,
    /// Individual AQI value.
    pub value: Number,
    /// Unit from [`POLLUTANT_UNITS`].
    pub unit: String,
}

/// Weather readings; absent readings serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature: Option<Number>,
    pub humidity: Option<Number>,
}

/// Build the public result from a validated feed.
///
/// Pollutants keep the key order of the upstream `iaqi` object. Entries
/// without a numeric `v` are skipped.
pub fn normalize(feed: &FeedData) -> AirQualityResult {
    let pollutants = feed
        .iaqi
        .iter()
        .filter_map(|(code, entry)| {
            let unit = unit_for(code)?;
            let value = reading(entry)?;
            Some(Pollutant {
                id: code.clone(),
                value,
                unit: unit.to_string(),
            })
        })
        .collect();

    let weather = Weather {
        temperature: feed.iaqi.get(TEMPERATURE_KEY).and_then(reading),
        humidity: feed.iaqi.get(HUMIDITY_KEY).and_then(reading),
    };

    AirQualityResult {
        aqi: feed.aqi.clone(),
        location: feed.city.name.clone(),
        dominant_pollutant: feed.dominentpol.clone(),
        last_update: feed.time.iso.clone(),
        pollutants,
        weather,
    }
}

/// Numeric `v` of an `iaqi` entry.
///
/// Narrower than a raw passthrough of `v`: strings, nulls and missing
/// values yield `None`, which drops the pollutant or nulls the weather field.
fn reading(entry: &Value) -> Option<Number> {
    match entry.get("v") {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed(iaqi: Value) -> FeedData {
        serde_json::from_value(json!({
            "aqi": 50,
            "city": { "name": "X" },
            "dominentpol": "pm25",
            "time": { "iso": "2024-01-01T00:00:00Z" },
            "iaqi": iaqi,
        }))
        .unwrap()
    }

    #[test]
    fn test_unit_for() {
        assert_eq!(unit_for("pm25"), Some("µg/m³"));
        assert_eq!(unit_for("co"), Some("ppm"));
        assert_eq!(unit_for("t"), None);
        assert_eq!(unit_for("PM25"), None);
    }

    #[test]
    fn test_normalize_basic() {
        let result = normalize(&feed(json!({
            "pm25": { "v": 42 },
            "t": { "v": 25 },
            "h": { "v": 60 },
        })));

        assert_eq!(result.aqi, Number::from(50));
        assert_eq!(result.location, "X");
        assert_eq!(result.dominant_pollutant, "pm25");
        assert_eq!(result.last_update, "2024-01-01T00:00:00Z");
        assert_eq!(
            result.pollutants,
            vec![Pollutant {
                id: "pm25".to_string(),
                value: Number::from(42),
                unit: "µg/m³".to_string(),
            }]
        );
        assert_eq!(result.weather.temperature, Some(Number::from(25)));
        assert_eq!(result.weather.humidity, Some(Number::from(60)));
    }

    #[test]
    fn test_normalize_preserves_upstream_order() {
        let result = normalize(&feed(json!({
            "so2": { "v": 1.5 },
            "w": { "v": 3 },
            "co": { "v": 0.4 },
            "pm10": { "v": 17 },
            "no2": { "v": 9 },
        })));

        let ids: Vec<&str> = result.pollutants.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["so2", "co", "pm10", "no2"]);
        assert_eq!(result.pollutants[1].unit, "ppm");
    }

    #[test]
    fn test_normalize_missing_weather() {
        let result = normalize(&feed(json!({ "o3": { "v": 12 } })));
        assert_eq!(result.weather.temperature, None);
        assert_eq!(result.weather.humidity, None);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["weather"], json!({ "temperature": null, "humidity": null }));
    }

    #[test]
    fn test_normalize_skips_non_numeric_readings() {
        let result = normalize(&feed(json!({
            "pm25": { "v": "-" },
            "pm10": {},
            "t": { "v": null },
        })));
        assert!(result.pollutants.is_empty());
        assert_eq!(result.weather.temperature, None);
    }

    #[test]
    fn test_serialized_field_names() {
        let result = normalize(&feed(json!({ "pm25": { "v": 42 } })));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"dominantPollutant\":\"pm25\""));
        assert!(json.contains("\"lastUpdate\":\"2024-01-01T00:00:00Z\""));
        assert!(json.contains("\"aqi\":50,"));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let data = feed(json!({ "pm25": { "v": 42 }, "t": { "v": 25 } }));
        let first = serde_json::to_vec(&normalize(&data)).unwrap();
        let second = serde_json::to_vec(&normalize(&data)).unwrap();
        assert_eq!(first, second);
    }
}
