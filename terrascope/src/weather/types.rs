//! Weather data types and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the weather and geocoding passthroughs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("query must not be empty")]
    EmptyQuery,

    /// Non-success HTTP status from the upstream API.
    #[error("{api} API error: {status} {reason}")]
    Upstream {
        api: &'static str,
        status: u16,
        reason: String,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Current conditions at a point, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Degrees Celsius, rounded.
    pub temperature: i64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Km/h, rounded.
    pub wind_speed: i64,
    /// Degrees from north.
    pub wind_direction: f64,
    /// Cloud cover in percent.
    pub cloud_cover: f64,
    pub weather: String,
    pub description: String,
    pub icon: String,
}

/// One candidate location for a geocoding query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub name: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl GeocodeResult {
    pub fn new(name: String, country: String, state: Option<String>, lat: f64, lon: f64) -> Self {
        let display_name = match &state {
            Some(state) => format!("{}, {}, {}", name, state, country),
            None => format!("{}, {}", name, country),
        };
        Self {
            name,
            country,
            state,
            lat,
            lon,
            display_name,
        }
    }
}

// Upstream payloads. Only the fields that are read are declared.

#[derive(Debug, Deserialize)]
pub(crate) struct RawCurrent {
    pub main: RawMain,
    #[serde(default)]
    pub wind: Option<RawWind>,
    #[serde(default)]
    pub clouds: Option<RawClouds>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMain {
    pub temp: f64,
    #[serde(default)]
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawWind {
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawClouds {
    #[serde(default)]
    pub all: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCondition {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl From<RawCurrent> for WeatherReport {
    fn from(raw: RawCurrent) -> Self {
        let wind_ms = raw.wind.as_ref().and_then(|w| w.speed).unwrap_or(0.0);
        let (main, description, icon) = match raw.weather.into_iter().next() {
            Some(c) => (non_empty(c.main), non_empty(c.description), non_empty(c.icon)),
            None => (None, None, None),
        };

        Self {
            temperature: raw.main.temp.round() as i64,
            humidity: raw.main.humidity,
            wind_speed: (wind_ms * 3.6).round() as i64,
            wind_direction: raw.wind.as_ref().and_then(|w| w.deg).unwrap_or(0.0),
            cloud_cover: raw.clouds.and_then(|c| c.all).unwrap_or(0.0),
            weather: main.unwrap_or_else(|| "Clear".to_string()),
            description: description.unwrap_or_default(),
            icon: icon.unwrap_or_else(|| "01d".to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<RawPlace> for GeocodeResult {
    fn from(raw: RawPlace) -> Self {
        let state = non_empty(raw.state);
        GeocodeResult::new(raw.name, raw.country, state, raw.lat, raw.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_full_payload() {
        let raw: RawCurrent = serde_json::from_str(
            r#"{
                "main": {"temp": 18.6, "humidity": 72},
                "wind": {"speed": 5.0, "deg": 270},
                "clouds": {"all": 40},
                "weather": [{"main": "Clouds", "description": "scattered clouds", "icon": "03d"}]
            }"#,
        )
        .unwrap();

        let report = WeatherReport::from(raw);
        assert_eq!(report.temperature, 19);
        assert_eq!(report.humidity, 72.0);
        assert_eq!(report.wind_speed, 18);
        assert_eq!(report.wind_direction, 270.0);
        assert_eq!(report.cloud_cover, 40.0);
        assert_eq!(report.weather, "Clouds");
        assert_eq!(report.description, "scattered clouds");
        assert_eq!(report.icon, "03d");
    }

    #[test]
    fn test_report_defaults_for_missing_fields() {
        let raw: RawCurrent =
            serde_json::from_str(r#"{"main": {"temp": -0.4, "humidity": 90}}"#).unwrap();

        let report = WeatherReport::from(raw);
        assert_eq!(report.temperature, 0);
        assert_eq!(report.wind_speed, 0);
        assert_eq!(report.wind_direction, 0.0);
        assert_eq!(report.cloud_cover, 0.0);
        assert_eq!(report.weather, "Clear");
        assert_eq!(report.description, "");
        assert_eq!(report.icon, "01d");
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let raw: RawCurrent = serde_json::from_str(r#"{"main": {"temp": 10}}"#).unwrap();
        let json = serde_json::to_value(WeatherReport::from(raw)).unwrap();
        assert!(json.get("windSpeed").is_some());
        assert!(json.get("cloudCover").is_some());
    }

    #[test]
    fn test_display_name_with_and_without_state() {
        let with_state: GeocodeResult = serde_json::from_str::<RawPlace>(
            r#"{"name": "Portland", "country": "US", "state": "Oregon", "lat": 45.5, "lon": -122.6}"#,
        )
        .unwrap()
        .into();
        assert_eq!(with_state.display_name, "Portland, Oregon, US");

        let without_state: GeocodeResult = serde_json::from_str::<RawPlace>(
            r#"{"name": "Paris", "country": "FR", "lat": 48.85, "lon": 2.35}"#,
        )
        .unwrap()
        .into();
        assert_eq!(without_state.display_name, "Paris, FR");
        assert!(without_state.state.is_none());
    }

    #[test]
    fn test_upstream_error_message() {
        let err = WeatherError::Upstream {
            api: "OpenWeatherMap",
            status: 401,
            reason: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "OpenWeatherMap API error: 401 Unauthorized");
    }
}
