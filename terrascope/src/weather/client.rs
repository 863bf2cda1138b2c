//! OpenWeatherMap client.

use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{GeocodeResult, RawCurrent, RawPlace, WeatherError, WeatherReport};
use crate::coord::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Default OpenWeatherMap API root.
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// Placeholder key used when none is configured. Upstream calls made with it
/// are rejected, which surfaces as a normal passthrough failure.
pub const DEMO_API_KEY: &str = "demo";

/// Maximum number of geocoding candidates requested.
pub const GEOCODE_LIMIT: u32 = 5;

/// Client for current-weather and direct-geocoding lookups.
#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current conditions at `(lat, lon)`.
    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) || !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(WeatherError::InvalidCoordinates { lat, lon });
        }

        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = lat.to_string();
        let lon = lon.to_string();
        let raw: RawCurrent = self
            .get_json(
                "OpenWeatherMap",
                &url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        Ok(raw.into())
    }

    /// Up to [`GEOCODE_LIMIT`] places matching `query`.
    pub async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        let url = format!("{}/geo/1.0/direct", self.base_url);
        let limit = GEOCODE_LIMIT.to_string();
        let raw: Vec<RawPlace> = self
            .get_json(
                "Geocoding",
                &url,
                &[
                    ("q", query),
                    ("limit", limit.as_str()),
                    ("appid", self.api_key.as_str()),
                ],
            )
            .await?;

        Ok(raw.into_iter().map(GeocodeResult::from).collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        api: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        debug!(api, url, "Calling weather API");

        // without_url keeps the api key out of error messages
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Upstream {
                api,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.without_url().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WeatherClient {
        WeatherClient::new(reqwest::Client::new(), "http://localhost:1/", "key")
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "http://localhost:1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", WeatherClient::new(reqwest::Client::new(), "http://x", "s3cret"));
        assert!(!debug.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_rejected() {
        let err = client().current(95.0, 0.0).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCoordinates { .. }));

        let err = client().current(f64::NAN, 0.0).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCoordinates { .. }));
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        assert_eq!(client().geocode("   ").await.unwrap_err(), WeatherError::EmptyQuery);
    }
}
