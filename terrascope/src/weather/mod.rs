//! Weather and geocoding passthroughs.
//!
//! Thin single-shot proxies to OpenWeatherMap. Nothing is cached and nothing
//! is retried.

mod client;
mod types;

pub use client::{WeatherClient, DEFAULT_WEATHER_BASE_URL, DEMO_API_KEY, GEOCODE_LIMIT};
pub use types::{GeocodeResult, WeatherError, WeatherReport};
