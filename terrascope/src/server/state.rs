//! Shared handler state.

use std::sync::Arc;

use crate::imagery::ImageryOrchestrator;
use crate::preferences::PreferencesStore;
use crate::weather::WeatherClient;

/// State handed to every route. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ImageryOrchestrator,
    pub weather: WeatherClient,
    pub preferences: Arc<dyn PreferencesStore>,
}

impl AppState {
    pub fn new(
        orchestrator: ImageryOrchestrator,
        weather: WeatherClient,
        preferences: Arc<dyn PreferencesStore>,
    ) -> Self {
        Self {
            orchestrator,
            weather,
            preferences,
        }
    }
}
