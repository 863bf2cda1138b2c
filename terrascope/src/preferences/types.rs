//! Preferences record, patch, and store trait.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::layer::DEFAULT_LAYER_ID;

/// Numeric user identifier as it appears in the URL.
pub type UserId = i64;

pub const DEFAULT_CENTER_LAT: f64 = 37.7749;
pub const DEFAULT_CENTER_LNG: f64 = -122.4194;
pub const DEFAULT_ZOOM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferencesError {
    #[error("preferences backend error: {0}")]
    Backend(String),
}

/// Stored preferences for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPreferences {
    pub id: u64,
    pub user_id: UserId,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
    pub selected_layer: String,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub weather_overlays: Value,
    pub image_settings: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MapPreferences {
    /// A record with every field at its default.
    pub fn with_defaults(id: u64, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            center_lat: DEFAULT_CENTER_LAT,
            center_lng: DEFAULT_CENTER_LNG,
            zoom: DEFAULT_ZOOM,
            selected_layer: DEFAULT_LAYER_ID.to_string(),
            date_from: None,
            date_to: None,
            weather_overlays: Value::Object(Map::new()),
            image_settings: Value::Object(Map::new()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies every field present in `patch` and refreshes `updated_at`.
    pub fn apply(&mut self, patch: MapPreferencesUpdate, now: DateTime<Utc>) {
        if let Some(v) = patch.center_lat {
            self.center_lat = v;
        }
        if let Some(v) = patch.center_lng {
            self.center_lng = v;
        }
        if let Some(v) = patch.zoom {
            self.zoom = v;
        }
        if let Some(v) = patch.selected_layer {
            self.selected_layer = v;
        }
        if let Some(v) = patch.date_from {
            self.date_from = v;
        }
        if let Some(v) = patch.date_to {
            self.date_to = v;
        }
        if let Some(v) = patch.weather_overlays {
            self.weather_overlays = v;
        }
        if let Some(v) = patch.image_settings {
            self.image_settings = v;
        }
        self.updated_at = now;
    }
}

/// Partial update. Absent fields are left unchanged; an explicit `null`
/// clears the nullable date fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPreferencesUpdate {
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub zoom: Option<f64>,
    pub selected_layer: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub date_from: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub date_to: Option<Option<String>>,
    pub weather_overlays: Option<Value>,
    pub image_settings: Option<Value>,
}

// Distinguishes `"field": null` (Some(None)) from a missing field (None).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Keyed preferences storage.
///
/// Implementations must be `Send + Sync`; the in-memory store is the only
/// one shipped, but a persistent backend plugs in behind the same calls.
pub trait PreferencesStore: Send + Sync {
    fn get(&self, user_id: UserId) -> BoxFuture<'_, Result<Option<MapPreferences>, PreferencesError>>;

    /// Merges `patch` into the user's record, creating a defaulted one first
    /// if none exists.
    fn update(
        &self,
        user_id: UserId,
        patch: MapPreferencesUpdate,
    ) -> BoxFuture<'_, Result<MapPreferences, PreferencesError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let prefs = MapPreferences::with_defaults(1, 7, Utc::now());
        assert_eq!(prefs.center_lat, 37.7749);
        assert_eq!(prefs.center_lng, -122.4194);
        assert_eq!(prefs.zoom, 10.0);
        assert_eq!(prefs.selected_layer, "TRUE_COLOR");
        assert_eq!(prefs.weather_overlays, json!({}));
        assert_eq!(prefs.created_at, prefs.updated_at);
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: MapPreferencesUpdate =
            serde_json::from_value(json!({"dateFrom": null, "zoom": 12})).unwrap();
        assert_eq!(patch.date_from, Some(None));
        assert_eq!(patch.date_to, None);
        assert_eq!(patch.zoom, Some(12.0));
    }

    #[test]
    fn test_apply_merges_fields() {
        let created = Utc::now();
        let mut prefs = MapPreferences::with_defaults(1, 7, created);
        prefs.date_to = Some("2024-06-01".to_string());

        let patch: MapPreferencesUpdate = serde_json::from_value(json!({
            "selectedLayer": "SWIR",
            "dateTo": null,
            "weatherOverlays": {"clouds": true}
        }))
        .unwrap();
        let later = created + chrono::Duration::seconds(5);
        prefs.apply(patch, later);

        assert_eq!(prefs.selected_layer, "SWIR");
        assert_eq!(prefs.date_to, None);
        assert_eq!(prefs.weather_overlays, json!({"clouds": true}));
        assert_eq!(prefs.zoom, 10.0);
        assert_eq!(prefs.updated_at, later);
        assert_eq!(prefs.created_at, created);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(MapPreferences::with_defaults(1, 7, Utc::now())).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["selectedLayer"], "TRUE_COLOR");
        assert!(json["dateFrom"].is_null());
    }
}
