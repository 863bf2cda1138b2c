//! Per-user map preferences.
//!
//! A keyed record per user holding the last map view and overlay settings.
//! Updates merge field by field; the last write wins.

mod memory;
mod types;

pub use memory::InMemoryPreferencesStore;
pub use types::{
    MapPreferences, MapPreferencesUpdate, PreferencesError, PreferencesStore, UserId,
    DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_ZOOM,
};
