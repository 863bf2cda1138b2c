//! Static lookup table from layer id to rendering parameters.

use std::fmt;

use serde::Serialize;

use super::evalscripts;

/// Layer id used when a client has not chosen one.
pub const DEFAULT_LAYER_ID: &str = "TRUE_COLOR";

/// Source collection a layer renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSource {
    /// Sentinel-2 Level-2A (bottom-of-atmosphere reflectance).
    #[serde(rename = "sentinel-2-l2a")]
    Sentinel2L2a,
}

impl DataSource {
    /// Identifier the processing API expects in `input.data[].type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Sentinel2L2a => "sentinel-2-l2a",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named rendering configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub data_source: DataSource,
    #[serde(skip)]
    pub evalscript: &'static str,
}

const BUILTIN_LAYERS: &[Layer] = &[
    Layer {
        id: "TRUE_COLOR",
        name: "True Color",
        description: "Natural color imagery",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::TRUE_COLOR,
    },
    Layer {
        id: "VEGETATION_INDEX",
        name: "NDVI (Vegetation)",
        description: "Vegetation health index",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::VEGETATION_INDEX,
    },
    Layer {
        id: "AGRICULTURE",
        name: "Agriculture",
        description: "Agricultural monitoring",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::AGRICULTURE,
    },
    Layer {
        id: "COLOR_INFRARED",
        name: "Color Infrared",
        description: "False color vegetation",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::COLOR_INFRARED,
    },
    Layer {
        id: "COLOR_INFRARED_URBAN_",
        name: "False Color (Urban)",
        description: "Urban false color",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::COLOR_INFRARED_URBAN,
    },
    Layer {
        id: "GEOLOGY",
        name: "Geology",
        description: "Geological features",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::GEOLOGY,
    },
    Layer {
        id: "MOISTURE_INDEX",
        name: "Moisture Index",
        description: "Surface moisture levels",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::MOISTURE_INDEX,
    },
    Layer {
        id: "SWIR",
        name: "SWIR",
        description: "Short-wave infrared",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::SWIR,
    },
    Layer {
        id: "ATMOSPHERIC_PENETRATION",
        name: "Atmospheric Penetration",
        description: "Atmospheric clarity",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::ATMOSPHERIC_PENETRATION,
    },
    Layer {
        id: "BATHYMETRIC",
        name: "Bathymetric",
        description: "Water depth visualization",
        data_source: DataSource::Sentinel2L2a,
        evalscript: evalscripts::BATHYMETRIC,
    },
];

/// Read-only registry of the layers this service can render.
///
/// Lookups are exact and case-sensitive. Unknown ids are the caller's problem
/// to report; the registry never substitutes a fallback layer.
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    layers: &'static [Layer],
}

impl LayerRegistry {
    /// Registry containing the built-in Sentinel-2 layers.
    pub fn builtin() -> Self {
        Self {
            layers: BUILTIN_LAYERS,
        }
    }

    /// Looks up a layer by id.
    pub fn get(&self, id: &str) -> Option<&'static Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Returns true if the id names a registered layer.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterates layers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_ten_layers() {
        let registry = LayerRegistry::builtin();
        assert_eq!(registry.len(), 10);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_default_layer_registered() {
        let registry = LayerRegistry::builtin();
        let layer = registry.get(DEFAULT_LAYER_ID).unwrap();
        assert_eq!(layer.name, "True Color");
        assert_eq!(layer.data_source, DataSource::Sentinel2L2a);
        assert!(layer.evalscript.starts_with("//VERSION=3"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = LayerRegistry::builtin();
        assert!(registry.contains("SWIR"));
        assert!(!registry.contains("swir"));
        assert!(!registry.contains("NONEXISTENT"));
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = LayerRegistry::builtin();
        let mut ids: Vec<_> = registry.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn test_serialization_omits_evalscript() {
        let registry = LayerRegistry::builtin();
        let json = serde_json::to_value(registry.get("GEOLOGY").unwrap()).unwrap();
        assert_eq!(json["id"], "GEOLOGY");
        assert_eq!(json["name"], "Geology");
        assert!(json.get("evalscript").is_none());
        assert!(json.get("data_source").is_none());
    }

    #[test]
    fn test_data_source_display() {
        assert_eq!(DataSource::Sentinel2L2a.to_string(), "sentinel-2-l2a");
    }
}
