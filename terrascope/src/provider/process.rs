//! Sentinel Hub Processing API request body.
//!
//! ```json
//! {
//!   "input": {
//!     "bounds": { "bbox": [w, s, e, n], "properties": { "crs": "..." } },
//!     "data": [{ "type": "sentinel-2-l2a",
//!                "dataFilter": { "timeRange": { "from": "...", "to": "..." },
//!                                "maxCloudCoverage": 20 } }]
//!   },
//!   "output": { "width": 512, "height": 512,
//!               "responses": [{ "identifier": "default", "format": { "type": "image/png" } }] },
//!   "evalscript": "//VERSION=3 ..."
//! }
//! ```

use serde::Serialize;

use crate::coord::BoundingBox;
use crate::imagery::{ValidatedRequest, DEFAULT_CONTENT_TYPE};

/// CRS of the bounding box coordinates (WGS84 lon/lat).
pub const WGS84_CRS: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";

/// Full body of a processing call.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRequest {
    pub input: Input,
    pub output: Output,
    pub evalscript: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Input {
    pub bounds: Bounds,
    pub data: Vec<DataSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bounds {
    pub bbox: BoundingBox,
    pub properties: BoundsProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundsProperties {
    pub crs: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSpec {
    #[serde(rename = "type")]
    pub source: String,
    #[serde(rename = "dataFilter")]
    pub data_filter: DataFilter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFilter {
    pub time_range: TimeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cloud_coverage: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Output {
    pub width: u32,
    pub height: u32,
    pub responses: Vec<ResponseSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSpec {
    pub identifier: String,
    pub format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ProcessRequest {
    /// Builds the processing body for a validated request.
    pub fn new(request: &ValidatedRequest) -> Self {
        Self {
            input: Input {
                bounds: Bounds {
                    bbox: request.bbox,
                    properties: BoundsProperties {
                        crs: WGS84_CRS.to_string(),
                    },
                },
                data: vec![DataSpec {
                    source: request.layer.data_source.as_str().to_string(),
                    data_filter: DataFilter {
                        time_range: TimeRange {
                            from: request.window.start_str(),
                            to: request.window.end_str(),
                        },
                        max_cloud_coverage: request.max_cloud_coverage,
                    },
                }],
            },
            output: Output {
                width: request.width,
                height: request.height,
                responses: vec![ResponseSpec {
                    identifier: "default".to_string(),
                    format: ResponseFormat {
                        mime_type: DEFAULT_CONTENT_TYPE.to_string(),
                    },
                }],
            },
            evalscript: request.layer.evalscript.to_string(),
        }
    }
}
