//! Sentinel Hub evalscripts for the built-in layers.
//!
//! Each script reads a band combination from Sentinel-2 L2A scenes and emits
//! four output bands (RGBA).

pub(super) const TRUE_COLOR: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B02", "B03", "B04"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B04, sample.B03, sample.B02, 1];
}
"#;

pub(super) const VEGETATION_INDEX: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B04", "B08"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  let ndvi = (sample.B08 - sample.B04) / (sample.B08 + sample.B04);
  return colorBlend(ndvi, [0.0, 0.5, 1.0], [[1,0,0], [1,1,0], [0,1,0]], 1);
}
"#;

pub(super) const AGRICULTURE: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B03", "B04", "B11"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B11 * 3, sample.B04 * 3, sample.B03 * 3, 1];
}
"#;

pub(super) const COLOR_INFRARED: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B03", "B04", "B08"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B08, sample.B04, sample.B03, 1];
}
"#;

pub(super) const COLOR_INFRARED_URBAN: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B12", "B11", "B04"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B12 * 2.5, sample.B11 * 2.5, sample.B04 * 2.5, 1];
}
"#;

pub(super) const GEOLOGY: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B04", "B11", "B12"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B12 * 3, sample.B11 * 3, sample.B04 * 3, 1];
}
"#;

pub(super) const MOISTURE_INDEX: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B08", "B11"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  let ndmi = (sample.B08 - sample.B11) / (sample.B08 + sample.B11);
  return colorBlend(ndmi, [-1.0, 0.0, 1.0], [[0.8,0.4,0], [1,1,0.8], [0,0.4,1]], 1);
}
"#;

pub(super) const SWIR: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B11", "B12", "B04"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B12 * 3, sample.B11 * 3, sample.B04 * 3, 1];
}
"#;

pub(super) const ATMOSPHERIC_PENETRATION: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B12", "B11", "B04"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B12 * 3.5, sample.B11 * 3.5, sample.B04 * 3.5, 1];
}
"#;

pub(super) const BATHYMETRIC: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["B02", "B03", "B04"],
    output: { bands: 4 }
  };
}
function evaluatePixel(sample) {
  return [sample.B04 * 2, sample.B03 * 2, sample.B02 * 4, 1];
}
"#;
