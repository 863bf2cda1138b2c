//! Cache keys for imagery requests.
//!
//! # Key Format
//!
//! Keys are human-readable for debuggability:
//! `satellite:{w},{s},{e},{n}:{layer}:{width}x{height}:{from}:{to}:{cloud}`
//!
//! Example:
//! `satellite:-122.5,37.7,-122.3,37.8:TRUE_COLOR:512x512:2024-05-02T00:00:00Z:2024-06-01T23:59:59Z:any`
//!
//! Dates are the resolved window, so a request without dates maps to a new
//! key when the UTC day changes. The cloud filter is part of the key: imagery
//! fetched under a loose cloud limit must not satisfy a stricter one.

use std::fmt;

use super::request::ValidatedRequest;

/// Deterministic identity of a validated imagery request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of a validated request.
    pub fn of(request: &ValidatedRequest) -> Self {
        let cloud = match request.max_cloud_coverage {
            Some(value) => value.to_string(),
            None => "any".to_string(),
        };

        Self(format!(
            "satellite:{}:{}:{}x{}:{}:{}:{}",
            request.bbox,
            request.layer.id,
            request.width,
            request.height,
            request.window.start_str(),
            request.window.end_str(),
            cloud
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imagery::request::{validate, ImageryRequest};
    use crate::layer::LayerRegistry;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }

    fn fingerprint_at(request: &ImageryRequest, at: DateTime<Utc>) -> Fingerprint {
        let validated = validate(request, &LayerRegistry::builtin(), at).unwrap();
        Fingerprint::of(&validated)
    }

    fn fingerprint(request: &ImageryRequest) -> Fingerprint {
        fingerprint_at(request, now())
    }

    fn base() -> ImageryRequest {
        ImageryRequest::new([-122.5, 37.7, -122.3, 37.8], "TRUE_COLOR", 512, 512)
    }

    #[test]
    fn test_key_format() {
        let fp = fingerprint(&base());
        assert_eq!(
            fp.as_str(),
            "satellite:-122.5,37.7,-122.3,37.8:TRUE_COLOR:512x512:\
             2024-05-02T00:00:00Z:2024-06-01T23:59:59Z:any"
        );
    }

    #[test]
    fn test_key_format_with_cloud_limit() {
        let fp = fingerprint(&base().with_max_cloud_coverage(12.5));
        assert_eq!(
            fp.as_str(),
            "satellite:-122.5,37.7,-122.3,37.8:TRUE_COLOR:512x512:\
             2024-05-02T00:00:00Z:2024-06-01T23:59:59Z:12.5"
        );
    }

    #[test]
    fn test_cloud_coverage_in_key() {
        let loose = fingerprint(&base().with_max_cloud_coverage(80.0));
        let strict = fingerprint(&base().with_max_cloud_coverage(10.0));
        let unfiltered = fingerprint(&base());
        assert!(loose.as_str().ends_with(":80"));
        assert!(strict.as_str().ends_with(":10"));
        assert_ne!(loose, strict);
        assert_ne!(loose, unfiltered);
    }

    #[test]
    fn test_default_window_stable_within_day() {
        let morning = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 1).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 0).unwrap();
        assert_eq!(fingerprint_at(&base(), morning), fingerprint_at(&base(), evening));
    }

    #[test]
    fn test_default_window_changes_across_day_boundary() {
        let today = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 0).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2024, 6, 2, 0, 1, 0).unwrap();
        assert_ne!(fingerprint_at(&base(), today), fingerprint_at(&base(), tomorrow));
    }

    #[test]
    fn test_explicit_dates_independent_of_now() {
        let request = base().with_dates(Some("2024-01-01".into()), Some("2024-01-31".into()));
        let later = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(fingerprint(&request), fingerprint_at(&request, later));
    }

    #[test]
    fn test_date_only_and_expanded_forms_agree() {
        let short = base().with_dates(Some("2024-01-01".into()), Some("2024-01-31".into()));
        let long = base().with_dates(
            Some("2024-01-01T00:00:00Z".into()),
            Some("2024-01-31T23:59:59Z".into()),
        );
        assert_eq!(fingerprint(&short), fingerprint(&long));
    }

    #[test]
    fn test_each_field_changes_key() {
        let reference = fingerprint(&base());

        let mut r = base();
        r.bbox[0] = -122.6;
        assert_ne!(fingerprint(&r), reference);

        let mut r = base();
        r.layer = "SWIR".into();
        assert_ne!(fingerprint(&r), reference);

        let mut r = base();
        r.width = 513.0;
        assert_ne!(fingerprint(&r), reference);

        let mut r = base();
        r.height = 513.0;
        assert_ne!(fingerprint(&r), reference);

        let r = base().with_dates(Some("2024-05-01".into()), None);
        assert_ne!(fingerprint(&r), reference);

        let r = base().with_dates(None, Some("2024-05-30".into()));
        assert_ne!(fingerprint(&r), reference);
    }

    proptest! {
        #[test]
        fn prop_equal_requests_equal_fingerprints(
            west in -179.0f64..0.0,
            south in -89.0f64..0.0,
            span in 0.01f64..1.0,
            width in 100u32..=2048,
            height in 100u32..=2048,
        ) {
            let bbox = [west, south, west + span, south + span];
            let a = ImageryRequest::new(bbox, "GEOLOGY", width, height);
            let b = ImageryRequest::new(bbox, String::from("GEOLOGY"), width, height);
            prop_assert_eq!(fingerprint(&a), fingerprint(&b));
        }

        #[test]
        fn prop_width_change_changes_fingerprint(
            width in 100u32..2048,
        ) {
            let a = ImageryRequest::new([0.0, 0.0, 1.0, 1.0], "SWIR", width, 512);
            let b = ImageryRequest::new([0.0, 0.0, 1.0, 1.0], "SWIR", width + 1, 512);
            prop_assert_ne!(fingerprint(&a), fingerprint(&b));
        }
    }
}
