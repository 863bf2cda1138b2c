//! Data-source time windows.
//!
//! Dates arrive as `YYYY-MM-DD` or RFC 3339 strings. Both are normalised to
//! whole-second UTC timestamps so equal windows always render identically.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use super::error::ValidationError;

/// Length of the trailing window used when no start date is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Which end of the window a date string belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    From,
    To,
}

impl Bound {
    fn field(self) -> &'static str {
        match self {
            Bound::From => "dateFrom",
            Bound::To => "dateTo",
        }
    }

    /// Time of day a date-only value expands to.
    fn time_of_day(self) -> NaiveTime {
        match self {
            Bound::From => NaiveTime::default(),
            Bound::To => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default(),
        }
    }

    fn expand(self, date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_time(self.time_of_day()))
    }
}

/// Inclusive time range of source scenes to render from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeWindow {
    /// Resolves optional client dates against `now`.
    ///
    /// A missing start defaults to 30 days before `now` at 00:00:00Z; a missing
    /// end defaults to the day of `now` at 23:59:59Z. Each side defaults
    /// independently.
    pub fn resolve(
        date_from: Option<&str>,
        date_to: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let today = now.date_naive();

        let from = match date_from {
            Some(raw) => parse(raw, Bound::From)?,
            None => Bound::From.expand(today - Duration::days(DEFAULT_WINDOW_DAYS)),
        };
        let to = match date_to {
            Some(raw) => parse(raw, Bound::To)?,
            None => Bound::To.expand(today),
        };

        if from > to {
            return Err(ValidationError::new(
                "dateFrom",
                format!(
                    "{} is after dateTo {}",
                    from.format(TIMESTAMP_FORMAT),
                    to.format(TIMESTAMP_FORMAT)
                ),
            ));
        }

        Ok(Self { from, to })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.to
    }

    /// Start as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn start_str(&self) -> String {
        self.from.format(TIMESTAMP_FORMAT).to_string()
    }

    /// End as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn end_str(&self) -> String {
        self.to.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn parse(raw: &str, bound: Bound) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(bound.expand(date));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            let utc = dt.with_timezone(&Utc);
            // Whole seconds only
            utc - Duration::nanoseconds(i64::from(utc.timestamp_subsec_nanos()))
        })
        .map_err(|_| {
            ValidationError::new(
                bound.field(),
                format!("'{}' is not a YYYY-MM-DD or RFC 3339 date", raw),
            )
        })
}
