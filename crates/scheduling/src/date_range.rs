use chrono::{DateTime, NaiveDate};

use unshift_core::{DomainError, DomainResult};

/// Inclusive range over planned dates. Either edge may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build from raw query arguments. Missing or empty strings are open edges.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> DomainResult<Self> {
        let edge = |field: &str, raw: Option<&str>| -> DomainResult<Option<NaiveDate>> {
            match raw.map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => parse_date(s)
                    .map(Some)
                    .ok_or_else(|| DomainError::invalid_field(field, format!("invalid date: {s}"))),
                None => Ok(None),
            }
        };

        Ok(Self {
            start: edge("startDate", start)?,
            end: edge("endDate", end)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// Parse a planned date: `YYYY-MM-DD`, or an RFC 3339 timestamp (date part kept).
pub fn parse_plan_date(raw: &str) -> DomainResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::invalid_field("planDate", "Plan date must not be empty"));
    }
    parse_date(raw).ok_or_else(|| DomainError::invalid_field("planDate", format!("invalid date: {raw}")))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
