//! Compound search filters applied to folder-filtered messages

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Message;

/// Error for a date bound that is neither empty nor a calendar date
#[derive(Debug, thiserror::Error)]
#[error("Invalid date '{0}': expected YYYY-MM-DD or YYYY/MM/DD")]
pub struct InvalidDateError(pub String);

/// Free-text query plus structured field filters
///
/// Every non-empty clause must match (logical AND). An entirely empty
/// filter matches every message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Matches if found in from, to, subject or body
    pub query: String,
    /// Substring of the sender
    pub from: String,
    /// Substring of the subject
    pub subject: String,
    /// Inclusive lower bound, from midnight UTC
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound, through 23:59:59.999 UTC
    pub end_date: Option<NaiveDate>,
}

impl SearchFilters {
    /// Filters with only a free-text query
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Check if no clause is active
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.from.is_empty()
            && self.subject.is_empty()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Whether any of the advanced (non-query) clauses is active
    pub fn has_advanced(&self) -> bool {
        !self.from.is_empty()
            || !self.subject.is_empty()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// First instant included by `start_date`
    fn start_bound(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Utc.from_utc_datetime(&dt))
    }

    /// Last instant included by `end_date`
    fn end_bound(&self) -> Option<DateTime<Utc>> {
        self.end_date.and_then(|d| {
            d.and_hms_milli_opt(23, 59, 59, 999)
                .map(|dt| Utc.from_utc_datetime(&dt))
        })
    }
}

/// Parse a date bound as typed by a user
///
/// Empty input clears the bound.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, InvalidDateError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y/%m/%d"))
        .map(Some)
        .map_err(|_| InvalidDateError(input.to_string()))
}

/// Whether `message` satisfies every active clause of `filters`
pub fn matches_search(message: &Message, filters: &SearchFilters) -> bool {
    if filters.is_empty() {
        return true;
    }

    let contains = |haystack: &str, needle: &str| haystack.to_lowercase().contains(needle);

    if !filters.query.is_empty() {
        let query = filters.query.to_lowercase();
        let query_match = contains(&message.from, &query)
            || contains(&message.to, &query)
            || contains(&message.subject, &query)
            || contains(&message.body, &query);
        if !query_match {
            return false;
        }
    }

    if !filters.from.is_empty() && !contains(&message.from, &filters.from.to_lowercase()) {
        return false;
    }

    if !filters.subject.is_empty() && !contains(&message.subject, &filters.subject.to_lowercase()) {
        return false;
    }

    if let Some(start) = filters.start_bound()
        && message.date < start
    {
        return false;
    }

    if let Some(end) = filters.end_bound()
        && message.date > end
    {
        return false;
    }

    true
}
