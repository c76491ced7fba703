//! Language-neutral literal helpers: quoting, temporal normalization, guids
//! and binary payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike};
use snippetgen_model::BinaryData;
use tracing::warn;

/// Double-quoted string literal with C-style escapes.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Normalize a date-time to RFC 3339.
///
/// Values without an offset are read as UTC. With `use_z` a zero offset is
/// written as `Z`. Unparsable input is returned unchanged.
#[must_use]
pub fn normalize_date_time(raw: &str, use_z: bool) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.to_rfc3339_opts(SecondsFormat::AutoSi, use_z);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"));
    match naive {
        Ok(naive) => naive
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::AutoSi, use_z),
        Err(_) => {
            warn!(value = raw, "unrecognized date-time; keeping it verbatim");
            raw.to_owned()
        }
    }
}

/// Parse a calendar date such as `2024-03-01`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parse a time of day such as `08:30:00` or `08:30:00.0000000`.
#[must_use]
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Hour, minute and whole-second components of a time of day.
#[must_use]
pub fn time_components(time: NaiveTime) -> (u32, u32, u32) {
    (time.hour(), time.minute(), time.second())
}

/// An ISO 8601 duration reduced to days and clock components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IsoDuration {
    /// Whole days, weeks folded in.
    pub days: u64,
    /// Hours.
    pub hours: u64,
    /// Minutes.
    pub minutes: u64,
    /// Seconds, possibly fractional.
    pub seconds: f64,
}

impl IsoDuration {
    /// Parse `P[nW][nD][T[nH][nM][nS]]`. Year and month designators are
    /// calendar dependent and rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix('P').or_else(|| raw.strip_prefix('p'))?;
        let mut duration = Self::default();
        let mut in_time = false;
        let mut number = String::new();
        let mut seen = false;
        for c in rest.chars() {
            match c.to_ascii_uppercase() {
                'T' if !in_time && number.is_empty() => in_time = true,
                d if d.is_ascii_digit() || d == '.' => number.push(d),
                designator => {
                    let value: f64 = number.parse().ok()?;
                    number.clear();
                    seen = true;
                    // only seconds keep their fraction
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let whole = value as u64;
                    match (designator, in_time) {
                        ('W', false) => duration.days += whole * 7,
                        ('D', false) => duration.days += whole,
                        ('H', true) => duration.hours += whole,
                        ('M', true) => duration.minutes += whole,
                        ('S', true) => duration.seconds += value,
                        _ => return None,
                    }
                }
            }
        }
        (seen && number.is_empty()).then_some(duration)
    }
}

/// Canonical lowercase hyphenated form of a guid, or the input unchanged.
#[must_use]
pub fn canonical_guid(raw: &str) -> String {
    uuid::Uuid::parse_str(raw).map_or_else(|_| raw.to_owned(), |id| id.hyphenated().to_string())
}

/// Base64 text of a binary payload.
#[must_use]
pub fn base64_text(data: &BinaryData) -> String {
    match data {
        BinaryData::Raw(bytes) => STANDARD.encode(bytes),
        BinaryData::Base64(text) => text.clone(),
    }
}
