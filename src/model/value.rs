//! Typed literal values
//!
//! Literal tokens carry the value they denote alongside their raw URI text.
//! The helpers in this module parse the bodies of prefixed literals such as
//! `datetime'2012-02-29T12:00'` or `guid'...'`.

use super::types::EdmSimpleTypeKind;
use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

/// Value of a literal token
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Quoted string with `''` escapes resolved
    String(String),
    /// Integer in Int32 range, or with no suffix
    Int32(i32),
    /// Integer with `L` suffix or beyond Int32 range
    Int64(i64),
    /// `M` suffix or a fraction without exponent
    Decimal(Decimal),
    /// `D` suffix or a number with exponent
    Double(f64),
    /// `F` suffix
    Single(f32),
    /// `datetime'...'`
    DateTime(NaiveDateTime),
    /// `datetimeoffset'...'`
    DateTimeOffset(DateTime<FixedOffset>),
    /// `time'PT..H..M..S'`
    Time(NaiveTime),
    /// `guid'...'`, stored lowercase
    Guid(String),
    /// `X'...'` / `binary'...'`
    Binary(Vec<u8>),
}

impl LiteralValue {
    /// EDM kind of this value
    pub fn kind(&self) -> EdmSimpleTypeKind {
        match self {
            LiteralValue::Null => EdmSimpleTypeKind::Null,
            LiteralValue::Boolean(_) => EdmSimpleTypeKind::Boolean,
            LiteralValue::String(_) => EdmSimpleTypeKind::String,
            LiteralValue::Int32(_) => EdmSimpleTypeKind::Int32,
            LiteralValue::Int64(_) => EdmSimpleTypeKind::Int64,
            LiteralValue::Decimal(_) => EdmSimpleTypeKind::Decimal,
            LiteralValue::Double(_) => EdmSimpleTypeKind::Double,
            LiteralValue::Single(_) => EdmSimpleTypeKind::Single,
            LiteralValue::DateTime(_) => EdmSimpleTypeKind::DateTime,
            LiteralValue::DateTimeOffset(_) => EdmSimpleTypeKind::DateTimeOffset,
            LiteralValue::Time(_) => EdmSimpleTypeKind::Time,
            LiteralValue::Guid(_) => EdmSimpleTypeKind::Guid,
            LiteralValue::Binary(_) => EdmSimpleTypeKind::Binary,
        }
    }
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

static TIME_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d{1,2})H)?(?:(\d{1,2})M)?(?:(\d{1,2})(?:\.(\d{1,9}))?S)?$").ok()
});

static GUID_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .ok()
});

/// Parse the body of a `datetime'...'` literal
pub fn parse_datetime(body: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(body, format).ok())
}

/// Parse the body of a `datetimeoffset'...'` literal (RFC 3339)
pub fn parse_datetime_offset(body: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(body).ok()
}

/// Parse the body of a `time'...'` literal (`PT13H20M`, `PT5.25S`)
pub fn parse_time(body: &str) -> Option<NaiveTime> {
    if body == "PT" {
        return None;
    }
    let captures = TIME_PATTERN.as_ref()?.captures(body)?;
    let component = |index: usize| -> Option<u32> {
        captures
            .get(index)
            .map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let nanos = match captures.get(4) {
        Some(fraction) => {
            let digits = fraction.as_str();
            let scale = 10u32.pow(9 - digits.len() as u32);
            digits.parse::<u32>().ok()? * scale
        }
        None => 0,
    };

    NaiveTime::from_hms_nano_opt(component(1)?, component(2)?, component(3)?, nanos)
}

/// Validate the body of a `guid'...'` literal
pub fn parse_guid(body: &str) -> Option<String> {
    GUID_PATTERN
        .as_ref()?
        .is_match(body)
        .then(|| body.to_ascii_lowercase())
}

/// Decode the hex body of a `X'...'` / `binary'...'` literal
pub fn parse_binary(body: &str) -> Option<Vec<u8>> {
    hex::decode(body).ok()
}
