//! Display formatters — pure value → string functions keyed by field type.
//!
//! Call sites never switch on `FieldType` themselves; they ask
//! [`formatter_for`] for the right function. Inputs that fail to parse
//! pass through unchanged so a bad server value degrades to raw text
//! instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::FieldType;

/// `1990-01-15` → `Jan 15, 1990`. Unparseable input passes through.
pub fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// ISO datetime (with or without zone/seconds) → `Mar 15, 2024 9:30 AM`.
pub fn format_datetime(raw: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"));
    match parsed {
        Ok(dt) => dt.format("%b %-d, %Y %-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `09:30` or `09:30:00` → `9:30 AM`.
pub fn format_time(raw: &str) -> String {
    let parsed = NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"));
    match parsed {
        Ok(time) => time.format("%-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Canonical NANP number → `(123) 456-7890`. Anything else passes through.
pub fn format_phone(raw: &str) -> String {
    match canonicalize_phone(raw) {
        Some(canonical) => {
            // canonical is always +1 followed by exactly 10 digits
            let digits = &canonical[2..];
            format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
        }
        None => raw.to_string(),
    }
}

/// Normalize a phone number to `+1XXXXXXXXXX`.
///
/// Accepts 10-digit NANP numbers with any punctuation, and 11-digit
/// numbers with a leading country 1. Returns `None` for anything else;
/// records without a canonicalizable number are not call-eligible.
pub fn canonicalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => Some(format!("+1{digits}")),
        11 if digits.starts_with('1') => Some(format!("+{digits}")),
        _ => None,
    }
}

/// Identity formatter for text and select fields.
fn format_text(raw: &str) -> String {
    raw.to_string()
}

/// Dispatch table: field type → display formatter.
pub fn formatter_for(field_type: FieldType) -> fn(&str) -> String {
    match field_type {
        FieldType::Date => format_date,
        FieldType::Datetime => format_datetime,
        FieldType::Time => format_time,
        FieldType::Phone => format_phone,
        FieldType::Text | FieldType::Select => format_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_formatting() {
        assert_eq!(format_date("1990-01-15"), "Jan 15, 1990");
        assert_eq!(format_date("2024-12-03"), "Dec 3, 2024");
        assert_eq!(format_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn datetime_formatting() {
        assert_eq!(format_datetime("2024-03-15T09:30"), "Mar 15, 2024 9:30 AM");
        assert_eq!(format_datetime("2024-03-15T14:05:00"), "Mar 15, 2024 2:05 PM");
        assert_eq!(format_datetime("garbage"), "garbage");
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time("09:30"), "9:30 AM");
        assert_eq!(format_time("14:05:00"), "2:05 PM");
        assert_eq!(format_time("25:99"), "25:99");
    }

    #[test]
    fn phone_canonicalization() {
        assert_eq!(canonicalize_phone("(123) 456-7890").as_deref(), Some("+11234567890"));
        assert_eq!(canonicalize_phone("123-456-7890").as_deref(), Some("+11234567890"));
        assert_eq!(canonicalize_phone("+1 123 456 7890").as_deref(), Some("+11234567890"));
        assert_eq!(canonicalize_phone("11234567890").as_deref(), Some("+11234567890"));
        assert_eq!(canonicalize_phone("456-7890"), None);
        assert_eq!(canonicalize_phone(""), None);
        assert_eq!(canonicalize_phone("21234567890"), None);
    }

    #[test]
    fn phone_formatting() {
        assert_eq!(format_phone("+11234567890"), "(123) 456-7890");
        assert_eq!(format_phone("1234567890"), "(123) 456-7890");
        assert_eq!(format_phone("ext. 204"), "ext. 204");
    }

    #[test]
    fn dispatch_table_routes_by_type() {
        assert_eq!(formatter_for(FieldType::Date)("1990-01-15"), "Jan 15, 1990");
        assert_eq!(formatter_for(FieldType::Phone)("1234567890"), "(123) 456-7890");
        assert_eq!(formatter_for(FieldType::Text)("as-is"), "as-is");
        assert_eq!(formatter_for(FieldType::Select)("Aetna"), "Aetna");
    }
}
