//! Date codec for date-typed variables
//!
//! Dates travel as formatted strings (`dd-mm-yyyy` by default). Calculators
//! never parse them inline; they ask a [`DateCodec`] for a day ordinal that
//! sorts and groups correctly, and ask it again to render category labels.

use chrono::{Datelike, NaiveDate};

/// Default wire format for dates
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Converts between date strings and comparable day ordinals
pub trait DateCodec: Send + Sync {
    /// Decode a date string to a day ordinal, or `None` if it is not a valid
    /// calendar date in this codec's format
    fn decode(&self, text: &str) -> Option<i64>;

    /// Render a day ordinal back to a date string
    fn encode(&self, ordinal: i64) -> Option<String>;
}

/// `chrono` backed codec with a configurable `strftime` pattern
///
/// Ordinals count days from 0001-01-01 (day 1) in the proleptic Gregorian
/// calendar.
#[derive(Debug, Clone)]
pub struct PatternDateCodec {
    format: String,
}

impl PatternDateCodec {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Default for PatternDateCodec {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl DateCodec for PatternDateCodec {
    fn decode(&self, text: &str) -> Option<i64> {
        NaiveDate::parse_from_str(text.trim(), &self.format)
            .ok()
            .map(|date| i64::from(date.num_days_from_ce()))
    }

    fn encode(&self, ordinal: i64) -> Option<String> {
        let days = i32::try_from(ordinal).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days).map(|date| date.format(&self.format).to_string())
    }
}

/// Decode with the default `dd-mm-yyyy` codec
pub fn date_string_to_ordinal(text: &str) -> Option<i64> {
    PatternDateCodec::default().decode(text)
}

/// Encode with the default `dd-mm-yyyy` codec
pub fn ordinal_to_date_string(ordinal: i64) -> Option<String> {
    PatternDateCodec::default().encode(ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_valid() {
        let a = date_string_to_ordinal("01-01-2020").unwrap();
        let b = date_string_to_ordinal("02-01-2020").unwrap();
        assert_eq!(b - a, 1);
        assert_eq!(date_string_to_ordinal("01-01-0001"), Some(1));
    }

    #[test]
    fn test_decode_rejects_invalid_dates() {
        assert_eq!(date_string_to_ordinal("30-02-2021"), None);
        assert_eq!(date_string_to_ordinal("01-13-2021"), None);
        assert_eq!(date_string_to_ordinal("29-02-2021"), None);
        assert_eq!(date_string_to_ordinal("not a date"), None);
        assert!(date_string_to_ordinal("29-02-2020").is_some());
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let earlier = date_string_to_ordinal("31-12-1999").unwrap();
        let later = date_string_to_ordinal("01-01-2000").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_custom_format() {
        let codec = PatternDateCodec::new("%Y/%m/%d");
        let ordinal = codec.decode("2024/03/15").unwrap();
        assert_eq!(codec.encode(ordinal).as_deref(), Some("2024/03/15"));
        assert_eq!(
            ordinal_to_date_string(ordinal).as_deref(),
            Some("15-03-2024")
        );
    }

    proptest! {
        #[test]
        fn prop_ordinal_round_trip(ordinal in 1i64..=3_652_059) {
            let text = ordinal_to_date_string(ordinal).unwrap();
            prop_assert_eq!(date_string_to_ordinal(&text), Some(ordinal));
        }
    }
}
