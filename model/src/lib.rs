#![allow(clippy::new_without_default)]

use chrono::{NaiveDate, TimeZone, Utc};

pub use methods::*;

mod methods;

/// Format accepted for caller-supplied calendar dates (`from`, `to`, `date`).
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for calendar dates in every response body, e.g. `Mon Jan 01 1990`.
pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Error object returned in a response body if an operation failed.
///
/// Domain failures are reported this way with a `200` status; callers are
/// expected to check for the presence of the `error` property rather than
/// rely on the transport-level status code.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ApiError {
    /// Short description of what went wrong.
    pub error: String,
}

impl ApiError {
    pub fn new<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            error: message.into(),
        }
    }

    /// Constructor for the error returned when an exercise is logged against
    /// an id that doesn't belong to any user.
    pub fn unknown_user_id() -> Self {
        Self::new("Unknown userId")
    }

    /// Constructor for the error returned when logs are requested for an id
    /// that doesn't belong to any user.
    pub fn unknown_user() -> Self {
        Self::new("No user with this ID")
    }

    /// Constructor for the error returned for a route the service doesn't serve.
    pub fn invalid_route() -> Self {
        Self::new("invalid route")
    }
}

/// Decoded key-value parameters from an urlencoded request body or query string.
#[derive(Debug, Clone, Default)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Parse a raw urlencoded string (`a=1&b=hello+world`) into decoded pairs.
    ///
    /// Pairs that can't be percent-decoded are dropped, and a key without a
    /// `=` is kept with an empty value.
    pub fn parse(raw: &str) -> Self {
        let mut pairs = Vec::new();
        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default();
            if let (Some(key), Some(value)) = (decode_component(key), decode_component(value)) {
                pairs.push((key, value));
            }
        }
        Self { pairs }
    }

    /// The value of the first pair with the given key (if any).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " ")).ok()
}

/// Parse a caller-supplied calendar date. `None` for anything that isn't a
/// valid `YYYY-MM-DD` date.
pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), INPUT_DATE_FORMAT).ok()
}

/// The current calendar date (UTC).
pub fn current_date() -> NaiveDate {
    Utc::now().naive_utc().date()
}

/// Render a calendar date the way it appears in response bodies.
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Unix seconds of midnight (UTC) of the given calendar date.
pub fn date_to_timestamp_s(date: NaiveDate) -> i64 {
    let midnight = date.and_hms_opt(0, 0, 0).expect("infallible");
    Utc.from_utc_datetime(&midnight).timestamp()
}

/// The calendar date containing the given unix second.
pub fn date_from_timestamp_s(timestamp_s: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(timestamp_s, 0)
        .single()
        .map(|dt| dt.naive_utc().date())
}

fn missing_param_message(param_name: &str) -> String {
    format!("missing required parameter '{}'", param_name)
}

fn generic_invalid_value_message(param_name: &str) -> String {
    format!("invalid value of '{}'", param_name)
}

fn invalid_value_because_message(param_name: &str, clarification: String) -> String {
    format!(
        "{}, {}",
        generic_invalid_value_message(param_name),
        clarification
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urlencoded_pairs() {
        let form = FormParams::parse("username=fcc_test&description=test+run&duration=30");

        assert_eq!(form.get("username"), Some("fcc_test"));
        assert_eq!(form.get("description"), Some("test run"));
        assert_eq!(form.get("duration"), Some("30"));
        assert_eq!(form.get("date"), None);
    }

    #[test]
    fn decodes_percent_escapes() {
        let form = FormParams::parse("description=morning%20run&note=a%26b");

        assert_eq!(form.get("description"), Some("morning run"));
        assert_eq!(form.get("note"), Some("a&b"));
    }

    #[test]
    fn key_without_value_is_kept_empty() {
        let form = FormParams::parse("username");

        assert_eq!(form.get("username"), Some(""));
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        assert!(FormParams::parse("").is_empty());
        assert!(FormParams::parse("&&").is_empty());
    }

    #[test]
    fn input_date_roundtrips_to_display_format() {
        let date = parse_input_date("1990-01-01").unwrap();

        assert_eq!(display_date(date), "Mon Jan 01 1990");
    }

    #[test]
    fn rejects_invalid_calendar_dates() {
        assert!(parse_input_date("2020-13-40").is_none());
        assert!(parse_input_date("not a date").is_none());
        assert!(parse_input_date("").is_none());
    }

    #[test]
    fn date_timestamp_roundtrip() {
        let date = parse_input_date("2021-02-22").unwrap();
        let timestamp_s = date_to_timestamp_s(date);

        assert_eq!(date_from_timestamp_s(timestamp_s), Some(date));
    }

    #[test]
    fn api_error_serializes_as_error_body() {
        let error = ApiError::unknown_user_id();

        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({ "error": "Unknown userId" })
        );
    }
}
