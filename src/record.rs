use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub const UNKNOWN_USER_AGENT: &str = "Unknown";

// `%z` accepts offsets with or without a colon, e.g. `+0300`
const OFFSET_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

// Naive layouts tried after the offset-aware ones; `%.f` also matches when the fraction is absent
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One decoded access-log line.
///
/// Every recognized field is optional. `null` and a missing key both decode to `None`;
/// unrecognized keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogRecord {
    #[serde(
        rename = "@timestamp",
        default,
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: Option<NaiveDateTime>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub response_time: Option<f64>,

    #[serde(default)]
    pub http_user_agent: Option<String>,
}

impl LogRecord {
    /// Decodes a single line of line-delimited JSON. Anything other than a JSON object is rejected.
    pub fn decode(line: &str) -> Result<Self, serde_json::Error> {
        Self::decode_slice(line.as_bytes())
    }

    /// Like [`LogRecord::decode`] for raw bytes; invalid UTF-8 is a decode error.
    pub fn decode_slice(line: &[u8]) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_slice(line)?;
        serde_json::from_value(Value::Object(fields))
    }

    /// Calendar date of the record's timestamp, in the timestamp's own offset.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }

    /// Client agent with a missing value reported as `"Unknown"`.
    pub fn user_agent(&self) -> &str {
        self.http_user_agent.as_deref().unwrap_or(UNKNOWN_USER_AGENT)
    }

    /// Endpoint and response time, when the record carries both.
    pub fn timing(&self) -> Option<(&str, f64)> {
        match (self.url.as_deref(), self.response_time) {
            (Some(url), Some(response_time)) if !url.is_empty() => Some((url, response_time)),
            _ => None,
        }
    }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_TIMESTAMP_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_local());
        }
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| {
        parse_timestamp(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid @timestamp '{}'", value)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_recognized_fields() {
        let record = LogRecord::decode(
            r#"{"@timestamp": "2025-06-22T12:00:00", "url": "/api/v1/resource", "response_time": 200, "http_user_agent": "Mozilla/5.0", "status": 200}"#,
        )
        .unwrap();

        assert_eq!(record.url.as_deref(), Some("/api/v1/resource"));
        assert_eq!(record.response_time, Some(200.0));
        assert_eq!(record.user_agent(), "Mozilla/5.0");
        assert_eq!(
            record.date(),
            Some(NaiveDate::from_ymd_opt(2025, 6, 22).unwrap())
        );
    }

    #[test]
    fn missing_and_null_fields_are_absent() {
        let record = LogRecord::decode(r#"{"url": null, "other": 1}"#).unwrap();

        assert_eq!(record.timestamp, None);
        assert_eq!(record.url, None);
        assert_eq!(record.response_time, None);
        assert_eq!(record.http_user_agent, None);
        assert_eq!(record.timing(), None);
    }

    #[test]
    fn user_agent_defaults_only_at_read_time() {
        let missing = LogRecord::decode("{}").unwrap();
        let empty = LogRecord::decode(r#"{"http_user_agent": ""}"#).unwrap();

        assert_eq!(missing.user_agent(), "Unknown");
        assert_eq!(missing.http_user_agent, None);
        assert_eq!(empty.user_agent(), "");
        assert_eq!(empty.http_user_agent.as_deref(), Some(""));
    }

    #[test]
    fn timing_requires_url_and_response_time() {
        let only_url = LogRecord::decode(r#"{"url": "/a"}"#).unwrap();
        let only_time = LogRecord::decode(r#"{"response_time": 1.5}"#).unwrap();
        let empty_url = LogRecord::decode(r#"{"url": "", "response_time": 3}"#).unwrap();
        let both = LogRecord::decode(r#"{"url": "/a", "response_time": 0}"#).unwrap();

        assert_eq!(only_url.timing(), None);
        assert_eq!(only_time.timing(), None);
        assert_eq!(empty_url.timing(), None);
        assert_eq!(both.timing(), Some(("/a", 0.0)));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(LogRecord::decode("not json").is_err());
        assert!(LogRecord::decode("").is_err());
        assert!(LogRecord::decode(r#"["/a", 1]"#).is_err());
        assert!(LogRecord::decode("42").is_err());
        assert!(LogRecord::decode(r#"{"response_time": "fast"}"#).is_err());
        assert!(LogRecord::decode(r#"{"@timestamp": "yesterday"}"#).is_err());
    }

    #[test]
    fn parses_timestamp_variants() {
        let june_22 = NaiveDate::from_ymd_opt(2025, 6, 22).unwrap();

        for value in [
            "2025-06-22T12:00:00",
            "2025-06-22T12:00:00.123456",
            "2025-06-22 23:59:59",
            "2025-06-22T08:30",
            "2025-06-22",
            "2025-06-22T23:30:00+03:00",
            "2025-06-22T00:15:00Z",
        ] {
            assert_eq!(
                parse_timestamp(value).map(|ts| ts.date()),
                Some(june_22),
                "{}",
                value
            );
        }

        assert_eq!(parse_timestamp("22/06/2025"), None);
    }

    #[test]
    fn accepts_offsets_without_colon() {
        let record =
            LogRecord::decode(r#"{"@timestamp": "2025-06-22T12:00:00+0300"}"#).unwrap();
        assert_eq!(
            record.timestamp,
            NaiveDate::from_ymd_opt(2025, 6, 22).and_then(|d| d.and_hms_opt(12, 0, 0))
        );

        let ts = parse_timestamp("2025-06-22 23:30:00.250-0500").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 6, 22).unwrap());
    }

    #[test]
    fn decode_slice_rejects_invalid_utf8() {
        assert!(LogRecord::decode_slice(b"{\"url\": \"\xff\"}").is_err());
        assert!(LogRecord::decode_slice(b"{\"url\": \"/a\"}").is_ok());
    }

    #[test]
    fn offset_timestamps_keep_their_local_date() {
        let ts = parse_timestamp("2025-06-22T23:30:00-05:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 6, 22).unwrap());
    }
}
