use chrono::{DateTime, SecondsFormat, Utc};

/// Returns the current UTC time as ISO 8601 with second precision and a `Z` suffix.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
