use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// True when both instants fall on the same UTC calendar day.
pub fn same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Interpret a stored date value. Empty strings, zero, null and anything
/// unparseable yield `None`.
fn parse_stored(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) if !s.is_empty() => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .filter(|ms| *ms != 0)
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Deserialize a due date, falling back to the current instant when the
/// stored value is missing or unusable.
pub fn deserialize_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_stored).unwrap_or_else(Utc::now))
}

/// Same as [`deserialize_or_now`] for optional task dates. Loading always
/// produces `Some`.
pub fn deserialize_some_or_now<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_or_now(deserializer).map(Some)
}

pub fn now_some() -> Option<DateTime<Utc>> {
    Some(Utc::now())
}

/// Parse a user-supplied due date.
///
/// Accepts `today`, `tomorrow`, `YYYY-MM-DD` (midnight UTC) or a full
/// RFC 3339 timestamp.
pub fn parse_due(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    match s.to_lowercase().as_str() {
        "today" => return Ok(now),
        "tomorrow" => {
            return now
                .checked_add_days(Days::new(1))
                .ok_or_else(|| "date overflow".to_string());
        }
        _ => {}
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN).and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    Err(format!(
        "invalid date '{}': expected today|tomorrow|YYYY-MM-DD|RFC 3339",
        s
    ))
}

/// Validate a `HH:MM` due time, returning it normalised to two-digit fields.
pub fn parse_due_time(s: &str) -> Result<String, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| format!("invalid time '{}': expected HH:MM", s.trim()))
}
