use chrono::{TimeZone, Utc};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Date and hour:minute of a first-save stamp, in the given zone.
/// Out-of-range stamps render as an empty string.
pub(crate) fn format_saved_at<Tz: TimeZone>(ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match Utc.timestamp_millis_opt(ms).single() {
        Some(utc) => utc.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

/// Browser-local rendering used by the open-notes list.
pub(crate) fn format_saved_at_local(ms: i64) -> String {
    format_saved_at(ms, &chrono::Local)
}
