use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
// JS Date.prototype.toDateString(), e.g. "Fri Oct 16 2026"
const JS_DATE_STRING_FMT: &str = "%a %b %d %Y";

/// ISO-8601 UTC with millisecond precision and a `Z` suffix.
pub fn now_iso() -> String {
    iso_millis(Utc::now())
}

pub fn iso_millis(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fractional days elapsed from `then` to `now`. Negative if `then` is in the future.
pub fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - then).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Parses a stored freshness timestamp.
///
/// Accepts RFC 3339 (what we write), RFC 2822 and the bare date string format,
/// which older versions of the extension stored. A bare date is taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, JS_DATE_STRING_FMT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
