//! Decides whether a provider's "posted at" text means the posting went up today.
//!
//! The provider hands back free text: relative phrases ("3 hours ago",
//! "Just posted"), the word "Today", or an actual date. Rules are checked in
//! order and the first hit wins.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SAME_DAY_UNIT: Regex =
        Regex::new(r"\b(minutes?|mins?|hours?|hrs?|today)\b").expect("static pattern");
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// Matched against the input with commas removed, so "Oct 19, 2026" works.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// `true` when `raw` describes a posting published today, in the local timezone.
pub fn is_posted_today(raw: Option<&str>) -> bool {
    is_posted_on(raw, Local::now().date_naive())
}

/// Same as [`is_posted_today`] with an explicit "today".
pub fn is_posted_on(raw: Option<&str>, today: NaiveDate) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return false;
    }

    let normalized = lowered.replace(['.', ','], "");
    if normalized.contains("just posted") || normalized.contains("just now") {
        return true;
    }

    let spaced = lowered.replace(['.', ','], " ");
    if SAME_DAY_UNIT.is_match(&spaced) {
        return true;
    }

    parse_calendar_date(raw).is_some_and(|date| date == today)
}

/// Best-effort parse of a date or timestamp. Anything ambiguous yields `None`.
fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    let without_commas = raw.replace(',', "");
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&without_commas, format).ok())
}
