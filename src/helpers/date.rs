//! Date helper functions

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Placeholder rendered for each date component that could not be parsed
const INVALID_COMPONENT: &str = "NaN";

/// ISO calendar dates, read as midnight UTC
const UTC_DATE_FORMATS: [&str; 1] = ["%Y-%m-%d"];

/// Non-ISO calendar dates, read as midnight in the site timezone
const LOCAL_DATE_FORMATS: [&str; 1] = ["%Y/%m/%d"];

/// Date-times without an offset, read as wall-clock time in the site timezone
const LOCAL_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-times carrying an explicit offset but not in strict RFC 3339 form
const OFFSET_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Parse a front-matter date into an instant
///
/// `2025-10-08` is midnight UTC, `2025-10-08 10:00` is 10:00 in `tz`, and
/// `2025-10-08T10:00:00+02:00` keeps its own offset.
pub fn parse_date(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in UTC_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    for fmt in LOCAL_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return local_to_utc(&d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    for fmt in LOCAL_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(&dt, tz);
        }
    }

    None
}

fn local_to_utc(dt: &NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(dt)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Format a date for display, e.g. `2025 年 10 月 8 日` or `10 月 8 日`
///
/// The calendar date is taken in `tz`. Input that cannot be parsed renders
/// each component as `NaN` instead of failing.
pub fn format_date(s: &str, include_year: bool, tz: Tz) -> String {
    match parse_date(s, tz) {
        Some(dt) => format_datetime(&dt.with_timezone(&tz), include_year),
        None => {
            tracing::warn!("Unparseable date {:?}", s);
            let nan = INVALID_COMPONENT;
            if include_year {
                format!("{nan} 年 {nan} 月 {nan} 日")
            } else {
                format!("{nan} 月 {nan} 日")
            }
        }
    }
}

/// Format an already parsed date
pub fn format_datetime<Z: TimeZone>(date: &DateTime<Z>, include_year: bool) -> String {
    if include_year {
        format!("{} 年 {} 月 {} 日", date.year(), date.month(), date.day())
    } else {
        format!("{} 月 {} 日", date.month(), date.day())
    }
}
