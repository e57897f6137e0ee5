use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};

/// This is the standard way of converting a date to a file name in timeblock.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Reads `2025-03-15`, `15/03/2025`, `yesterday`, `3 days ago` and similar. Relative inputs are
/// resolved against `reference`, not against the system clock.
pub fn parse_date(input: &str, reference: NaiveDate) -> Result<NaiveDate> {
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(input.trim(), format) {
            return Ok(date);
        }
    }
    match input.trim() {
        "today" => return Ok(reference),
        "yesterday" => return Ok(reference - Duration::days(1)),
        "tomorrow" => return Ok(reference + Duration::days(1)),
        _ => {}
    }
    // Noon keeps "x days ago" style inputs away from day boundaries.
    let now = Utc.from_utc_datetime(&(reference.and_time(NaiveTime::MIN) + Duration::hours(12)));
    parse_date_string(input, now, Dialect::Uk)
        .map(|v| v.date_naive())
        .map_err(|e| anyhow!("Failed to parse date {input:?}: {e}"))
}
