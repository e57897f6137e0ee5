use thiserror::Error;

/// Minutes in a day. Durations that go below zero are wrapped by this amount.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Reason a `HH:MM` string could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTimeFormat {
    #[error("time is empty")]
    Empty,
    #[error("time {0:?} has no ':' separator")]
    MissingSeparator(String),
    #[error("time {0:?} is not made of integers")]
    NotANumber(String),
    #[error("time {0:?} is outside of 00:00-23:59")]
    OutOfRange(String),
}

/// Decodes `HH:MM` into minutes since midnight.
///
/// Only the first two `:` separated segments are read, so `12:30:45` is accepted as `12:30`.
pub fn parse_time(time: &str) -> Result<u32, InvalidTimeFormat> {
    if time.trim().is_empty() {
        return Err(InvalidTimeFormat::Empty);
    }
    let mut segments = time.split(':');
    let (Some(hour), Some(minute)) = (segments.next(), segments.next()) else {
        return Err(InvalidTimeFormat::MissingSeparator(time.to_string()));
    };

    let (Ok(hour), Ok(minute)) = (hour.trim().parse::<i64>(), minute.trim().parse::<i64>()) else {
        return Err(InvalidTimeFormat::NotANumber(time.to_string()));
    };

    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return Err(InvalidTimeFormat::OutOfRange(time.to_string()));
    }

    Ok((hour * 60 + minute) as u32)
}

/// Lenient counterpart of [parse_time]. A segment only has to start with an integer, so `9:30am`
/// reads as `09:30`. Anything that still can't be read, or is out of range, is midnight.
pub fn time_to_minutes(time: &str) -> u32 {
    let mut segments = time.split(':');
    let (Some(hour), Some(minute)) = (segments.next(), segments.next()) else {
        return 0;
    };
    match (leading_integer(hour), leading_integer(minute)) {
        (Some(hour), Some(minute)) if (0..24).contains(&hour) && (0..60).contains(&minute) => {
            (hour * 60 + minute) as u32
        }
        _ => 0,
    }
}

/// Integer at the start of `segment`. Leading whitespace and anything after the digits are
/// ignored.
fn leading_integer(segment: &str) -> Option<i64> {
    let segment = segment.trim_start();
    let (sign, digits) = match segment.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, segment.strip_prefix('+').unwrap_or(segment)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// Difference between two wall clock times in minutes. An end before the start is treated as a
/// block crossing midnight.
pub fn calculate_duration(start: &str, end: &str) -> u32 {
    minutes_between(time_to_minutes(start), time_to_minutes(end))
}

/// [calculate_duration] for already decoded times.
pub fn minutes_between(start: u32, end: u32) -> u32 {
    let duration = end as i64 - start as i64;
    if duration < 0 {
        (duration + MINUTES_PER_DAY as i64) as u32
    } else {
        duration as u32
    }
}

/// Formats minutes the way they are shown next to categories: `4시간 30분`, `45분`, `2시간`.
pub fn format_duration(total_minutes: u32) -> String {
    if total_minutes == 0 {
        return "0분".to_string();
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours == 0 {
        format!("{minutes}분")
    } else if minutes == 0 {
        format!("{hours}시간")
    } else {
        format!("{hours}시간 {minutes}분")
    }
}
