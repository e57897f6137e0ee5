use std::fmt::Display;

use chrono::{Datelike, Duration, Months, NaiveDate};
use clap::ValueEnum;

use crate::utils::time::week_start;

/// Weekday names used in bucket labels, starting on Monday.
const WEEKDAYS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |v| *v <= end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} ~ {}", self.start, self.end)
        }
    }
}

/// A part of a period with the label it's shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub range: DateRange,
}

impl Period {
    /// The period containing `reference`. Weeks start on Monday.
    pub fn range(&self, reference: NaiveDate) -> DateRange {
        match self {
            Period::Day => DateRange::single(reference),
            Period::Week => {
                let start = week_start(reference);
                DateRange::new(start, start + Duration::days(6))
            }
            Period::Month => {
                let start = reference - Duration::days(reference.day0() as i64);
                DateRange::new(start, start + Months::new(1) - Duration::days(1))
            }
        }
    }

    /// Splits a period into the parts shown in its breakdown: nothing for a day, days for a week,
    /// 7 day chunks from the first of the month for a month.
    pub fn buckets(&self, range: DateRange) -> Vec<Bucket> {
        match self {
            Period::Day => vec![],
            Period::Week => range
                .days()
                .map(|day| Bucket {
                    label: format!(
                        "{} ({})",
                        day.format("%m-%d"),
                        WEEKDAYS[day.weekday().num_days_from_monday() as usize]
                    ),
                    range: DateRange::single(day),
                })
                .collect(),
            Period::Month => {
                let mut buckets = vec![];
                let mut start = range.start;
                while start <= range.end {
                    let end = (start + Duration::days(6)).min(range.end);
                    buckets.push(Bucket {
                        label: format!("{}주차", buckets.len() + 1),
                        range: DateRange::new(start, end),
                    });
                    start = end + Duration::days(1);
                }
                buckets
            }
        }
    }
}
