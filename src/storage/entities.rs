use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single recorded interval of activity. Times are kept as entered (`HH:MM`), so a block that is
/// still being edited can be stored with an empty end.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub activity: String,
    /// Filled in when blocks are read for a specific day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl TimeBlock {
    pub fn new(
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            category: category.into(),
            activity: String::new(),
            date: None,
        }
    }

    pub fn with_activity(self, activity: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            ..self
        }
    }

    pub fn with_date(self, date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..self
        }
    }

    /// A block without a category or either of its times is still being edited.
    pub fn is_incomplete(&self) -> bool {
        self.category.is_empty() || self.start_time.is_empty() || self.end_time.is_empty()
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    /// Stable key referenced by [TimeBlock::category]. Never changes after creation.
    pub value: String,
    pub label: String,
    /// Styling token. Passed through untouched.
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(
        value: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub date: NaiveDate,
    pub text: String,
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoals {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub goals: Vec<String>,
}

impl WeeklyGoals {
    pub fn empty(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            goals: vec![],
        }
    }
}
