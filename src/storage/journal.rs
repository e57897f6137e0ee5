use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use thiserror::Error;

use crate::utils::time::{date_to_record_name, week_start};

use super::{
    document::{read_document, write_document},
    entities::{Reflection, WeeklyGoals},
};

pub const MAX_GOALS: usize = 10;
pub const MAX_GOAL_LENGTH: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("reflection is empty")]
    EmptyReflection,
    #[error("goal is empty")]
    EmptyGoal,
    #[error("goal is longer than {MAX_GOAL_LENGTH} characters")]
    GoalTooLong,
    #[error("a week can't have more than {MAX_GOALS} goals")]
    TooManyGoals,
    #[error("there is no goal number {0}")]
    UnknownGoal(usize),
}

impl WeeklyGoals {
    pub fn add_goal(&mut self, goal: &str) -> Result<(), JournalError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(JournalError::EmptyGoal);
        }
        if goal.chars().count() > MAX_GOAL_LENGTH {
            return Err(JournalError::GoalTooLong);
        }
        if self.goals.len() >= MAX_GOALS {
            return Err(JournalError::TooManyGoals);
        }
        self.goals.push(goal.to_string());
        Ok(())
    }

    /// Removes a goal by its zero based position. Errors name the goal by its number, as it's
    /// shown to users.
    pub fn remove_goal(&mut self, index: usize) -> Result<String, JournalError> {
        if index >= self.goals.len() {
            return Err(JournalError::UnknownGoal(index.saturating_add(1)));
        }
        Ok(self.goals.remove(index))
    }
}

/// Reflections are stored one file per day, goals one file per week.
pub struct JournalStorage {
    dir: PathBuf,
}

impl JournalStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn reflection_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join("reflections")
            .join(format!("{}.json", date_to_record_name(date)))
    }

    fn goals_path(&self, week_start: NaiveDate) -> PathBuf {
        self.dir
            .join("goals")
            .join(format!("{}.json", date_to_record_name(week_start)))
    }

    pub async fn reflection_for(&self, date: NaiveDate) -> Result<Option<Reflection>> {
        read_document(&self.reflection_path(date)).await
    }

    pub async fn save_reflection(&self, date: NaiveDate, text: &str) -> Result<Reflection> {
        let text = text.trim();
        if text.is_empty() {
            return Err(JournalError::EmptyReflection.into());
        }
        let reflection = Reflection {
            date,
            text: text.to_string(),
        };
        write_document(&self.reflection_path(date), &reflection).await?;
        Ok(reflection)
    }

    /// Goals of the week containing `date`.
    pub async fn goals_for(&self, date: NaiveDate) -> Result<WeeklyGoals> {
        let start = week_start(date);
        Ok(read_document(&self.goals_path(start))
            .await?
            .unwrap_or_else(|| WeeklyGoals::empty(start)))
    }

    pub async fn save_goals(&self, goals: &WeeklyGoals) -> Result<()> {
        write_document(&self.goals_path(goals.week_start), goals).await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_goal_validation() {
        let mut goals = WeeklyGoals::empty(date(2025, 3, 10));

        assert_eq!(goals.add_goal("   "), Err(JournalError::EmptyGoal));
        assert_eq!(
            goals.add_goal(&"가".repeat(MAX_GOAL_LENGTH + 1)),
            Err(JournalError::GoalTooLong)
        );
        goals.add_goal(&"가".repeat(MAX_GOAL_LENGTH)).unwrap();
        goals.add_goal("  run 10km ").unwrap();
        assert_eq!(goals.goals[1], "run 10km");
    }

    #[test]
    fn test_goal_limit() {
        let mut goals = WeeklyGoals::empty(date(2025, 3, 10));
        for i in 0..MAX_GOALS {
            goals.add_goal(&format!("goal {i}")).unwrap();
        }
        assert_eq!(goals.add_goal("one more"), Err(JournalError::TooManyGoals));
        assert_eq!(goals.remove_goal(0), Ok("goal 0".to_string()));
        assert_eq!(goals.remove_goal(42), Err(JournalError::UnknownGoal(43)));
    }

    #[tokio::test]
    async fn test_reflection_storage() -> Result<()> {
        let dir = tempdir()?;
        let storage = JournalStorage::new(dir.path().to_owned());
        let day = date(2025, 3, 12);

        assert!(storage.reflection_for(day).await?.is_none());
        assert!(storage.save_reflection(day, "  \n ").await.is_err());

        storage.save_reflection(day, " focused morning \n").await?;
        let reflection = storage.reflection_for(day).await?.unwrap();
        assert_eq!(reflection.text, "focused morning");
        Ok(())
    }

    #[tokio::test]
    async fn test_goals_are_keyed_by_week() -> Result<()> {
        let dir = tempdir()?;
        let storage = JournalStorage::new(dir.path().to_owned());

        let mut goals = storage.goals_for(date(2025, 3, 12)).await?;
        assert_eq!(goals.week_start, date(2025, 3, 10));
        goals.add_goal("ship it")?;
        storage.save_goals(&goals).await?;

        let same_week = storage.goals_for(date(2025, 3, 16)).await?;
        assert_eq!(same_week.goals, vec!["ship it".to_string()]);
        let next_week = storage.goals_for(date(2025, 3, 17)).await?;
        assert!(next_week.goals.is_empty());
        Ok(())
    }
}
