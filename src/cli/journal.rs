use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use crate::storage::journal::{JournalError, JournalStorage};

#[derive(Subcommand, Debug)]
pub enum GoalsCommand {
    #[command(about = "Show goals of the week")]
    List,
    #[command(about = "Add a goal to the week")]
    Add { goal: String },
    #[command(about = "Remove a goal by its number")]
    Remove {
        #[arg(help = "Number shown by `goals list`, starting at 1")]
        number: usize,
    },
}

/// Saves the reflection of `date` when `text` is given, prints it otherwise.
pub async fn process_reflect_command(
    storage: &JournalStorage,
    date: NaiveDate,
    text: Option<String>,
) -> Result<()> {
    match text {
        Some(text) => {
            storage.save_reflection(date, &text).await?;
            println!("Saved reflection for {date}");
        }
        None => match storage.reflection_for(date).await? {
            Some(reflection) => println!("{}\n{}", reflection.date, reflection.text),
            None => println!("No reflection for {date}"),
        },
    }
    Ok(())
}

pub async fn process_goals_command(
    storage: &JournalStorage,
    date: NaiveDate,
    command: GoalsCommand,
) -> Result<()> {
    let mut goals = storage.goals_for(date).await?;
    match command {
        GoalsCommand::List => {}
        GoalsCommand::Add { goal } => {
            goals.add_goal(&goal)?;
            storage.save_goals(&goals).await?;
        }
        GoalsCommand::Remove { number } => {
            let index = number.checked_sub(1).ok_or(JournalError::UnknownGoal(number))?;
            goals.remove_goal(index)?;
            storage.save_goals(&goals).await?;
        }
    }

    println!("Goals for the week of {}", goals.week_start);
    if goals.goals.is_empty() {
        println!("No goals yet");
    }
    for (index, goal) in goals.goals.iter().enumerate() {
        println!("{}. {goal}", index + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_goals_command_flow() -> Result<()> {
        let dir = tempdir()?;
        let storage = JournalStorage::new(dir.path().to_owned());
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        process_goals_command(&storage, date, GoalsCommand::Add { goal: "read".into() }).await?;
        process_goals_command(&storage, date, GoalsCommand::Add { goal: "run".into() }).await?;
        process_goals_command(&storage, date, GoalsCommand::Remove { number: 1 }).await?;

        assert_eq!(storage.goals_for(date).await?.goals, vec!["run".to_string()]);
        assert!(
            process_goals_command(&storage, date, GoalsCommand::Remove { number: 5 })
                .await
                .is_err()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_reflect_command() -> Result<()> {
        let dir = tempdir()?;
        let storage = JournalStorage::new(dir.path().to_owned());
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        process_reflect_command(&storage, date, None).await?;
        assert!(process_reflect_command(&storage, date, Some(" ".into())).await.is_err());
        process_reflect_command(&storage, date, Some("good day".into())).await?;

        assert_eq!(storage.reflection_for(date).await?.unwrap().text, "good day");
        Ok(())
    }
}
