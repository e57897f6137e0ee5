use anyhow::Result;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    aggregate::wall_clock::{format_duration, minutes_between, parse_time},
    storage::{block_storage::BlockStorage, catalog::CategoryCatalog, entities::TimeBlock},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("there is no block {0} on {1}")]
    Unknown(String, NaiveDate),
}

#[derive(Debug, clap::Args)]
pub struct AddCommand {
    #[arg(
        long,
        short,
        help = "Start time HH:MM. Defaults to the end of the previous block"
    )]
    pub start: Option<String>,
    #[arg(long, short, help = "End time HH:MM. Leave out while the block is still running")]
    pub end: Option<String>,
    #[arg(long, short, help = "Category value, for example \"work\"")]
    pub category: String,
    #[arg(long, short, help = "What was done")]
    pub activity: Option<String>,
}

#[derive(Debug, Default, clap::Args)]
pub struct EditCommand {
    #[arg(help = "Id of the block")]
    pub id: String,
    #[arg(long, short, help = "New start time HH:MM")]
    pub start: Option<String>,
    #[arg(long, short, help = "New end time HH:MM. An empty value clears it")]
    pub end: Option<String>,
    #[arg(long, short, help = "New category value")]
    pub category: Option<String>,
    #[arg(long, short, help = "New description")]
    pub activity: Option<String>,
}

/// Where a new block starts when no start is given.
fn next_start_time(blocks: &[TimeBlock], default_start: &str) -> String {
    blocks
        .last()
        .map(|v| v.end_time.as_str())
        .filter(|v| !v.is_empty())
        .unwrap_or(default_start)
        .to_string()
}

/// Empty values are allowed, they mark a block that is still being edited.
fn validate_time(time: &str) -> Result<()> {
    if !time.is_empty() {
        parse_time(time)?;
    }
    Ok(())
}

pub async fn add_block(
    storage: impl BlockStorage,
    catalog: &CategoryCatalog,
    date: NaiveDate,
    AddCommand {
        start,
        end,
        category,
        activity,
    }: AddCommand,
    default_start: &str,
) -> Result<TimeBlock> {
    if catalog.find(&category).is_none() {
        warn!("Category {category:?} isn't registered, it will be shown by its value");
    }

    let block = storage
        .update_blocks_for(date, |blocks| {
            let start = start.unwrap_or_else(|| next_start_time(blocks, default_start));
            let end = end.unwrap_or_default();
            validate_time(&start)?;
            validate_time(&end)?;

            let block =
                TimeBlock::new(start, end, category).with_activity(activity.unwrap_or_default());
            blocks.push(block.clone());
            Ok(block)
        })
        .await?;
    info!("Added block {} on {date}", block.id);

    Ok(block.with_date(date))
}

pub async fn edit_block(
    storage: impl BlockStorage,
    date: NaiveDate,
    EditCommand {
        id,
        start,
        end,
        category,
        activity,
    }: EditCommand,
) -> Result<TimeBlock> {
    let edited = storage
        .update_blocks_for(date, |blocks| {
            let block = blocks
                .iter_mut()
                .find(|v| v.id == id)
                .ok_or_else(|| BlockError::Unknown(id.clone(), date))?;

            if let Some(start) = start {
                validate_time(&start)?;
                block.start_time = start;
            }
            if let Some(end) = end {
                validate_time(&end)?;
                block.end_time = end;
            }
            if let Some(category) = category {
                block.category = category;
            }
            if let Some(activity) = activity {
                block.activity = activity;
            }
            Ok(block.clone())
        })
        .await?;
    info!("Edited block {id} on {date}");
    Ok(edited)
}

pub async fn remove_block(
    storage: impl BlockStorage,
    date: NaiveDate,
    id: &str,
) -> Result<TimeBlock> {
    let removed = storage
        .update_blocks_for(date, |blocks| {
            let index = blocks
                .iter()
                .position(|v| v.id == id)
                .ok_or_else(|| BlockError::Unknown(id.to_string(), date))?;
            Ok(blocks.remove(index))
        })
        .await?;
    info!("Removed block {id} on {date}");
    Ok(removed)
}

/// Duration text of a single block, `-` while it can't be computed.
fn block_duration_text(block: &TimeBlock) -> String {
    if block.is_incomplete() {
        return "-".into();
    }
    match (parse_time(&block.start_time), parse_time(&block.end_time)) {
        (Ok(start), Ok(end)) => format_duration(minutes_between(start, end)),
        _ => "?".into(),
    }
}

pub fn print_blocks(date: NaiveDate, blocks: &[TimeBlock], catalog: &CategoryCatalog) {
    if blocks.is_empty() {
        println!("No blocks recorded on {date}");
        return;
    }
    println!("{date}");
    for block in blocks {
        println!(
            "{}\t{}-{}\t{}\t{}\t{}",
            block.id,
            block.start_time,
            if block.end_time.is_empty() {
                "..."
            } else {
                block.end_time.as_str()
            },
            block_duration_text(block),
            catalog.label_for(&block.category),
            block.activity
        );
    }
}
