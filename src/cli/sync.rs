use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{info, instrument, warn};

use crate::{
    aggregate::wall_clock::calculate_duration,
    storage::{block_storage::BlockStorage, entities::TimeBlock},
    utils::time::date_to_record_name,
};

use super::output::{extract_between, period::DateRange};

/// One block as a spreadsheet row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SheetRow {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    #[serde(default)]
    pub activity: String,
    /// Decimal hours with two digits, `1.50`.
    #[serde(default)]
    pub hours: String,
}

impl SheetRow {
    fn from_block(date: NaiveDate, block: TimeBlock) -> Self {
        let hours = if block.is_incomplete() {
            0.
        } else {
            calculate_duration(&block.start_time, &block.end_time) as f64 / 60.
        };
        Self {
            date: date_to_record_name(date),
            start_time: block.start_time,
            end_time: block.end_time,
            category: block.category,
            activity: block.activity,
            hours: format!("{hours:.2}"),
        }
    }

    fn into_block(self) -> TimeBlock {
        TimeBlock::new(self.start_time, self.end_time, self.category).with_activity(self.activity)
    }
}

#[derive(Debug, clap::Args)]
pub struct ExportCommand {
    #[arg(long, short, help = "First day to export. Defaults to the selected date")]
    pub from: Option<String>,
    #[arg(long, short, help = "Last day to export. Defaults to the selected date")]
    pub to: Option<String>,
    #[arg(long, short, help = "File to write. Prints to stdout when absent")]
    pub output: Option<PathBuf>,
}

#[instrument(skip(storage))]
pub async fn export_rows(storage: impl BlockStorage, range: DateRange) -> Result<Vec<SheetRow>> {
    extract_between(storage, range)
        .map_ok(|block| {
            let date = block.date.unwrap_or(range.start);
            SheetRow::from_block(date, block)
        })
        .try_collect()
        .await
}

/// Appends rows to the blocks of their days. Returns how many rows were imported.
#[instrument(skip_all)]
pub async fn import_rows(storage: impl BlockStorage, rows: Vec<SheetRow>) -> Result<usize> {
    let mut days = BTreeMap::<NaiveDate, Vec<TimeBlock>>::new();
    for row in rows {
        match NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d") {
            Ok(date) => days.entry(date).or_default().push(row.into_block()),
            Err(e) => warn!("Skipping row with date {:?} {e}", row.date),
        }
    }

    let mut imported = 0;
    for (date, new_blocks) in days {
        imported += storage
            .update_blocks_for(date, |blocks| {
                let count = new_blocks.len();
                blocks.extend(new_blocks);
                Ok(count)
            })
            .await?;
    }
    info!("Imported {imported} blocks");
    Ok(imported)
}

pub async fn write_rows(rows: &[SheetRow], output: Option<PathBuf>) -> Result<()> {
    let data = serde_json::to_string_pretty(rows)?;
    match output {
        Some(path) => {
            let mut file = File::create(&path).await?;
            file.write_all(data.as_bytes()).await?;
            file.flush().await?;
            info!("Exported {} rows to {path:?}", rows.len());
        }
        None => println!("{data}"),
    }
    Ok(())
}

pub async fn read_rows(path: PathBuf) -> Result<Vec<SheetRow>> {
    let data = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;
    use crate::storage::block_storage::memory::MemoryBlockStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_export_rows() -> Result<()> {
        let storage = MemoryBlockStorage::default();
        storage
            .save_blocks_for(
                date(2025, 3, 10),
                vec![
                    TimeBlock::new("09:00", "10:30", "work").with_activity("review"),
                    TimeBlock::new("23:00", "00:20", "rest"),
                ],
            )
            .await?;
        storage
            .save_blocks_for(date(2025, 3, 11), vec![TimeBlock::new("09:00", "", "work")])
            .await?;

        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 11));
        let rows = export_rows(&storage, range).await?;

        let hours = rows.iter().map(|v| v.hours.as_str()).collect::<Vec<_>>();
        assert_eq!(hours, vec!["1.50", "1.33", "0.00"]);
        assert_eq!(rows[0].date, "2025-03-10");
        assert_eq!(rows[0].activity, "review");
        assert_eq!(rows[2].date, "2025-03-11");
        Ok(())
    }

    #[tokio::test]
    async fn test_import_rows_appends_and_skips_bad_dates() -> Result<()> {
        let storage = MemoryBlockStorage::default();
        let existing = TimeBlock::new("08:00", "09:00", "exercise");
        storage
            .save_blocks_for(date(2025, 3, 10), vec![existing.clone()])
            .await?;

        let row = |date: &str, start: &str| SheetRow {
            date: date.into(),
            start_time: start.into(),
            end_time: "12:00".into(),
            category: "work".into(),
            activity: String::new(),
            hours: String::new(),
        };
        let imported = import_rows(
            &storage,
            vec![
                row("2025-03-10", "10:00"),
                row("10 March", "10:00"),
                row("2025-03-12", "11:00"),
            ],
        )
        .await?;

        assert_eq!(imported, 2);
        let blocks = storage.get_blocks_for(date(2025, 3, 10)).await?;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id, existing.id);
        assert_ne!(blocks[1].id, existing.id);
        assert_eq!(storage.get_blocks_for(date(2025, 3, 12)).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rows_file_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("sheet.json");
        let rows = vec![SheetRow::from_block(
            date(2025, 3, 10),
            TimeBlock::new("09:00", "10:00", "work"),
        )];

        write_rows(&rows, Some(path.clone())).await?;
        assert_eq!(read_rows(path).await?, rows);
        Ok(())
    }
}
