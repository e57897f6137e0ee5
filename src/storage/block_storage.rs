use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use crate::utils::time::date_to_record_name;

use super::entities::TimeBlock;

/// Interface for abstracting storage of time blocks. Blocks are always read and written a whole
/// day at a time.
pub trait BlockStorage {
    /// Retrieves blocks recorded for a certain day. Every returned block has its date set.
    fn get_blocks_for(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<TimeBlock>>> + Send;

    /// Replaces blocks of a certain day.
    fn save_blocks_for(
        &self,
        date: NaiveDate,
        blocks: Vec<TimeBlock>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Reads a day, lets `update` change it and writes it back. No other update of the same day
    /// can run in between. Nothing is written when `update` fails.
    fn update_blocks_for<F, R>(
        &self,
        date: NaiveDate,
        update: F,
    ) -> impl Future<Output = Result<R>> + Send
    where
        F: FnOnce(&mut Vec<TimeBlock>) -> Result<R> + Send,
        R: Send;
}

impl<T: Deref> BlockStorage for T
where
    T::Target: BlockStorage,
{
    fn get_blocks_for(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<TimeBlock>>> + Send {
        self.deref().get_blocks_for(date)
    }

    fn save_blocks_for(
        &self,
        date: NaiveDate,
        blocks: Vec<TimeBlock>,
    ) -> impl Future<Output = Result<()>> + Send {
        self.deref().save_blocks_for(date, blocks)
    }

    fn update_blocks_for<F, R>(
        &self,
        date: NaiveDate,
        update: F,
    ) -> impl Future<Output = Result<R>> + Send
    where
        F: FnOnce(&mut Vec<TimeBlock>) -> Result<R> + Send,
        R: Send,
    {
        self.deref().update_blocks_for(date, update)
    }
}

/// The main realization of [BlockStorage]. Every day is a file of json lines, one block per line.
pub struct BlockStorageImpl {
    block_dir: PathBuf,
}

impl BlockStorageImpl {
    pub fn new(block_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&block_dir)?;

        Ok(Self { block_dir })
    }

    fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.block_dir
            .join(format!("{}.jsonl", date_to_record_name(date)))
    }

    /// Decodes a whole day file. A line that isn't utf-8 or json is skipped on its own, every
    /// other line is still read.
    fn parse_day(path: &Path, data: &[u8], date: NaiveDate) -> Vec<TimeBlock> {
        data.split(|v| *v == b'\n')
            .filter_map(|line| {
                let line = match std::str::from_utf8(line) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("During parsing in path {path:?} found a line that isn't utf-8 {e}");
                        return None;
                    }
                };
                if line.trim().is_empty() {
                    return None;
                }
                match serde_json::from_str::<TimeBlock>(line) {
                    Ok(block) => Some(block.with_date(date)),
                    Err(e) => {
                        // A write cut short by a crash leaves a broken last line.
                        warn!(
                            "During parsing in path {path:?} found illegal json string {line}: {e}"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    async fn read_day(path: &Path, date: NaiveDate) -> Result<Vec<TimeBlock>> {
        debug!("Extracting {path:?}");
        let mut file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut data = vec![];
        let read = file.read_to_end(&mut data).await;
        file.unlock_async().await?;
        read?;

        Ok(Self::parse_day(path, &data, date))
    }

    async fn write_day(file: &mut File, blocks: Vec<TimeBlock>) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        for block in blocks {
            // The date is implied by the file name.
            serde_json::to_writer(&mut buffer, &TimeBlock { date: None, ..block })?;
            buffer.push(b'\n');
        }

        file.set_len(0).await?;
        file.rewind().await?;
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }

    async fn update_day<F, R>(
        file: &mut File,
        path: &Path,
        date: NaiveDate,
        update: F,
    ) -> Result<R>
    where
        F: FnOnce(&mut Vec<TimeBlock>) -> Result<R>,
    {
        let mut data = vec![];
        file.read_to_end(&mut data).await?;
        let mut blocks = Self::parse_day(path, &data, date);

        let value = update(&mut blocks)?;
        Self::write_day(file, blocks).await?;
        Ok(value)
    }

    async fn open_day(path: &Path) -> Result<File> {
        Ok(File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(path)
            .await?)
    }
}

impl BlockStorage for BlockStorageImpl {
    async fn get_blocks_for(&self, date: NaiveDate) -> Result<Vec<TimeBlock>> {
        let path = self.day_path(date);
        Self::read_day(&path, date).await
    }

    async fn save_blocks_for(&self, date: NaiveDate, blocks: Vec<TimeBlock>) -> Result<()> {
        let path = self.day_path(date);
        debug!("Saving {} blocks into {path:?}", blocks.len());

        let mut file = Self::open_day(&path).await?;
        // Truncation happens only after the lock is held.
        file.lock_exclusive()?;
        let result = Self::write_day(&mut file, blocks).await;
        file.unlock_async().await?;
        result
    }

    async fn update_blocks_for<F, R>(&self, date: NaiveDate, update: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<TimeBlock>) -> Result<R> + Send,
        R: Send,
    {
        let path = self.day_path(date);
        debug!("Updating {path:?}");

        let mut file = Self::open_day(&path).await?;
        // Held from the read until the write.
        file.lock_exclusive()?;
        let result = Self::update_day(&mut file, &path, date, update).await;
        file.unlock_async().await?;
        result
    }
}
