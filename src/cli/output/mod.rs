pub mod analysis;
pub mod period;

use std::{future, sync::Arc};

use anyhow::Result;
use chrono::NaiveDate;
use futures::{stream, Stream, StreamExt};
use period::DateRange;
use tracing::error;

use crate::storage::{block_storage::BlockStorage, entities::TimeBlock};

/// Extracts [TimeBlock]s of every day in `range`. Days are read a few at a time, but blocks come
/// out in date order.
pub fn extract_between(
    storage: impl BlockStorage,
    range: DateRange,
) -> impl Stream<Item = Result<TimeBlock>> {
    let storage = Arc::new(storage);

    let files = date_range(range.start, range.end)
        .map(move |day| {
            let storage = storage.clone();
            async move { (day, storage.get_blocks_for(day).await) }
        })
        .buffered(4);

    files.flat_map(|(day, data)| match data {
        Ok(data) => stream::iter(data).map(Ok).boxed_local(),
        Err(e) => {
            error!("Failed to read blocks of {day} {e}");
            stream::once(future::ready(Err(e))).boxed_local()
        }
    })
}

/// Returns a stream of dates between start (inclusive) and end (inclusive).
fn date_range(start: NaiveDate, end: NaiveDate) -> impl Stream<Item = NaiveDate> {
    stream::unfold((Some(start), end), |(current, end)| {
        future::ready(match current {
            Some(current) if current <= end => Some((current, (current.succ_opt(), end))),
            _ => None,
        })
    })
}
