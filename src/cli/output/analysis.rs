use anyhow::Result;
use chrono::NaiveDate;
use futures::TryStreamExt;
use tracing::{debug, instrument};

use crate::{
    aggregate::{aggregate, Aggregation, AggregationPolicy},
    storage::block_storage::BlockStorage,
};

use super::{
    extract_between,
    period::{Bucket, DateRange, Period},
};

#[derive(Debug)]
pub struct PeriodReport {
    pub period: Period,
    pub range: DateRange,
    pub overall: Aggregation,
    pub breakdown: Vec<(Bucket, Aggregation)>,
}

/// Aggregates every block of the period containing `reference`, as a whole and per bucket of
/// [Period::buckets].
#[instrument(skip(storage, category_keys))]
pub async fn analyze_period(
    storage: impl BlockStorage,
    category_keys: &[String],
    policy: AggregationPolicy,
    period: Period,
    reference: NaiveDate,
) -> Result<PeriodReport> {
    let range = period.range(reference);
    let blocks = extract_between(storage, range)
        .try_collect::<Vec<_>>()
        .await?;
    debug!("Analyzing {} blocks of {range}", blocks.len());

    let overall = aggregate(&blocks, category_keys, policy);
    let breakdown = period
        .buckets(range)
        .into_iter()
        .map(|bucket| {
            let in_bucket = blocks
                .iter()
                .filter(|v| v.date.is_some_and(|date| bucket.range.contains(date)));
            let aggregation = aggregate(in_bucket, category_keys, policy);
            (bucket, aggregation)
        })
        .collect();

    Ok(PeriodReport {
        period,
        range,
        overall,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use anyhow::Result;
    use chrono::NaiveDate;
    use tracing::Level;

    use super::*;
    use crate::storage::{block_storage::memory::MemoryBlockStorage, entities::TimeBlock};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn keys() -> Vec<String> {
        vec!["work".into(), "study".into()]
    }

    async fn seeded() -> Result<MemoryBlockStorage> {
        let storage = MemoryBlockStorage::default();
        storage
            .save_blocks_for(
                date(2025, 3, 10),
                vec![
                    TimeBlock::new("09:00", "12:00", "work"),
                    TimeBlock::new("13:00", "14:30", "study"),
                ],
            )
            .await?;
        storage
            .save_blocks_for(
                date(2025, 3, 12),
                vec![TimeBlock::new("22:00", "23:00", "work")],
            )
            .await?;
        // Previous week
        storage
            .save_blocks_for(
                date(2025, 3, 9),
                vec![TimeBlock::new("08:00", "18:00", "work")],
            )
            .await?;
        Ok(storage)
    }

    #[tokio::test]
    async fn test_analyze_week() -> Result<()> {
        let storage = seeded().await?;
        let report = analyze_period(
            &storage,
            &keys(),
            AggregationPolicy::default(),
            Period::Week,
            date(2025, 3, 14),
        )
        .await?;

        assert_eq!(report.overall.total_tracked_minutes, 330);
        assert_eq!(*report.overall.get("work").unwrap().percentage, 73);
        assert_eq!(report.breakdown.len(), 7);
        assert_eq!(report.breakdown[0].1.total_tracked_minutes, 270);
        assert_eq!(report.breakdown[1].1.total_tracked_minutes, 0);
        assert_eq!(report.breakdown[2].1.total_tracked_minutes, 60);
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze_day() -> Result<()> {
        let storage = seeded().await?;
        let report = analyze_period(
            &storage,
            &keys(),
            AggregationPolicy::default(),
            Period::Day,
            date(2025, 3, 9),
        )
        .await?;

        assert_eq!(report.overall.get("work").unwrap().display_text, "10시간");
        assert_eq!(report.overall.get("study").unwrap().total_minutes, 0);
        assert!(report.breakdown.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze_month() -> Result<()> {
        let storage = seeded().await?;
        let report = analyze_period(
            &storage,
            &keys(),
            AggregationPolicy::default(),
            Period::Month,
            date(2025, 3, 1),
        )
        .await?;

        assert_eq!(report.overall.total_tracked_minutes, 930);
        assert_eq!(report.breakdown[1].0.label, "2주차");
        // 8th to 14th
        assert_eq!(report.breakdown[1].1.total_tracked_minutes, 930);
        Ok(())
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_analysis_runs_inside_its_span() -> Result<()> {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let storage = seeded().await?;
        analyze_period(
            &storage,
            &keys(),
            AggregationPolicy::default(),
            Period::Week,
            date(2025, 3, 14),
        )
        .await?;

        let output = String::from_utf8(logs.0.lock().unwrap().clone())?;
        let line = output
            .lines()
            .find(|v| v.contains("Analyzing"))
            .unwrap();
        assert!(line.contains("analyze_period"), "{line}");
        Ok(())
    }
}
