//! Turns time blocks into per category totals.
//!
//! Everything here is pure: the same blocks and policy always give the same [Aggregation].

pub mod wall_clock;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;
use wall_clock::{format_duration, minutes_between, parse_time, time_to_minutes, InvalidTimeFormat};

use crate::{storage::entities::TimeBlock, utils::percentage::Percentage};

/// What to do with a block whose time can't be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedTimePolicy {
    /// Leave the block out of the totals and report it in [Aggregation::rejected].
    #[default]
    Exclude,
    /// Read times through [wall_clock::time_to_minutes]: trailing text after the numbers is
    /// ignored, and whatever still can't be read counts as `00:00`.
    Midnight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregationPolicy {
    /// Drop blocks whose category isn't one of the registered keys.
    pub strict_categories: bool,
    pub malformed_times: MalformedTimePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub total_minutes: u32,
    pub display_text: String,
    pub percentage: Percentage,
    pub blocks: Vec<TimeBlock>,
}

impl CategoryTotal {
    fn empty() -> Self {
        Self {
            display_text: format_duration(0),
            ..Default::default()
        }
    }

    pub fn hours(&self) -> u32 {
        self.total_minutes / 60
    }

    pub fn minutes(&self) -> u32 {
        self.total_minutes % 60
    }

    /// Fractional hours rounded to two decimals, the way charts show them.
    pub fn fractional_hours(&self) -> f64 {
        (self.total_minutes as f64 / 60. * 100.).round() / 100.
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBlock {
    pub block: TimeBlock,
    pub reason: InvalidTimeFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    pub totals: BTreeMap<String, CategoryTotal>,
    pub total_tracked_minutes: u32,
    pub rejected: Vec<RejectedBlock>,
    /// Blocks dropped because their category isn't registered. Always 0 unless
    /// [AggregationPolicy::strict_categories] is set.
    pub unknown_category_blocks: usize,
}

impl Aggregation {
    /// Categories with tracked time, longest first. Ties keep key order.
    pub fn ranked(&self) -> Vec<(&str, &CategoryTotal)> {
        let mut ranked = self
            .totals
            .iter()
            .filter(|(_, total)| total.total_minutes > 0)
            .map(|(key, total)| (key.as_str(), total))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.total_minutes.cmp(&a.1.total_minutes));
        ranked
    }

    pub fn get(&self, category: &str) -> Option<&CategoryTotal> {
        self.totals.get(category)
    }
}

/// Sums durations of `blocks` per category. Every key of `category_keys` is present in the
/// result, even without any time recorded.
pub fn aggregate<'a, S: AsRef<str>>(
    blocks: impl IntoIterator<Item = &'a TimeBlock>,
    category_keys: impl IntoIterator<Item = S>,
    policy: AggregationPolicy,
) -> Aggregation {
    let mut aggregation = Aggregation::default();
    for key in category_keys {
        aggregation
            .totals
            .insert(key.as_ref().to_string(), CategoryTotal::empty());
    }

    for block in blocks {
        if block.is_incomplete() {
            trace!("Skipping incomplete block {}", block.id);
            continue;
        }

        let duration = match block_duration(block, policy.malformed_times) {
            Ok(duration) => duration,
            Err(reason) => {
                aggregation.rejected.push(RejectedBlock {
                    block: block.clone(),
                    reason,
                });
                continue;
            }
        };

        if policy.strict_categories && !aggregation.totals.contains_key(&block.category) {
            aggregation.unknown_category_blocks += 1;
            continue;
        }

        let total = aggregation
            .totals
            .entry(block.category.clone())
            .or_insert_with(CategoryTotal::empty);
        total.total_minutes += duration;
        total.blocks.push(block.clone());
    }

    aggregation.total_tracked_minutes = aggregation.totals.values().map(|v| v.total_minutes).sum();

    for total in aggregation.totals.values_mut() {
        total.display_text = format_duration(total.total_minutes);
        total.percentage =
            Percentage::share(total.total_minutes, aggregation.total_tracked_minutes);
    }

    aggregation
}

fn block_duration(
    block: &TimeBlock,
    policy: MalformedTimePolicy,
) -> Result<u32, InvalidTimeFormat> {
    match policy {
        MalformedTimePolicy::Exclude => Ok(minutes_between(
            parse_time(&block.start_time)?,
            parse_time(&block.end_time)?,
        )),
        MalformedTimePolicy::Midnight => Ok(minutes_between(
            time_to_minutes(&block.start_time),
            time_to_minutes(&block.end_time),
        )),
    }
}
