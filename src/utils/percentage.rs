use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Whole percent in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u32);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);

    pub fn new_opt(value: u32) -> Option<Percentage> {
        if value > 100 {
            None
        } else {
            Some(Percentage(value))
        }
    }

    /// Share of `value` in `whole`, rounded half up. An empty whole has no share.
    pub fn share(value: u32, whole: u32) -> Percentage {
        if whole == 0 {
            return Percentage::ZERO;
        }
        let value = value.min(whole) as u64;
        let whole = whole as u64;
        Percentage(((value * 200 + whole) / (whole * 2)) as u32)
    }
}

impl FromStr for Percentage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_end_matches('%');
        let v = s.parse::<u32>()?;
        Percentage::new_opt(v).ok_or_else(|| anyhow!("Can't parse {s} into percentage"))
    }
}

impl Deref for Percentage {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
