//! Personal time tracking built around time blocks.
//! A day is recorded as a list of blocks, each with a start, an end and a category. Blocks are
//! then summed per category into totals and shares of the tracked time for a day, a week or a
//! month.
//!

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod storage;
pub mod utils;
