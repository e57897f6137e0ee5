//!  Storage of a profile is organized as plain files in the profile directory.
//!  The basic idea is:
//!   - Time blocks live in `blocks/`, one json lines file per local day.
//!   - Categories are a single `categories.json`.
//!   - Reflections and weekly goals are small json documents keyed by day and week.

pub mod block_storage;
pub mod catalog;
pub mod document;
pub mod entities;
pub mod journal;

use std::path::Path;

use anyhow::Result;
use block_storage::BlockStorageImpl;
use catalog::CategoryStorage;
use journal::JournalStorage;

/// Every storage of one profile.
pub struct ProfileStorage {
    pub blocks: BlockStorageImpl,
    pub categories: CategoryStorage,
    pub journal: JournalStorage,
}

impl ProfileStorage {
    pub fn open(profile_dir: &Path) -> Result<Self> {
        Ok(Self {
            blocks: BlockStorageImpl::new(profile_dir.join("blocks"))?,
            categories: CategoryStorage::new(profile_dir.join("categories.json")),
            journal: JournalStorage::new(profile_dir.to_owned()),
        })
    }
}
