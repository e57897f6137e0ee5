use std::{io::ErrorKind, path::Path};

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Reads a whole json file. A missing file is not an error.
pub async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes a whole json file through a temporary sibling, so readers never see half of it.
pub async fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let data = serde_json::to_string_pretty(value)?;
    let tmp_path = path.with_extension("tmp");
    debug!("Writing {path:?}");
    tokio::fs::write(&tmp_path, data).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}
