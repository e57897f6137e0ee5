use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::{wall_clock::parse_time, AggregationPolicy, MalformedTimePolicy},
    storage::document::{read_document, write_document},
};

/// `config.json` in the application directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub strict_categories: bool,
    pub malformed_times: MalformedTimePolicy,
    /// Start of the first block of a day when nothing else is known.
    pub default_start_time: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_categories: false,
            malformed_times: MalformedTimePolicy::Exclude,
            default_start_time: "09:00".into(),
        }
    }
}

impl Config {
    pub fn policy(&self) -> AggregationPolicy {
        AggregationPolicy {
            strict_categories: self.strict_categories,
            malformed_times: self.malformed_times,
        }
    }
}

/// Loads the configuration, writing the defaults on first use.
pub async fn load_config(application_path: &Path) -> Result<Config> {
    let path = application_path.join("config.json");
    let config = match read_document::<Config>(&path).await? {
        Some(config) => config,
        None => {
            let config = Config::default();
            write_document(&path, &config).await?;
            config
        }
    };
    parse_time(&config.default_start_time)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_load_config_creates_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_config(dir.path()).await?;

        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_config_partial_file() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"strictCategories": true, "malformedTimes": "midnight"}"#,
        )?;

        let config = load_config(dir.path()).await?;
        assert!(config.strict_categories);
        assert_eq!(config.malformed_times, MalformedTimePolicy::Midnight);
        assert_eq!(config.default_start_time, "09:00");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_config_rejects_bad_start() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"defaultStartTime": "nine"}"#,
        )?;

        assert!(load_config(dir.path()).await.is_err());
        Ok(())
    }
}
