//! Explorer configuration, persisted as JSON

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for the explorer and its tree adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Directory holding the problem state icons
    pub resources_dir: PathBuf,
    /// Label of the node shown when nobody is signed in
    pub sign_in_label: String,
    /// Buffered tree-changed notifications per subscriber
    pub notify_capacity: usize,
    /// Periodic refresh interval; 0 disables the refresh loop
    pub refresh_interval_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("resources"),
            sign_in_label: "Sign in to LeetCode".to_string(),
            notify_capacity: 16,
            refresh_interval_secs: 0,
        }
    }
}

impl ExplorerConfig {
    /// Load from disk, or fall back to defaults when the file does not exist
    pub fn open(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path.parent().unwrap_or(Path::new(".")))?;
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}
