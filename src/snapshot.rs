//! File-backed problem fetcher
//!
//! Reads a JSON array of problem records from disk on every fetch. Used by
//! the CLI and handy for wiring an explorer against exported data.

use std::future::Future;
use std::path::PathBuf;

use crate::error::FetchError;
use crate::explorer::ProblemFetcher;
use crate::problem::ProblemRecord;

#[derive(Debug, Clone)]
pub struct JsonSnapshotFetcher {
    path: PathBuf,
}

impl JsonSnapshotFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProblemFetcher for JsonSnapshotFetcher {
    fn fetch_problem_snapshot(
        &self,
    ) -> impl Future<Output = Result<Vec<ProblemRecord>, FetchError>> + Send {
        async move {
            let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
                FetchError::new(format!("failed to read {:?}: {}", self.path, e))
            })?;
            serde_json::from_slice(&bytes).map_err(|e| {
                FetchError::new(format!("failed to parse {:?}: {}", self.path, e))
            })
        }
    }
}
