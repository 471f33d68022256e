//! Explorer - owns the catalog and publishes category index snapshots
//!
//! A refresh fetches a new problem snapshot, loads it into the catalog,
//! builds a fresh [`CategoryIndex`] and publishes it with a single swap.
//! Refreshes are serialized: one arriving while another is in flight waits
//! for it to finish. Queries never wait on a refresh; they read whatever
//! index was published last.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};

use crate::catalog::NodeCatalog;
use crate::category::{CategoryNode, NodeKind};
use crate::config::ExplorerConfig;
use crate::error::{FetchError, Result};
use crate::index::{AggregateStats, CategoryIndex};
use crate::problem::ProblemRecord;

/// Source of problem snapshots (typically a remote judge client).
pub trait ProblemFetcher: Send + Sync {
    fn fetch_problem_snapshot(
        &self,
    ) -> impl Future<Output = std::result::Result<Vec<ProblemRecord>, FetchError>> + Send;
}

/// Fired once per successful refresh. Consumers re-query the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChanged;

pub struct Explorer<F> {
    fetcher: F,
    /// Held for the whole refresh so refreshes queue behind each other
    catalog: Mutex<NodeCatalog>,
    published: watch::Sender<Arc<CategoryIndex>>,
    changes: broadcast::Sender<TreeChanged>,
}

impl<F: ProblemFetcher> Explorer<F> {
    /// Create an explorer with an empty published index.
    pub fn new(fetcher: F, config: &ExplorerConfig) -> Self {
        let (published, _) = watch::channel(Arc::new(CategoryIndex::empty()));
        let (changes, _) = broadcast::channel(config.notify_capacity.max(1));
        Self {
            fetcher,
            catalog: Mutex::new(NodeCatalog::new()),
            published,
            changes,
        }
    }

    /// Fetch, rebuild and publish, then notify subscribers.
    ///
    /// On any error the previously published index stays in place and no
    /// notification is sent.
    pub async fn refresh(&self) -> Result<()> {
        let mut catalog = self.catalog.lock().await;

        tracing::debug!("Fetching problem snapshot...");
        let records = self.fetcher.fetch_problem_snapshot().await.map_err(|e| {
            tracing::warn!("Refresh aborted, keeping last index: {}", e);
            e
        })?;

        self.publish(&mut catalog, records)
    }

    /// Load a snapshot directly, bypassing the fetcher.
    pub async fn load(&self, records: Vec<ProblemRecord>) -> Result<()> {
        let mut catalog = self.catalog.lock().await;
        self.publish(&mut catalog, records)
    }

    fn publish(&self, catalog: &mut NodeCatalog, records: Vec<ProblemRecord>) -> Result<()> {
        catalog.load(records).map_err(|e| {
            tracing::warn!("Rejected problem snapshot: {}", e);
            e
        })?;

        let index = Arc::new(CategoryIndex::build(catalog.clone()));
        tracing::info!("Published category index: {} problems", catalog.len());
        self.published.send_replace(index);

        // No subscribers is fine
        let _ = self.changes.send(TreeChanged);
        Ok(())
    }

    /// The most recently published index
    pub fn snapshot(&self) -> Arc<CategoryIndex> {
        self.published.borrow().clone()
    }

    pub fn root_nodes(&self) -> Vec<CategoryNode> {
        self.snapshot().root_nodes().to_vec()
    }

    pub fn children(&self, kind: &NodeKind) -> Vec<CategoryNode> {
        self.snapshot().children(kind).to_vec()
    }

    pub fn aggregate_stats(&self, kind: &NodeKind) -> AggregateStats {
        self.snapshot().aggregate_stats(kind)
    }

    pub fn problem(&self, id: &str) -> Option<Arc<ProblemRecord>> {
        self.snapshot().problem(id).cloned()
    }

    /// Tree-changed notifications, one per successful refresh
    pub fn subscribe(&self) -> broadcast::Receiver<TreeChanged> {
        self.changes.subscribe()
    }

    /// Follow published indexes directly
    pub fn watch_index(&self) -> watch::Receiver<Arc<CategoryIndex>> {
        self.published.subscribe()
    }
}
