//! Problem Explorer Core - categorized problem catalog for tree explorers
//!
//! Loads flat problem snapshots, derives the All / Favorite / Difficulty /
//! Tag / Company groupings and serves them to a stateless tree view.

pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod explorer;
pub mod index;
pub mod problem;
pub mod snapshot;
pub mod tree;
pub mod watcher;

pub use catalog::NodeCatalog;
pub use category::{Category, CategoryNode, Dimension, NodeKind};
pub use config::ExplorerConfig;
pub use error::{ExplorerError, FetchError};
pub use explorer::{Explorer, ProblemFetcher, TreeChanged};
pub use index::{AggregateStats, CategoryIndex};
pub use problem::{Difficulty, ProblemRecord, ProblemState};
pub use snapshot::JsonSnapshotFetcher;
pub use tree::{DisplayAttributes, IconKey, SessionFlag, SessionProvider, TreeAdapter, TreeCommand, TreeItem};
pub use watcher::{refresh_loop, WatcherStatus};
