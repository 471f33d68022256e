//! Node catalog - the canonical, replace-on-refresh set of problem records

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ExplorerError, Result};
use crate::problem::ProblemRecord;

/// Snapshot of problem records in load order.
///
/// Storage is shared, so cloning a catalog is cheap and a published index can
/// hold the exact snapshot it was built from.
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    records: Arc<Vec<Arc<ProblemRecord>>>,
    positions: Arc<HashMap<String, usize>>,
}

impl NodeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and build a catalog without touching any existing one.
    pub fn from_records(records: Vec<ProblemRecord>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(records.len());

        for (pos, record) in records.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(ExplorerError::InvalidInput {
                    message: format!("record at position {} has an empty id", pos),
                });
            }
            if positions.insert(record.id.clone(), pos).is_some() {
                return Err(ExplorerError::InvalidInput {
                    message: format!("duplicate record id {:?}", record.id),
                });
            }
        }

        Ok(Self {
            records: Arc::new(records.into_iter().map(Arc::new).collect()),
            positions: Arc::new(positions),
        })
    }

    /// Replace the whole snapshot. On error the previous snapshot stays active.
    pub fn load(&mut self, records: Vec<ProblemRecord>) -> Result<()> {
        *self = Self::from_records(records)?;
        Ok(())
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Arc<ProblemRecord>> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    /// Records in the order of the last load
    pub fn all(&self) -> &[Arc<ProblemRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Difficulty;

    fn record(id: &str) -> ProblemRecord {
        ProblemRecord::new(id, format!("Problem {}", id), Difficulty::Easy)
    }

    #[test]
    fn test_load_preserves_order() {
        let mut catalog = NodeCatalog::new();
        catalog.load(vec![record("3"), record("1"), record("2")]).unwrap();

        let ids: Vec<&str> = catalog.all().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(catalog.get_by_id("1").unwrap().name, "Problem 1");
        assert!(catalog.get_by_id("4").is_none());
    }

    #[test]
    fn test_duplicate_id_keeps_previous_snapshot() {
        let mut catalog = NodeCatalog::new();
        catalog.load(vec![record("a"), record("b")]).unwrap();

        let err = catalog.load(vec![record("x"), record("x")]).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidInput { .. }));

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get_by_id("a").is_some());
        assert!(catalog.get_by_id("x").is_none());
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut catalog = NodeCatalog::new();
        let err = catalog.load(vec![record("1"), record("  ")]).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidInput { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut catalog = NodeCatalog::new();
        catalog.load(vec![record("a"), record("b")]).unwrap();
        catalog.load(vec![record("c")]).unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get_by_id("a").is_none());
        assert!(catalog.get_by_id("c").is_some());
    }

    #[test]
    fn test_clone_shares_records() {
        let catalog = NodeCatalog::from_records(vec![record("a")]).unwrap();
        let copy = catalog.clone();
        assert!(Arc::ptr_eq(&catalog.all()[0], &copy.all()[0]));
    }
}
