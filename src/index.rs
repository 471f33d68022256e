//! Category index - derived groupings over a catalog snapshot
//!
//! An index is built in full from one [`NodeCatalog`] and never mutated
//! afterwards. Refreshing builds a new index and swaps it in, so a reader
//! holding an `Arc<CategoryIndex>` always sees one consistent snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::catalog::NodeCatalog;
use crate::category::{Category, CategoryNode, Dimension, NodeKind};
use crate::problem::{Difficulty, ProblemRecord, ProblemState};

/// Accepted / failed / total counts for a set of problems
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub accepted: usize,
    pub failed: usize,
    pub total: usize,
}

impl AggregateStats {
    pub fn from_problems<'a, I>(problems: I) -> Self
    where
        I: IntoIterator<Item = &'a ProblemRecord>,
    {
        let mut stats = Self::default();
        for problem in problems {
            match problem.state {
                ProblemState::AC => stats.accepted += 1,
                ProblemState::NotAC => stats.failed += 1,
                ProblemState::Unknown => {}
            }
            stats.total += 1;
        }
        stats
    }
}

/// Tooltip text: one line per counter.
impl fmt::Display for AggregateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AC: {}\nFailed: {}\nTotal: {}",
            self.accepted, self.failed, self.total
        )
    }
}

/// Subgroups of one dimension in display order, plus their members
#[derive(Debug, Default)]
struct Grouping {
    subgroups: Vec<CategoryNode>,
    members: HashMap<String, Vec<CategoryNode>>,
}

impl Grouping {
    /// `groups` must already be in display order.
    fn new(dimension: Dimension, groups: Vec<(String, Vec<CategoryNode>)>) -> Self {
        let mut subgroups = Vec::with_capacity(groups.len());
        let mut members = HashMap::with_capacity(groups.len());
        for (key, leaves) in groups {
            subgroups.push(CategoryNode::subgroup(dimension, key.clone()));
            members.insert(key, leaves);
        }
        Self { subgroups, members }
    }

    /// Keyed by free-form strings (tags, companies): lexicographic order.
    fn keyed_by<'a, F, K>(dimension: Dimension, catalog: &'a NodeCatalog, keys: F) -> Self
    where
        F: Fn(&'a ProblemRecord) -> K,
        K: IntoIterator<Item = &'a String>,
    {
        let mut buckets: HashMap<&'a str, Vec<CategoryNode>> = HashMap::new();
        for record in catalog.all() {
            for key in keys(&**record) {
                buckets
                    .entry(key.as_str())
                    .or_default()
                    .push(CategoryNode::leaf(record.clone()));
            }
        }

        let mut groups: Vec<(String, Vec<CategoryNode>)> = buckets
            .into_iter()
            .map(|(key, leaves)| (key.to_string(), leaves))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        Self::new(dimension, groups)
    }

    /// Difficulty groups come out Easy, Medium, Hard; absent levels are skipped.
    fn by_difficulty(catalog: &NodeCatalog) -> Self {
        let mut buckets: HashMap<Difficulty, Vec<CategoryNode>> = HashMap::new();
        for record in catalog.all() {
            buckets
                .entry(record.difficulty)
                .or_default()
                .push(CategoryNode::leaf(record.clone()));
        }

        let groups = Difficulty::ALL
            .into_iter()
            .filter_map(|d| buckets.remove(&d).map(|leaves| (d.as_str().to_string(), leaves)))
            .collect();

        Self::new(Dimension::Difficulty, groups)
    }

    fn leaves(&self, key: &str) -> &[CategoryNode] {
        self.members.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Immutable set of derived groupings over one catalog snapshot.
#[derive(Debug)]
pub struct CategoryIndex {
    catalog: NodeCatalog,
    roots: Vec<CategoryNode>,
    all: Vec<CategoryNode>,
    favorites: Vec<CategoryNode>,
    difficulty: Grouping,
    tag: Grouping,
    company: Grouping,
}

impl CategoryIndex {
    /// Derive every grouping from `catalog`.
    pub fn build(catalog: NodeCatalog) -> Self {
        let all: Vec<CategoryNode> = catalog
            .all()
            .iter()
            .map(|r| CategoryNode::leaf(r.clone()))
            .collect();

        let favorites: Vec<CategoryNode> = catalog
            .all()
            .iter()
            .filter(|r| r.is_favorite)
            .map(|r| CategoryNode::leaf(r.clone()))
            .collect();

        let difficulty = Grouping::by_difficulty(&catalog);
        let tag = Grouping::keyed_by(Dimension::Tag, &catalog, |r| &r.tags);
        let company = Grouping::keyed_by(Dimension::Company, &catalog, |r| &r.companies);

        tracing::debug!(
            "Built category index: {} problems, {} favorites, {} difficulties, {} tags, {} companies",
            all.len(),
            favorites.len(),
            difficulty.subgroups.len(),
            tag.subgroups.len(),
            company.subgroups.len()
        );

        Self {
            catalog,
            roots: Category::ALL.into_iter().map(CategoryNode::top_level).collect(),
            all,
            favorites,
            difficulty,
            tag,
            company,
        }
    }

    /// An index over an empty catalog
    pub fn empty() -> Self {
        Self::build(NodeCatalog::new())
    }

    /// Snapshot this index was built from
    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn problem(&self, id: &str) -> Option<&Arc<ProblemRecord>> {
        self.catalog.get_by_id(id)
    }

    /// The five top-level categories in fixed order
    pub fn root_nodes(&self) -> &[CategoryNode] {
        &self.roots
    }

    /// Children of a node. Unknown ids and leaves have none.
    pub fn children(&self, kind: &NodeKind) -> &[CategoryNode] {
        match kind {
            NodeKind::Root => self.roots.as_slice(),
            NodeKind::SignIn | NodeKind::Leaf(_) => &[],
            NodeKind::TopLevel(Category::All) => self.all.as_slice(),
            NodeKind::TopLevel(Category::Favorite) => self.favorites.as_slice(),
            NodeKind::TopLevel(category) => match category.dimension() {
                Some(dimension) => self.grouping(dimension).subgroups.as_slice(),
                None => &[],
            },
            NodeKind::Subgroup(dimension, key) => self.grouping(*dimension).leaves(key),
        }
    }

    /// Count problems under a node by state. Computed on every call.
    ///
    /// A problem listed under several subgroups of one dimension is counted
    /// once for the top-level node of that dimension.
    pub fn aggregate_stats(&self, kind: &NodeKind) -> AggregateStats {
        let records = self.catalog.all().iter().map(|r| &**r);
        match kind {
            NodeKind::Root | NodeKind::TopLevel(Category::All) => {
                AggregateStats::from_problems(records)
            }
            NodeKind::SignIn => AggregateStats::default(),
            NodeKind::TopLevel(Category::Favorite) => {
                AggregateStats::from_problems(records.filter(|r| r.is_favorite))
            }
            NodeKind::TopLevel(Category::Difficulty) => AggregateStats::from_problems(records),
            NodeKind::TopLevel(Category::Tag) => {
                AggregateStats::from_problems(records.filter(|r| !r.tags.is_empty()))
            }
            NodeKind::TopLevel(Category::Company) => {
                AggregateStats::from_problems(records.filter(|r| !r.companies.is_empty()))
            }
            NodeKind::Subgroup(..) => AggregateStats::from_problems(
                self.children(kind)
                    .iter()
                    .filter_map(|n| n.problem().map(|p| &**p)),
            ),
            NodeKind::Leaf(id) => {
                AggregateStats::from_problems(self.catalog.get_by_id(id).map(|p| &**p))
            }
        }
    }

    fn grouping(&self, dimension: Dimension) -> &Grouping {
        match dimension {
            Dimension::Difficulty => &self.difficulty,
            Dimension::Tag => &self.tag,
            Dimension::Company => &self.company,
        }
    }
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self::empty()
    }
}
