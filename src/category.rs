//! Category nodes - the tagged node kinds shown in the explorer tree

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::problem::{Difficulty, ProblemRecord, ProblemState};

/// The fixed top-level categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    All,
    Favorite,
    Difficulty,
    Tag,
    Company,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::All,
        Category::Favorite,
        Category::Difficulty,
        Category::Tag,
        Category::Company,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Favorite => "Favorite",
            Category::Difficulty => "Difficulty",
            Category::Tag => "Tag",
            Category::Company => "Company",
        }
    }

    /// Grouping dimension with an intermediate subgroup layer, if any.
    /// All and Favorite list problems directly.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Category::All | Category::Favorite => None,
            Category::Difficulty => Some(Dimension::Difficulty),
            Category::Tag => Some(Dimension::Tag),
            Category::Company => Some(Dimension::Company),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimension a subgroup is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Difficulty,
    Tag,
    Company,
}

impl Dimension {
    pub fn category(&self) -> Category {
        match self {
            Dimension::Difficulty => Category::Difficulty,
            Dimension::Tag => Category::Tag,
            Dimension::Company => Category::Company,
        }
    }
}

/// What a node in the tree stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    /// Synthetic node shown instead of the tree when nobody is signed in
    SignIn,
    TopLevel(Category),
    Subgroup(Dimension, String),
    Leaf(String),
}

impl NodeKind {
    pub fn subgroup(dimension: Dimension, key: impl Into<String>) -> Self {
        NodeKind::Subgroup(dimension, key.into())
    }

    pub fn leaf(id: impl Into<String>) -> Self {
        NodeKind::Leaf(id.into())
    }
}

/// A node of the explorer tree.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    kind: NodeKind,
    name: String,
    problem: Option<Arc<ProblemRecord>>,
}

impl CategoryNode {
    pub fn top_level(category: Category) -> Self {
        Self {
            kind: NodeKind::TopLevel(category),
            name: category.as_str().to_string(),
            problem: None,
        }
    }

    pub fn subgroup(dimension: Dimension, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            kind: NodeKind::Subgroup(dimension, key),
            problem: None,
        }
    }

    pub fn leaf(problem: Arc<ProblemRecord>) -> Self {
        Self {
            kind: NodeKind::Leaf(problem.id.clone()),
            name: problem.name.clone(),
            problem: Some(problem),
        }
    }

    pub fn sign_in(label: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::SignIn,
            name: label.into(),
            problem: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Fixed key for top-level nodes, group key for subgroups, problem id for leaves.
    pub fn id(&self) -> &str {
        match &self.kind {
            NodeKind::Root => "ROOT",
            NodeKind::SignIn => "notSignIn",
            NodeKind::TopLevel(category) => category.as_str(),
            NodeKind::Subgroup(_, key) => key,
            NodeKind::Leaf(id) => id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_problem(&self) -> bool {
        self.problem.is_some()
    }

    pub fn problem(&self) -> Option<&Arc<ProblemRecord>> {
        self.problem.as_ref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.problem.as_ref().map(|p| p.difficulty)
    }

    pub fn state(&self) -> Option<ProblemState> {
        self.problem.as_ref().map(|p| p.state)
    }

    pub fn locked(&self) -> bool {
        self.problem.as_ref().is_some_and(|p| p.locked)
    }
}
