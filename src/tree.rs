//! Tree adapter - stateless view over the published category index
//!
//! Maps "children of X" onto one [`CategoryIndex`] query and derives display
//! attributes (label, icon, tooltip, command) for each node. Nothing here
//! holds tree state; every answer is recomputed from the index passed in.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::category::{CategoryNode, NodeKind};
use crate::config::ExplorerConfig;
use crate::index::CategoryIndex;
use crate::problem::{Difficulty, ProblemState};

/// Answers whether a user is currently signed in.
pub trait SessionProvider {
    fn has_active_session(&self) -> bool;
}

impl<F> SessionProvider for F
where
    F: Fn() -> bool,
{
    fn has_active_session(&self) -> bool {
        self()
    }
}

/// Shared, switchable session state
#[derive(Debug, Clone, Default)]
pub struct SessionFlag(Arc<AtomicBool>);

impl SessionFlag {
    pub fn new(signed_in: bool) -> Self {
        Self(Arc::new(AtomicBool::new(signed_in)))
    }

    pub fn set(&self, signed_in: bool) {
        self.0.store(signed_in, Ordering::SeqCst);
    }
}

impl SessionProvider for SessionFlag {
    fn has_active_session(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Icon variants for problem leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IconKey {
    CheckEasy,
    CheckMedium,
    CheckHard,
    Cross,
    Lock,
    Blank,
}

impl IconKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            IconKey::CheckEasy => "check-grn.png",
            IconKey::CheckMedium => "check-org.png",
            IconKey::CheckHard => "check-red.png",
            IconKey::Cross => "x.png",
            IconKey::Lock => "lock.png",
            IconKey::Blank => "blank.png",
        }
    }

    /// Icon for a problem in the given state
    pub fn for_problem(state: ProblemState, locked: bool, difficulty: Difficulty) -> Self {
        match state {
            ProblemState::AC => match difficulty {
                Difficulty::Easy => IconKey::CheckEasy,
                Difficulty::Medium => IconKey::CheckMedium,
                Difficulty::Hard => IconKey::CheckHard,
            },
            ProblemState::NotAC => IconKey::Cross,
            ProblemState::Unknown if locked => IconKey::Lock,
            ProblemState::Unknown => IconKey::Blank,
        }
    }
}

/// Command attached to a clickable node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCommand {
    SignIn,
    Preview(String),
}

impl TreeCommand {
    pub fn command_id(&self) -> &'static str {
        match self {
            TreeCommand::SignIn => "leetcode.signin",
            TreeCommand::Preview(_) => "leetcode.previewProblem",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TreeCommand::SignIn => "Sign in to LeetCode",
            TreeCommand::Preview(_) => "Preview Problem",
        }
    }

    pub fn arguments(&self) -> &[String] {
        match self {
            TreeCommand::SignIn => &[],
            TreeCommand::Preview(id) => std::slice::from_ref(id),
        }
    }
}

/// Serialized as `{command, title, arguments}` with the command id.
impl Serialize for TreeCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TreeCommand", 3)?;
        state.serialize_field("command", self.command_id())?;
        state.serialize_field("title", self.title())?;
        state.serialize_field("arguments", self.arguments())?;
        state.end()
    }
}

/// Rendering-relevant facts about a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayAttributes {
    pub icon: Option<IconKey>,
    pub collapsible: bool,
    pub tooltip: bool,
}

impl DisplayAttributes {
    pub fn of(node: &CategoryNode) -> Self {
        if let Some(problem) = node.problem() {
            return Self {
                icon: Some(IconKey::for_problem(problem.state, problem.locked, problem.difficulty)),
                collapsible: false,
                tooltip: false,
            };
        }
        match node.kind() {
            NodeKind::SignIn => Self {
                icon: None,
                collapsible: false,
                tooltip: false,
            },
            kind => Self {
                icon: None,
                collapsible: true,
                tooltip: matches!(kind, NodeKind::Subgroup(..)),
            },
        }
    }
}

/// Fully resolved item handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub collapsible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<TreeCommand>,
}

/// Stateless tree view over a [`CategoryIndex`]
pub struct TreeAdapter<S> {
    session: S,
    sign_in_label: String,
    resources_dir: PathBuf,
}

impl<S: SessionProvider> TreeAdapter<S> {
    pub fn new(session: S, config: &ExplorerConfig) -> Self {
        Self {
            session,
            sign_in_label: config.sign_in_label.clone(),
            resources_dir: config.resources_dir.clone(),
        }
    }

    /// Children of `parent`, or the top-level categories when `parent` is `None`.
    ///
    /// Without an active session the only node is the sign-in affordance.
    pub fn children(&self, index: &CategoryIndex, parent: Option<&CategoryNode>) -> Vec<CategoryNode> {
        if !self.session.has_active_session() {
            return vec![CategoryNode::sign_in(self.sign_in_label.as_str())];
        }
        match parent {
            None => index.root_nodes().to_vec(),
            Some(node) => index.children(node.kind()).to_vec(),
        }
    }

    pub fn tree_item(&self, index: &CategoryIndex, node: &CategoryNode) -> TreeItem {
        if matches!(node.kind(), NodeKind::SignIn) {
            return TreeItem {
                label: node.name().to_string(),
                tooltip: None,
                collapsible: false,
                context_value: None,
                icon: None,
                command: Some(TreeCommand::SignIn),
            };
        }

        let attrs = DisplayAttributes::of(node);
        let label = match node.problem() {
            Some(problem) => format!("[{}][{}] {}", problem.id, problem.difficulty, problem.name),
            None => node.name().to_string(),
        };
        let context_value = if node.is_problem() {
            "problem".to_string()
        } else {
            node.id().to_lowercase()
        };

        TreeItem {
            label,
            tooltip: attrs
                .tooltip
                .then(|| index.aggregate_stats(node.kind()).to_string()),
            collapsible: attrs.collapsible,
            context_value: Some(context_value),
            icon: attrs.icon.map(|icon| self.resources_dir.join(icon.file_name())),
            command: node
                .problem()
                .map(|problem| TreeCommand::Preview(problem.id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NodeCatalog;
    use crate::category::{Category, Dimension};
    use crate::problem::ProblemRecord;

    fn make_index() -> CategoryIndex {
        let records = vec![
            ProblemRecord::new("1", "Two Sum", Difficulty::Easy)
                .with_state(ProblemState::AC)
                .with_tags(["dp"]),
            ProblemRecord::new("2", "Jump Game II", Difficulty::Hard)
                .with_state(ProblemState::NotAC)
                .with_tags(["dp", "greedy"]),
            ProblemRecord::new("3", "Paint House", Difficulty::Medium).locked(),
        ];
        CategoryIndex::build(NodeCatalog::from_records(records).unwrap())
    }

    fn make_adapter(signed_in: bool) -> (TreeAdapter<SessionFlag>, SessionFlag) {
        let flag = SessionFlag::new(signed_in);
        let config = ExplorerConfig {
            resources_dir: PathBuf::from("/ext/resources"),
            ..ExplorerConfig::default()
        };
        (TreeAdapter::new(flag.clone(), &config), flag)
    }

    #[test]
    fn test_signed_out_shows_only_sign_in() {
        let index = make_index();
        let (adapter, _) = make_adapter(false);

        let roots = adapter.children(&index, None);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind(), &NodeKind::SignIn);

        let tag = CategoryNode::top_level(Category::Tag);
        let children = adapter.children(&index, Some(&tag));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), &NodeKind::SignIn);

        let item = adapter.tree_item(&index, &roots[0]);
        assert_eq!(item.label, "Sign in to LeetCode");
        assert!(!item.collapsible);
        assert_eq!(item.command, Some(TreeCommand::SignIn));
        assert!(item.icon.is_none());
    }

    #[test]
    fn test_sign_in_switches_to_categories() {
        let index = make_index();
        let (adapter, flag) = make_adapter(false);
        assert_eq!(adapter.children(&index, None).len(), 1);

        flag.set(true);
        let roots = adapter.children(&index, None);
        let names: Vec<&str> = roots.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["All", "Favorite", "Difficulty", "Tag", "Company"]);
    }

    #[test]
    fn test_closure_session_provider() {
        let index = make_index();
        let adapter = TreeAdapter::new(|| true, &ExplorerConfig::default());
        assert_eq!(adapter.children(&index, None).len(), 5);
    }

    #[test]
    fn test_icon_mapping() {
        assert_eq!(
            IconKey::for_problem(ProblemState::AC, false, Difficulty::Easy),
            IconKey::CheckEasy
        );
        assert_eq!(
            IconKey::for_problem(ProblemState::AC, true, Difficulty::Medium),
            IconKey::CheckMedium
        );
        assert_eq!(
            IconKey::for_problem(ProblemState::AC, false, Difficulty::Hard),
            IconKey::CheckHard
        );
        assert_eq!(
            IconKey::for_problem(ProblemState::NotAC, true, Difficulty::Easy),
            IconKey::Cross
        );
        assert_eq!(
            IconKey::for_problem(ProblemState::Unknown, true, Difficulty::Easy),
            IconKey::Lock
        );
        assert_eq!(
            IconKey::for_problem(ProblemState::Unknown, false, Difficulty::Easy),
            IconKey::Blank
        );
    }

    #[test]
    fn test_leaf_item() {
        let index = make_index();
        let (adapter, _) = make_adapter(true);
        let leaf = CategoryNode::leaf(index.problem("3").unwrap().clone());

        let item = adapter.tree_item(&index, &leaf);
        assert_eq!(item.label, "[3][Medium] Paint House");
        assert!(!item.collapsible);
        assert!(item.tooltip.is_none());
        assert_eq!(item.context_value.as_deref(), Some("problem"));
        assert_eq!(item.icon, Some(PathBuf::from("/ext/resources/lock.png")));
        assert_eq!(item.command, Some(TreeCommand::Preview("3".to_string())));
    }

    #[test]
    fn test_subgroup_tooltip() {
        let index = make_index();
        let (adapter, _) = make_adapter(true);

        let tag = CategoryNode::top_level(Category::Tag);
        let groups = adapter.children(&index, Some(&tag));
        let dp = groups.iter().find(|n| n.id() == "dp").unwrap();

        let item = adapter.tree_item(&index, dp);
        assert_eq!(item.tooltip.as_deref(), Some("AC: 1\nFailed: 1\nTotal: 2"));
        assert!(item.collapsible);
        assert_eq!(item.context_value.as_deref(), Some("dp"));
        assert!(item.icon.is_none());
        assert!(item.command.is_none());
    }

    #[test]
    fn test_top_level_has_no_tooltip() {
        let index = make_index();
        let (adapter, _) = make_adapter(true);

        let item = adapter.tree_item(&index, &CategoryNode::top_level(Category::Difficulty));
        assert!(item.tooltip.is_none());
        assert!(item.collapsible);
        assert_eq!(item.context_value.as_deref(), Some("difficulty"));
    }

    #[test]
    fn test_command_serializes_command_id() {
        let json = serde_json::to_value(TreeCommand::SignIn).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "command": "leetcode.signin",
                "title": "Sign in to LeetCode",
                "arguments": [],
            })
        );

        let json = serde_json::to_value(TreeCommand::Preview("3".to_string())).unwrap();
        assert_eq!(json["command"], "leetcode.previewProblem");
        assert_eq!(json["title"], "Preview Problem");
        assert_eq!(json["arguments"], serde_json::json!(["3"]));
    }

    #[test]
    fn test_leaf_item_json_carries_preview_command() {
        let index = make_index();
        let (adapter, _) = make_adapter(true);
        let leaf = CategoryNode::leaf(index.problem("1").unwrap().clone());

        let json = serde_json::to_value(adapter.tree_item(&index, &leaf)).unwrap();
        assert_eq!(json["command"]["command"], "leetcode.previewProblem");
        assert_eq!(json["command"]["arguments"], serde_json::json!(["1"]));
    }

    #[test]
    fn test_stale_subgroup_renders_empty() {
        let index = make_index();
        let (adapter, _) = make_adapter(true);
        let stale = CategoryNode::subgroup(Dimension::Company, "gone");

        assert!(adapter.children(&index, Some(&stale)).is_empty());
        let item = adapter.tree_item(&index, &stale);
        assert_eq!(item.tooltip.as_deref(), Some("AC: 0\nFailed: 0\nTotal: 0"));
    }
}
