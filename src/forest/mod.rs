//! Reconstructed process hierarchy.
//!
//! This module provides:
//! - `builder`: single-pass, order-independent forest construction
//! - `ledger`: per-pass duplicate suppression
//!
//! The forest itself is an arena of nodes indexed by `NodeId`. Parents own
//! their children as an ordered id list; the parent back-reference is
//! non-owning and exists only for the ancestor-chain cycle check. A built
//! forest is immutable -- refresh replaces it wholesale.

pub mod builder;
pub mod ledger;

pub use builder::build;
pub use ledger::DedupLedger;

use crate::record::ProcessRecord;
use ahash::AHashMap as HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Index of a node within its forest's arena. Only valid for the forest
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Whether a node has seen its own record yet.
///
/// A `Pending` node exists only because some record claimed it as parent.
/// It carries no attribute data; consumers must render it as unknown
/// rather than treat absent fields as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Pending,
    Resolved(ProcessRecord),
}

/// One process in the reconstructed hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    pid: u32,
    state: NodeState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(pid: u32, state: NodeState) -> Self {
        Self {
            pid,
            state,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// The record payload, if this node has been resolved.
    pub fn record(&self) -> Option<&ProcessRecord> {
        match &self.state {
            NodeState::Pending => None,
            NodeState::Resolved(rec) => Some(rec),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, NodeState::Pending)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in record arrival order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }
}

/// A parent edge dropped by the cycle check: (child pid, claimed parent pid).
pub type DroppedEdge = (u32, u32);

/// The complete set of root-to-leaf hierarchies built from one record batch.
#[derive(Debug, Default)]
pub struct Forest {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<u32, NodeId>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) dropped_edges: Vec<DroppedEdge>,
    built_at: Option<DateTime<Utc>>,
}

impl Forest {
    pub(crate) fn finish(mut self) -> Self {
        self.built_at = Some(Utc::now());
        self
    }

    /// Root node ids in discovery order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Looks up a node by pid.
    pub fn get(&self, pid: u32) -> Option<&Node> {
        self.index.get(&pid).map(|&id| &self.nodes[id.0])
    }

    /// Looks up a node id by pid.
    pub fn node_id(&self, pid: u32) -> Option<NodeId> {
        self.index.get(&pid).copied()
    }

    /// Total node count, placeholders included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent edges the cycle check refused to attach.
    pub fn dropped_edges(&self) -> &[DroppedEdge] {
        &self.dropped_edges
    }

    /// When this forest was built; `None` only for `Forest::default()`.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// Depth-first pre-order traversal over all roots, children in arrival
    /// order. Stack-based, no recursion.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        let mut stack: Vec<(NodeId, usize)> = Vec::with_capacity(self.roots.len());
        for &root in self.roots.iter().rev() {
            stack.push((root, 0));
        }
        DepthFirst {
            forest: self,
            stack,
        }
    }

    /// Nested serializable view of the whole forest, for JSON output.
    pub fn to_view(&self) -> Vec<NodeView> {
        self.roots
            .iter()
            .map(|&root| self.node_view(root))
            .collect()
    }

    fn node_view(&self, id: NodeId) -> NodeView {
        // Assemble iteratively: post-order over an explicit stack, so deep
        // chains cannot overflow the thread stack.
        let order = {
            let mut order = Vec::new();
            let mut stack = vec![id];
            while let Some(cur) = stack.pop() {
                order.push(cur);
                for &child in self.node(cur).children() {
                    stack.push(child);
                }
            }
            order
        };

        let mut views: HashMap<NodeId, NodeView> = HashMap::with_capacity(order.len());
        for &cur in order.iter().rev() {
            let node = self.node(cur);
            let children = node
                .children()
                .iter()
                .map(|child| {
                    views
                        .remove(child)
                        .expect("child view assembled before parent")
                })
                .collect();
            views.insert(cur, NodeView::from_node(node, children));
        }
        views.remove(&id).expect("root view assembled")
    }
}

/// Stack-based depth-first iterator yielding `(node, depth)`.
pub struct DepthFirst<'a> {
    forest: &'a Forest,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (&'a Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let node = self.forest.node(id);
        for &child in node.children().iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}

/// Serializable nested view of one node and its descendants.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub pid: u32,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rss_kb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_ticks: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

impl NodeView {
    fn from_node(node: &Node, children: Vec<NodeView>) -> Self {
        match node.record() {
            Some(rec) => Self {
                pid: node.pid(),
                state: "resolved",
                owner: Some(rec.owner.clone()),
                command: Some(rec.command.clone()),
                rss_kb: Some(rec.rss_kb),
                cpu_ticks: Some(rec.cpu_ticks),
                children,
            },
            None => Self {
                pid: node.pid(),
                state: "pending",
                owner: None,
                command: None,
                rss_kb: None,
                cpu_ticks: None,
                children,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32, ppid: u32) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid,
            owner: "root".into(),
            command: format!("cmd{pid}"),
            rss_kb: 128,
            cpu_ticks: 10,
        }
    }

    #[test]
    fn test_depth_first_order_and_depths() {
        // 1 -> (2 -> 4, 3)
        let forest = build(vec![record(1, 0), record(2, 1), record(3, 1), record(4, 2)]);
        let visited: Vec<(u32, usize)> = forest
            .iter_depth_first()
            .map(|(node, depth)| (node.pid(), depth))
            .collect();
        assert_eq!(visited, vec![(1, 0), (2, 1), (4, 2), (3, 1)]);
    }

    #[test]
    fn test_view_marks_pending_nodes_unknown() {
        let forest = build(vec![record(5, 99)]);
        let view = forest.to_view();
        assert_eq!(view.len(), 1);
        let placeholder = &view[0];
        assert_eq!(placeholder.pid, 99);
        assert_eq!(placeholder.state, "pending");
        assert!(placeholder.owner.is_none());
        assert!(placeholder.rss_kb.is_none());
        assert_eq!(placeholder.children[0].pid, 5);
        assert_eq!(placeholder.children[0].state, "resolved");
    }

    #[test]
    fn test_view_serializes_to_json() {
        let forest = build(vec![record(1, 0), record(2, 1)]);
        let json = serde_json::to_string(&forest.to_view()).unwrap();
        assert!(json.contains("\"pid\":1"));
        assert!(json.contains("\"pid\":2"));
    }
}
