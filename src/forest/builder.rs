//! Single-pass forest construction from an unordered record batch.
//!
//! Records may arrive in any order: a child's record can precede its
//! parent's, duplicates within the batch are absorbed, and malformed
//! parent claims (self-parent, cycles) root the node instead of failing
//! the build. The resulting parent/child relationships are identical for
//! every permutation of the same record set.

use tracing::{debug, warn};

use super::ledger::DedupLedger;
use super::{Forest, Node, NodeId, NodeState};
use crate::record::ProcessRecord;

/// Builds a forest from a batch of process records.
pub fn build<I>(records: I) -> Forest
where
    I: IntoIterator<Item = ProcessRecord>,
{
    let records = records.into_iter();
    let (lower, _) = records.size_hint();

    let mut forest = Forest::default();
    let mut ledger = DedupLedger::with_capacity(lower);

    for record in records {
        insert(&mut forest, &mut ledger, record);
    }

    // Every node whose parent link was never set is a root, including
    // placeholders whose own record never arrived.
    for (idx, node) in forest.nodes.iter().enumerate() {
        if node.parent().is_none() {
            forest.roots.push(NodeId(idx));
        }
    }

    debug!(
        nodes = forest.len(),
        roots = forest.roots.len(),
        dropped_edges = forest.dropped_edges.len(),
        "Forest build complete"
    );

    forest.finish()
}

/// Absorbs one record into the forest under construction.
fn insert(forest: &mut Forest, ledger: &mut DedupLedger, record: ProcessRecord) {
    if ledger.contains(record.pid) {
        debug!(pid = record.pid, "Duplicate record in batch, skipping");
        return;
    }
    ledger.mark(record.pid);

    let is_root = record.is_root();
    let ppid = record.ppid;
    let pid = record.pid;

    // Fill a placeholder in place if one exists (identity and attached
    // children are preserved), otherwise create the node resolved.
    let node_id = match forest.index.get(&pid) {
        Some(&id) => {
            forest.nodes[id.0].set_state(NodeState::Resolved(record));
            id
        }
        None => push_node(forest, pid, NodeState::Resolved(record)),
    };

    if is_root {
        return;
    }

    let parent_id = match forest.index.get(&ppid) {
        Some(&id) => id,
        None => push_node(forest, ppid, NodeState::Pending),
    };

    if would_cycle(forest, node_id, parent_id) {
        warn!(
            pid,
            ppid, "Parent link would create a cycle, rooting the child instead"
        );
        forest.dropped_edges.push((pid, ppid));
        return;
    }

    forest.nodes[node_id.0].set_parent(parent_id);
    forest.nodes[parent_id.0].push_child(node_id);
}

fn push_node(forest: &mut Forest, pid: u32, state: NodeState) -> NodeId {
    let id = NodeId(forest.nodes.len());
    forest.nodes.push(Node::new(pid, state));
    forest.index.insert(pid, id);
    id
}

/// Walks the candidate parent's ancestor chain looking for the child.
/// Bounded by the current chain depth, not the forest size.
fn would_cycle(forest: &Forest, child: NodeId, parent: NodeId) -> bool {
    let mut cursor = Some(parent);
    while let Some(id) = cursor {
        if id == child {
            return true;
        }
        cursor = forest.nodes[id.0].parent();
    }
    false
}
