//! Integration tests for forest construction.
//!
//! These exercise the public build API end to end: completeness,
//! order-independence, duplicate absorption, cycle handling, and
//! dangling-parent placeholders.

use ptree_exporter::forest::{self, Forest};
use ptree_exporter::record::ProcessRecord;

fn record(pid: u32, ppid: u32) -> ProcessRecord {
    ProcessRecord {
        pid,
        ppid,
        owner: "user".into(),
        command: format!("proc-{pid}"),
        rss_kb: pid as u64 * 10,
        cpu_ticks: pid as u64,
    }
}

/// Sorted (pid, parent pid) edge list for structural comparison.
fn edges(forest: &Forest) -> Vec<(u32, Option<u32>)> {
    let mut edges: Vec<(u32, Option<u32>)> = forest
        .iter_depth_first()
        .map(|(node, _)| {
            let parent = node.parent().map(|id| forest.node(id).pid());
            (node.pid(), parent)
        })
        .collect();
    edges.sort_unstable();
    edges
}

/// All permutations of the input, for exhaustive order-independence checks.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let picked = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, picked.clone());
            out.push(tail);
        }
    }
    out
}

#[test]
fn test_completeness_all_records_reachable() {
    let records: Vec<_> = (1..=100).map(|pid| record(pid, pid / 3)).collect();
    let forest = forest::build(records);
    assert_eq!(forest.iter_depth_first().count(), 100);
}

#[test]
fn test_order_independence_exhaustive() {
    // 1 -> 2 -> 3 chain plus 4 under 2; every arrival order must produce
    // the same parent/child relationships.
    let records = vec![record(1, 0), record(2, 1), record(3, 2), record(4, 2)];
    let reference = edges(&forest::build(records.clone()));

    for perm in permutations(&records) {
        assert_eq!(
            edges(&forest::build(perm)),
            reference,
            "a permutation produced a different structure"
        );
    }
}

#[test]
fn test_chain_built_from_reversed_input() {
    let forest = forest::build(vec![record(3, 2), record(2, 1), record(1, 0)]);
    assert_eq!(forest.roots().len(), 1);

    let depths: Vec<(u32, usize)> = forest
        .iter_depth_first()
        .map(|(node, depth)| (node.pid(), depth))
        .collect();
    assert_eq!(depths, vec![(1, 0), (2, 1), (3, 2)]);
}

#[test]
fn test_idempotent_duplicate() {
    let forest = forest::build(vec![
        record(7, 0),
        record(1, 7),
        record(7, 0),
        record(2, 7),
    ]);

    // Exactly one node for pid 7, children from both sides of the duplicate.
    assert_eq!(
        forest
            .iter_depth_first()
            .filter(|(node, _)| node.pid() == 7)
            .count(),
        1
    );
    let seven = forest.get(7).expect("node 7 missing");
    assert_eq!(seven.children().len(), 2);
}

#[test]
fn test_acyclicity_adversarial_pair() {
    let forest = forest::build(vec![record(10, 20), record(20, 10)]);

    // Traversal terminates and reaches both nodes exactly once.
    let visited: Vec<u32> = forest.iter_depth_first().map(|(n, _)| n.pid()).collect();
    assert_eq!(visited.len(), 2);

    // The refused edge is surfaced as a diagnostic.
    assert_eq!(forest.dropped_edges().len(), 1);

    // No node is its own ancestor.
    for (node, _) in forest.iter_depth_first() {
        let mut cursor = node.parent();
        while let Some(id) = cursor {
            assert_ne!(forest.node(id).pid(), node.pid());
            cursor = forest.node(id).parent();
        }
    }
}

#[test]
fn test_dangling_parent_renders_unknown() {
    let forest = forest::build(vec![record(5, 99)]);

    let placeholder = forest.get(99).expect("placeholder missing");
    assert!(placeholder.is_pending());
    assert!(placeholder.record().is_none());

    let view = forest.to_view();
    assert_eq!(view[0].pid, 99);
    assert_eq!(view[0].state, "pending");
    assert!(view[0].owner.is_none(), "pending fields must not be zeroed");
    assert!(view[0].rss_kb.is_none());

    let child = forest.get(5).expect("child missing");
    assert!(!child.is_pending());
    assert_eq!(child.parent().map(|id| forest.node(id).pid()), Some(99));
}

#[test]
fn test_wide_forest_multiple_roots() {
    let mut records = vec![record(1, 0), record(1000, 0)];
    records.extend((2..=20).map(|pid| record(pid, 1)));
    let forest = forest::build(records);

    assert_eq!(forest.roots().len(), 2);
    let init = forest.get(1).unwrap();
    assert_eq!(init.children().len(), 19);
}
