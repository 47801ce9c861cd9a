//! Per-pass duplicate suppression for the hierarchy builder.
//!
//! The ledger tracks which pids have already been materialized into a node
//! during the current build pass. It is created fresh for every pass and
//! dropped with it -- entries never survive into the next rebuild.

use ahash::AHashSet;

/// Membership set of pids already seen in one build pass.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: AHashSet<u32>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the set for an expected record count.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: AHashSet::with_capacity(capacity),
        }
    }

    /// Has a record for this pid already been absorbed this pass?
    pub fn contains(&self, pid: u32) -> bool {
        self.seen.contains(&pid)
    }

    /// Records that this pass has absorbed a record for `pid`.
    pub fn mark(&mut self, pid: u32) {
        self.seen.insert(pid);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
