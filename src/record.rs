//! Process record value type produced by a record source.
//!
//! A record is one process as reported at one point in time: its pid, the
//! parent pid it claims, and best-effort descriptive attributes.

use serde::{Deserialize, Serialize};

/// Sentinel ppid meaning "no parent" (kernel convention for pid 1 and
/// kernel threads' reaper).
pub const NO_PARENT: u32 = 0;

/// One process as reported by the record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Process identifier, always > 0.
    pub pid: u32,
    /// Claimed parent pid; `NO_PARENT` (0) means root.
    pub ppid: u32,
    /// Owning user name, or the numeric uid when no passwd entry exists.
    pub owner: String,
    /// Command name (comm).
    pub command: String,
    /// Resident set size in kB (VmRSS).
    pub rss_kb: u64,
    /// Total CPU time (utime + stime) in clock ticks.
    pub cpu_ticks: u64,
}

impl ProcessRecord {
    /// True when this record claims no parent, or claims itself as parent
    /// (corrupted input guard) -- either way it roots the node.
    pub fn is_root(&self) -> bool {
        self.ppid == NO_PARENT || self.ppid == self.pid
    }
}
