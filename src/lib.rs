//! ptree-exporter core library
//!
//! Reconstructs the parent/child hierarchy of operating-system processes
//! from an unordered, possibly incomplete flat enumeration of process
//! records, and keeps that hierarchy consistent across full-rebuild
//! refresh cycles.
//!
//! # Features
//!
//! - **Order-independent build**: records may arrive in any order, with
//!   duplicates, dangling parents, and even cyclic parent claims
//! - **Wholesale refresh**: one published forest at a time, swapped
//!   atomically so readers never see a half-built tree
//! - **Terminate gateway**: signal delivery decoupled from the forest
//!
//! # Usage
//!
//! ```rust
//! use ptree_exporter::forest;
//! use ptree_exporter::record::ProcessRecord;
//!
//! let records = vec![
//!     ProcessRecord {
//!         pid: 1,
//!         ppid: 0,
//!         owner: "root".into(),
//!         command: "init".into(),
//!         rss_kb: 1024,
//!         cpu_ticks: 100,
//!     },
//!     ProcessRecord {
//!         pid: 2,
//!         ppid: 1,
//!         owner: "root".into(),
//!         command: "agetty".into(),
//!         rss_kb: 512,
//!         cpu_ticks: 3,
//!     },
//! ];
//!
//! let forest = forest::build(records);
//! assert_eq!(forest.roots().len(), 1);
//!
//! for (node, depth) in forest.iter_depth_first() {
//!     println!("{}{}", "  ".repeat(depth), node.pid());
//! }
//! ```

pub mod error;
pub mod forest;
pub mod gateway;
pub mod record;
pub mod reconciler;
pub mod source;

// Re-export main types for convenience
pub use error::{RefreshError, SourceError, TerminateError};
pub use forest::{Forest, Node, NodeId, NodeState};
pub use record::ProcessRecord;
pub use reconciler::Reconciler;
pub use source::{ProcSource, RecordSource};
