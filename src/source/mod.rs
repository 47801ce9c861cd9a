//! Record sources: where process record batches come from.
//!
//! The reconciler only depends on the `RecordSource` trait; the production
//! implementation reads `/proc`, tests substitute a canned batch.

pub mod procfs;

pub use procfs::{ProcSource, CLK_TCK};

use crate::error::SourceError;
use crate::record::ProcessRecord;

/// Supplies one unordered, possibly incomplete batch of process records
/// per call. Individual processes vanishing mid-scan are skipped by the
/// implementation; only a wholesale enumeration failure is an error.
pub trait RecordSource: Send + Sync {
    fn collect(&self) -> Result<Vec<ProcessRecord>, SourceError>;
}
