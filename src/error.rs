//! Error taxonomy for record collection, refresh, and terminate actions.

use thiserror::Error;

/// Failure reading the record source.
///
/// A process vanishing between enumeration and detail read is NOT an error
/// here -- the source silently skips it and keeps scanning. This type covers
/// the source being unreadable as a whole.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("process enumeration unavailable at {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a refresh pass. The previously published forest is retained
/// in either case.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Another refresh is still running; the caller keeps its current forest.
    #[error("refresh already in progress")]
    InFlight,

    #[error("record source failed: {0}")]
    Source(#[from] SourceError),
}

/// Failure of a terminate request, surfaced verbatim and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerminateError {
    /// The process already exited. Not a condition worth retrying.
    #[error("no such process: {0}")]
    NoSuchProcess(u32),

    #[error("permission denied sending signal to pid {0}")]
    PermissionDenied(u32),

    #[error("kill({pid}) failed: {errno}")]
    Other { pid: u32, errno: nix::errno::Errno },
}
