//! Refresh lifecycle for the published forest.
//!
//! The reconciler owns exactly one current `Forest`. A refresh is always a
//! full rebuild: pull a fresh batch from the record source, build a new
//! forest with a brand-new dedup ledger, then publish it by swapping the
//! shared `Arc`. Readers holding the previous `Arc` keep a complete,
//! consistent snapshot; nobody ever observes a half-built tree.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::RefreshError;
use crate::forest::{self, Forest};
use crate::source::RecordSource;

pub struct Reconciler {
    source: Arc<dyn RecordSource>,
    current: RwLock<Arc<Forest>>,
    in_flight: AtomicBool,
}

impl Reconciler {
    /// Starts with an empty forest; call `refresh()` to populate it.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(Forest::default())),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The currently published forest. Cheap to call; the returned `Arc`
    /// stays valid across later refreshes.
    pub fn current(&self) -> Arc<Forest> {
        self.current
            .read()
            .expect("forest lock poisoned")
            .clone()
    }

    /// Discards the previous forest and rebuilds from a fresh record batch.
    ///
    /// A second refresh arriving while one is running is rejected with
    /// `RefreshError::InFlight`; the caller keeps the forest it has. A
    /// source failure also leaves the previous forest published.
    pub fn refresh(&self) -> Result<Arc<Forest>, RefreshError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh already in progress, rejecting");
            return Err(RefreshError::InFlight);
        }

        let result = self.rebuild();
        self.in_flight.store(false, Ordering::Release);
        result
    }

    fn rebuild(&self) -> Result<Arc<Forest>, RefreshError> {
        let start = Instant::now();

        let records = match self.source.collect() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Refresh aborted, keeping previous forest");
                return Err(e.into());
            }
        };

        let forest = Arc::new(forest::build(records));
        info!(
            nodes = forest.len(),
            roots = forest.roots().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Forest refreshed"
        );

        let mut current = self.current.write().expect("forest lock poisoned");
        *current = forest.clone();
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::record::ProcessRecord;
    use std::sync::Mutex;

    struct FakeSource {
        batches: Mutex<Vec<Result<Vec<ProcessRecord>, ()>>>,
    }

    impl FakeSource {
        fn new(batches: Vec<Result<Vec<ProcessRecord>, ()>>) -> Self {
            Self {
                batches: Mutex::new(batches),
            }
        }
    }

    impl RecordSource for FakeSource {
        fn collect(&self) -> Result<Vec<ProcessRecord>, SourceError> {
            let mut batches = self.batches.lock().unwrap();
            match batches.remove(0) {
                Ok(records) => Ok(records),
                Err(()) => Err(SourceError::Unavailable {
                    path: "/proc".into(),
                    source: std::io::Error::other("enumeration failed"),
                }),
            }
        }
    }

    fn record(pid: u32, ppid: u32) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid,
            owner: "root".into(),
            command: "cmd".into(),
            rss_kb: 0,
            cpu_ticks: 0,
        }
    }

    #[test]
    fn test_refresh_publishes_new_forest() {
        let source = Arc::new(FakeSource::new(vec![Ok(vec![record(1, 0), record(2, 1)])]));
        let reconciler = Reconciler::new(source);
        assert!(reconciler.current().is_empty());

        let forest = reconciler.refresh().expect("refresh failed");
        assert_eq!(forest.len(), 2);
        assert_eq!(reconciler.current().len(), 2);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_forest() {
        let source = Arc::new(FakeSource::new(vec![Ok(vec![record(1, 0)]), Err(())]));
        let reconciler = Reconciler::new(source);

        reconciler.refresh().expect("first refresh failed");
        let before = reconciler.current();

        let err = reconciler.refresh().unwrap_err();
        assert!(matches!(err, RefreshError::Source(_)));
        assert!(Arc::ptr_eq(&before, &reconciler.current()));
    }

    #[test]
    fn test_old_snapshot_survives_refresh() {
        let source = Arc::new(FakeSource::new(vec![
            Ok(vec![record(1, 0)]),
            Ok(vec![record(1, 0), record(2, 1)]),
        ]));
        let reconciler = Reconciler::new(source);

        let old = reconciler.refresh().expect("refresh failed");
        let new = reconciler.refresh().expect("refresh failed");

        // The holder of the old Arc still sees the old complete forest.
        assert_eq!(old.len(), 1);
        assert_eq!(new.len(), 2);
        assert!(!Arc::ptr_eq(&old, &new));
    }
}
