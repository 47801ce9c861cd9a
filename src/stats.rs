//! Runtime counters for the exporter itself.
//!
//! Tracks refresh and terminate activity with lock-free atomics; rendered
//! as a plain-text table on the /health endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Lock-free counters updated by handlers and the background refresh task.
pub struct RefreshStats {
    start_time: Instant,
    pub refreshes_ok: AtomicU64,
    pub refreshes_failed: AtomicU64,
    pub refreshes_rejected: AtomicU64,
    pub kills_sent: AtomicU64,
    pub kills_failed: AtomicU64,
    pub http_requests: AtomicU64,
    /// Duration of the most recent successful refresh, in microseconds.
    pub last_refresh_micros: AtomicU64,
}

impl RefreshStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            refreshes_ok: AtomicU64::new(0),
            refreshes_failed: AtomicU64::new(0),
            refreshes_rejected: AtomicU64::new(0),
            kills_sent: AtomicU64::new(0),
            kills_failed: AtomicU64::new(0),
            http_requests: AtomicU64::new(0),
            last_refresh_micros: AtomicU64::new(0),
        }
    }

    pub fn record_http_request(&self) {
        self.http_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh_ok(&self, micros: u64) {
        self.refreshes_ok.fetch_add(1, Ordering::Relaxed);
        self.last_refresh_micros.store(micros, Ordering::Relaxed);
    }

    pub fn record_refresh_failed(&self) {
        self.refreshes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh_rejected(&self) {
        self.refreshes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_kill(&self, ok: bool) {
        if ok {
            self.kills_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.kills_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Renders the counters as a plain-text table.
    pub fn render_table(&self) -> String {
        let rows = [
            ("refreshes_ok", self.refreshes_ok.load(Ordering::Relaxed)),
            (
                "refreshes_failed",
                self.refreshes_failed.load(Ordering::Relaxed),
            ),
            (
                "refreshes_rejected",
                self.refreshes_rejected.load(Ordering::Relaxed),
            ),
            ("kills_sent", self.kills_sent.load(Ordering::Relaxed)),
            ("kills_failed", self.kills_failed.load(Ordering::Relaxed)),
            ("http_requests", self.http_requests.load(Ordering::Relaxed)),
            (
                "last_refresh_micros",
                self.last_refresh_micros.load(Ordering::Relaxed),
            ),
        ];

        let mut out = String::from("EXPORTER STATS\n==============\n\n");
        for (name, value) in rows {
            out.push_str(&format!("{:22} | {:>12}\n", name, value));
        }
        out
    }
}

impl Default for RefreshStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = RefreshStats::new();
        stats.record_refresh_ok(1500);
        stats.record_refresh_ok(2500);
        stats.record_refresh_rejected();
        stats.record_kill(true);
        stats.record_kill(false);

        assert_eq!(stats.refreshes_ok.load(Ordering::Relaxed), 2);
        assert_eq!(stats.refreshes_rejected.load(Ordering::Relaxed), 1);
        assert_eq!(stats.kills_sent.load(Ordering::Relaxed), 1);
        assert_eq!(stats.kills_failed.load(Ordering::Relaxed), 1);
        assert_eq!(stats.last_refresh_micros.load(Ordering::Relaxed), 2500);
    }

    #[test]
    fn test_render_table_contains_counters() {
        let stats = RefreshStats::new();
        stats.record_http_request();
        let table = stats.render_table();
        assert!(table.contains("http_requests"));
        assert!(table.contains("refreshes_ok"));
    }
}
