//! /proc-backed record source.
//!
//! Enumerates numeric directories under the proc root and reads
//! `status` (Name, Uid, PPid, VmRSS) plus `stat` (utime+stime) for each.
//! Detail reads race against process exit by design: a pid that vanishes
//! between enumeration and read yields nothing and the scan continues.

use nix::unistd::{Uid, User};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::RecordSource;
use crate::error::SourceError;
use crate::record::ProcessRecord;

/// System clock ticks per second, for converting cpu_ticks to seconds
/// at display time.
pub static CLK_TCK: Lazy<f64> = Lazy::new(|| {
    // SAFETY: sysconf is safe to call with _SC_CLK_TCK.
    // Returns -1 on error, 0 if undefined - both handled by the > 0 check.
    let tck = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if tck > 0 {
        tck as f64
    } else {
        100.0
    }
});

/// Record source reading the /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcSource {
    root: PathBuf,
    max_processes: Option<usize>,
}

impl ProcSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_processes: None,
        }
    }

    /// Caps the number of pids scanned per pass.
    pub fn with_max_processes(mut self, max: Option<usize>) -> Self {
        self.max_processes = max;
        self
    }

    /// Enumerates numeric entries under the proc root.
    fn enumerate(&self) -> Result<Vec<(u32, PathBuf)>, SourceError> {
        let entries = fs::read_dir(&self.root).map_err(|e| SourceError::Unavailable {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let mut out = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let name = match path.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let pid: u32 = match name.parse() {
                Ok(v) if v > 0 => v,
                _ => continue,
            };
            out.push((pid, path));
            if let Some(max) = self.max_processes {
                if out.len() >= max {
                    break;
                }
            }
        }
        Ok(out)
    }
}

impl RecordSource for ProcSource {
    fn collect(&self) -> Result<Vec<ProcessRecord>, SourceError> {
        let entries = self.enumerate()?;
        debug!(
            count = entries.len(),
            root = %self.root.display(),
            "Enumerated process entries"
        );

        let records: Vec<ProcessRecord> = entries
            .par_iter()
            .filter_map(|(pid, path)| read_record(*pid, path))
            .collect();

        debug!(
            records = records.len(),
            skipped = entries.len() - records.len(),
            "Record scan complete"
        );
        Ok(records)
    }
}

/// Reads one process record. Returns `None` when the process vanished
/// between enumeration and read (transient, absorbed by the caller).
fn read_record(pid: u32, proc_path: &Path) -> Option<ProcessRecord> {
    let status = match fs::read_to_string(proc_path.join("status")) {
        Ok(s) => s,
        Err(e) => {
            debug!(pid, error = %e, "Process vanished before status read, skipping");
            return None;
        }
    };

    let mut command = String::new();
    let mut uid: Option<u32> = None;
    let mut ppid: u32 = 0;
    let mut rss_kb: u64 = 0;

    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("Name:") {
            command = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Uid:") {
            uid = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        } else if let Some(rest) = line.strip_prefix("PPid:") {
            ppid = rest.trim().parse().unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix("VmRSS:") {
            rss_kb = rest
                .split_whitespace()
                .next()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
        }
    }

    // cpu time is best-effort; a failed stat read does not drop the record.
    let cpu_ticks = read_cpu_ticks(proc_path).unwrap_or(0);

    Some(ProcessRecord {
        pid,
        ppid,
        owner: resolve_owner(uid),
        command,
        rss_kb,
        cpu_ticks,
    })
}

/// Parses utime+stime from /proc/<pid>/stat. The comm field can contain
/// spaces and parens, so fields are taken after the last ')'.
fn read_cpu_ticks(proc_path: &Path) -> Option<u64> {
    let stat = fs::read_to_string(proc_path.join("stat")).ok()?;
    let rest = &stat[stat.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    // After the comm field: state ppid pgrp session tty_nr tpgid flags
    // minflt cminflt majflt cmajflt utime stime ...
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;
    Some(utime + stime)
}

/// Resolves a uid to a username, falling back to the numeric uid.
fn resolve_owner(uid: Option<u32>) -> String {
    let Some(uid) = uid else {
        return "?".to_string();
    };
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    }
}
