//! Integration tests for the /proc-backed record source feeding the
//! builder, against a synthetic proc tree on disk.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use ptree_exporter::forest;
use ptree_exporter::source::{ProcSource, RecordSource};

fn write_process(root: &Path, pid: u32, ppid: u32, name: &str, rss_kb: u64, ticks: u64) {
    let dir = root.join(pid.to_string());
    fs::create_dir(&dir).expect("Failed to create proc dir");
    fs::write(
        dir.join("status"),
        format!(
            "Name:\t{name}\nState:\tS (sleeping)\nPid:\t{pid}\nPPid:\t{ppid}\n\
             Uid:\t0\t0\t0\t0\nVmRSS:\t{rss_kb} kB\n"
        ),
    )
    .expect("Failed to write status");
    fs::write(
        dir.join("stat"),
        format!(
            "{pid} ({name}) S {ppid} {pid} {pid} 0 -1 4194304 10 0 0 0 {ticks} 0 \
             0 0 20 0 1 0 100 1000000 128 18446744073709551615 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0"
        ),
    )
    .expect("Failed to write stat");
}

#[test]
fn test_scan_and_build_full_hierarchy() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_process(dir.path(), 1, 0, "init", 1024, 100);
    write_process(dir.path(), 200, 1, "sshd", 2048, 20);
    write_process(dir.path(), 300, 200, "bash", 4096, 5);

    let source = ProcSource::new(dir.path());
    let records = source.collect().expect("collect failed");
    let forest = forest::build(records);

    assert_eq!(forest.len(), 3);
    assert_eq!(forest.roots().len(), 1);

    let init = forest.get(1).expect("init missing");
    let rec = init.record().expect("init unresolved");
    assert_eq!(rec.command, "init");
    assert_eq!(rec.rss_kb, 1024);
    assert_eq!(rec.cpu_ticks, 100);

    let bash = forest.get(300).expect("bash missing");
    assert_eq!(bash.parent().map(|id| forest.node(id).pid()), Some(200));
}

#[test]
fn test_parent_outside_scan_becomes_placeholder_root() {
    let dir = tempdir().expect("Failed to create temp dir");
    // Child claims a parent that the enumeration never saw (e.g., the
    // parent exited between fork and our scan).
    write_process(dir.path(), 500, 77777, "orphan", 64, 1);

    let source = ProcSource::new(dir.path());
    let forest = forest::build(source.collect().expect("collect failed"));

    assert_eq!(forest.len(), 2);
    let placeholder = forest.get(77777).expect("placeholder missing");
    assert!(placeholder.is_pending());
    assert_eq!(placeholder.children().len(), 1);
}

#[test]
fn test_vanished_pid_does_not_block_scan() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_process(dir.path(), 1, 0, "init", 0, 0);
    // Empty directory: pid listed but details unreadable (process exited).
    fs::create_dir(dir.path().join("4242")).unwrap();

    let source = ProcSource::new(dir.path());
    let records = source.collect().expect("collect failed");
    assert_eq!(records.len(), 1);

    let forest = forest::build(records);
    assert!(forest.get(4242).is_none());
}

#[test]
fn test_unreadable_root_reports_source_error() {
    let source = ProcSource::new("/definitely/not/a/proc/root");
    assert!(source.collect().is_err());
}
