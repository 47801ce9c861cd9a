//! `check` subcommand: validate /proc access and run a sample scan.

use std::path::PathBuf;

use ptree_exporter::forest;
use ptree_exporter::source::{ProcSource, RecordSource};

use crate::config::{Config, DEFAULT_PROC_ROOT};
use crate::startup_checks;

pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let root: PathBuf = config
        .proc_root
        .clone()
        .unwrap_or_else(|| DEFAULT_PROC_ROOT.into());

    println!("Checking process enumeration at {}", root.display());

    if let Err(e) = startup_checks::validate_requirements(&root) {
        eprintln!("FAILED: {e}");
        std::process::exit(1);
    }

    // Sample scan: prove the full path works end to end.
    let source = ProcSource::new(&root).with_max_processes(config.max_processes);
    let records = source.collect()?;
    let forest = forest::build(records);

    println!(
        "OK: scanned {} processes, {} roots, {} pending placeholders",
        forest.len(),
        forest.roots().len(),
        forest
            .iter_depth_first()
            .filter(|(node, _)| node.is_pending())
            .count()
    );

    if !forest.dropped_edges().is_empty() {
        println!(
            "note: {} parent link(s) dropped to keep the tree acyclic",
            forest.dropped_edges().len()
        );
    }

    Ok(())
}
