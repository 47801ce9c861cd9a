//! `tree` subcommand: scan once, print the reconstructed hierarchy.
//!
//! This is the terminal counterpart of the /tree endpoint -- one fresh
//! scan, one build, one dump, no server.

use ptree_exporter::forest;
use ptree_exporter::source::{ProcSource, RecordSource};

use crate::cli::TreeFormat;
use crate::config::{Config, DEFAULT_PROC_ROOT};
use crate::render::{render_forest_text, render_subtree_text};

pub fn command_tree(
    format: TreeFormat,
    pid: Option<u32>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = config
        .proc_root
        .clone()
        .unwrap_or_else(|| DEFAULT_PROC_ROOT.into());
    let source = ProcSource::new(root).with_max_processes(config.max_processes);

    let records = source.collect()?;
    let forest = forest::build(records);

    match format {
        TreeFormat::Text => match pid {
            Some(pid) => match render_subtree_text(&forest, pid) {
                Some(text) => print!("{text}"),
                None => return Err(format!("pid {pid} not found in scan").into()),
            },
            None => print!("{}", render_forest_text(&forest)),
        },
        TreeFormat::Json => {
            let view = match pid {
                Some(pid) => {
                    if forest.node_id(pid).is_none() {
                        return Err(format!("pid {pid} not found in scan").into());
                    }
                    forest
                        .to_view()
                        .into_iter()
                        .filter_map(|root| find_subtree(root, pid))
                        .collect()
                }
                None => forest.to_view(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    if !forest.dropped_edges().is_empty() {
        eprintln!(
            "warning: {} parent link(s) dropped to keep the tree acyclic",
            forest.dropped_edges().len()
        );
    }

    Ok(())
}

/// Extracts the subtree rooted at `pid` from a nested view, if present.
fn find_subtree(view: ptree_exporter::forest::NodeView, pid: u32) -> Option<ptree_exporter::forest::NodeView> {
    if view.pid == pid {
        return Some(view);
    }
    view.children
        .into_iter()
        .find_map(|child| find_subtree(child, pid))
}
