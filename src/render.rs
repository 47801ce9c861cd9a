//! Plain-text rendering of a forest.
//!
//! Shared between the one-shot `tree` subcommand and the /tree text
//! endpoint. Indentation follows tree depth; pending placeholder nodes are
//! rendered with unknown attributes, never zeroed ones.

use std::fmt::Write as FmtWrite;

use ptree_exporter::forest::{Forest, NodeId};
use ptree_exporter::source::CLK_TCK;

/// Renders the whole forest as an indented table.
pub fn render_forest_text(forest: &Forest) -> String {
    let mut out = String::new();
    write_header(&mut out);
    for (node, depth) in forest.iter_depth_first() {
        write_node(&mut out, forest, node.pid(), depth);
    }
    out
}

/// Renders only the subtree rooted at `pid`, or `None` if unknown.
pub fn render_subtree_text(forest: &Forest, pid: u32) -> Option<String> {
    let root_id = forest.node_id(pid)?;

    let mut out = String::new();
    write_header(&mut out);

    let mut stack: Vec<(NodeId, usize)> = vec![(root_id, 0)];
    while let Some((id, depth)) = stack.pop() {
        let node = forest.node(id);
        write_node(&mut out, forest, node.pid(), depth);
        for &child in node.children().iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    Some(out)
}

fn write_header(out: &mut String) {
    writeln!(
        out,
        "{:>8}  {:<12} {:>10} {:>9}  COMMAND",
        "PID", "OWNER", "RSS(kB)", "CPU(s)"
    )
    .ok();
}

fn write_node(out: &mut String, forest: &Forest, pid: u32, depth: usize) {
    let node = forest.get(pid).expect("traversed node present in forest");
    let indent = "  ".repeat(depth);
    match node.record() {
        Some(rec) => {
            let cpu_seconds = rec.cpu_ticks as f64 / *CLK_TCK;
            writeln!(
                out,
                "{:>8}  {:<12} {:>10} {:>9.2}  {}{}",
                rec.pid, rec.owner, rec.rss_kb, cpu_seconds, indent, rec.command
            )
            .ok();
        }
        None => {
            writeln!(
                out,
                "{:>8}  {:<12} {:>10} {:>9}  {}?",
                node.pid(),
                "?",
                "-",
                "-",
                indent
            )
            .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptree_exporter::forest;
    use ptree_exporter::record::ProcessRecord;

    fn record(pid: u32, ppid: u32, command: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid,
            owner: "root".into(),
            command: command.into(),
            rss_kb: 100,
            cpu_ticks: 0,
        }
    }

    #[test]
    fn test_render_indents_children() {
        let f = forest::build(vec![record(1, 0, "init"), record(2, 1, "sshd")]);
        let text = render_forest_text(&f);
        assert!(text.contains("init"));
        assert!(text.contains("  sshd"));
    }

    #[test]
    fn test_pending_rendered_as_unknown() {
        let f = forest::build(vec![record(5, 99, "orphan")]);
        let text = render_forest_text(&f);
        // Placeholder 99 shows "?" attributes, not zeros.
        assert!(text.contains("99"));
        assert!(text.contains('?'));
        assert!(!text.contains("99  root"));
    }

    #[test]
    fn test_subtree_render() {
        let f = forest::build(vec![
            record(1, 0, "init"),
            record(2, 1, "sshd"),
            record(3, 2, "bash"),
        ]);
        let text = render_subtree_text(&f, 2).expect("subtree missing");
        assert!(!text.contains("init"));
        assert!(text.contains("sshd"));
        assert!(text.contains("bash"));
        assert!(render_subtree_text(&f, 999).is_none());
    }
}
