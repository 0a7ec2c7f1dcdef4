//! `stratum leaves`: nodes with no dependencies (or, with `--roots`, no
//! dependents).

use std::io::Write;

use clap::Args;
use serde::Serialize;

use super::RunContext;
use crate::output::{pretty_section, render_mode};

/// Arguments for `stratum leaves`.
#[derive(Args, Debug, Default)]
pub struct LeavesArgs {
    /// List roots (nodes nothing depends on) instead of leaves.
    #[arg(long)]
    pub roots: bool,
}

#[derive(Debug, Serialize)]
struct LeavesOutput {
    kind: &'static str,
    count: usize,
    nodes: Vec<String>,
}

/// Execute `stratum leaves`.
pub fn run_leaves(args: &LeavesArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let (store, _) = ctx.load_graph()?;
    let (kind, nodes) = if args.roots {
        ("roots", store.roots())
    } else {
        ("leaves", store.leaves())
    };

    let payload = LeavesOutput {
        kind,
        count: nodes.len(),
        nodes,
    };
    render_mode(ctx.output, &payload, render_leaves_text, render_leaves_pretty)
}

fn render_leaves_text(out: &LeavesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for node in &out.nodes {
        writeln!(w, "{node}")?;
    }
    Ok(())
}

fn render_leaves_pretty(out: &LeavesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = if out.kind == "roots" {
        format!("Root nodes ({})", out.count)
    } else {
        format!("Leaf nodes ({}), start implementation here", out.count)
    };
    pretty_section(w, &heading)?;
    if out.nodes.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for (i, node) in out.nodes.iter().enumerate() {
        writeln!(w, "{:>4}. {node}", i + 1)?;
    }
    Ok(())
}
