//! `stratum order`: dependency-first implementation order.

use std::collections::HashSet;
use std::io::Write;

use clap::Args;
use stratum_core::graph::{DependencyOrder, dependency_order};

use super::RunContext;
use crate::output::{pretty_section, render_mode};

/// Arguments for `stratum order`.
#[derive(Args, Debug, Default)]
pub struct OrderArgs {}

/// Execute `stratum order`.
pub fn run_order(_args: &OrderArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let (store, _) = ctx.load_graph()?;
    let order = dependency_order(&store);
    render_mode(ctx.output, &order, render_order_text, render_order_pretty)
}

fn render_order_text(order: &DependencyOrder, w: &mut dyn Write) -> std::io::Result<()> {
    for node in &order.order {
        writeln!(w, "{node}")?;
    }
    Ok(())
}

fn render_order_pretty(order: &DependencyOrder, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!("Implementation order ({} components)", order.order.len()),
    )?;
    let blocked: HashSet<&str> = order.unresolved.iter().map(String::as_str).collect();
    for (i, node) in order.order.iter().enumerate() {
        if blocked.contains(node.as_str()) {
            writeln!(w, "{:>5}. {node}  ⚠ cycle", i + 1)?;
        } else {
            writeln!(w, "{:>5}. {node}", i + 1)?;
        }
    }
    if order.has_cycles() {
        writeln!(w)?;
        writeln!(
            w,
            "⚠ {} nodes sit on or behind a dependency cycle; appended in name order",
            order.unresolved.len()
        )?;
    }
    Ok(())
}
