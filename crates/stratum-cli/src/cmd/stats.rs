//! `stratum stats`: aggregate graph statistics.

use std::io::Write;

use clap::Args;
use stratum_core::plan::PlanStatistics;

use super::RunContext;
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `stratum stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

/// Execute `stratum stats`.
pub fn run_stats(_args: &StatsArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let (store, _) = ctx.load_graph()?;
    let stats = PlanStatistics::from_store(&store);
    render_mode(ctx.output, &stats, render_stats_text, render_stats_pretty)
}

fn render_stats_text(stats: &PlanStatistics, w: &mut dyn Write) -> std::io::Result<()> {
    let g = &stats.graph;
    writeln!(w, "node_count {}", g.node_count)?;
    writeln!(w, "edge_count {}", g.edge_count)?;
    writeln!(w, "leaf_count {}", g.leaf_count)?;
    writeln!(w, "root_count {}", g.root_count)?;
    writeln!(w, "max_out_degree {}", g.max_out_degree)?;
    writeln!(w, "max_in_degree {}", g.max_in_degree)?;
    writeln!(w, "avg_out_degree {:.2}", g.avg_out_degree)?;
    writeln!(w, "layer_count {}", stats.layer_count)?;
    writeln!(w, "avg_layer_size {:.1}", stats.avg_layer_size)
}

fn render_stats_pretty(stats: &PlanStatistics, w: &mut dyn Write) -> std::io::Result<()> {
    let g = &stats.graph;
    pretty_section(w, "Dependency graph statistics")?;
    pretty_kv(w, "Components", g.node_count.to_string())?;
    pretty_kv(w, "Dependencies", g.edge_count.to_string())?;
    pretty_kv(w, "Leaf nodes", g.leaf_count.to_string())?;
    pretty_kv(w, "Root nodes", g.root_count.to_string())?;
    pretty_kv(w, "Max dependencies", g.max_out_degree.to_string())?;
    pretty_kv(w, "Max dependents", g.max_in_degree.to_string())?;
    pretty_kv(w, "Avg dependencies", format!("{:.2}", g.avg_out_degree))?;
    pretty_kv(w, "Layers", stats.layer_count.to_string())?;
    pretty_kv(w, "Avg layer size", format!("{:.1}", stats.avg_layer_size))
}
