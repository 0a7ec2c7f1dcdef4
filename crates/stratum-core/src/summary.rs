//! Bounded human-readable summary (`SUMMARY.txt`).

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::SummaryConfig;
use crate::plan::ImplementationPlan;

/// File name of the summary inside the output directory.
pub const SUMMARY_FILE: &str = "SUMMARY.txt";

const WIDTH: usize = 80;

/// Render the summary text for `plan`.
///
/// Lists are cut at the configured limits; each cut list is followed by an
/// `... and N more` line.
#[must_use]
pub fn render_summary(plan: &ImplementationPlan, limits: &SummaryConfig) -> String {
    let stats = &plan.statistics;
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "STRATUM DEPENDENCY ANALYSIS SUMMARY");
    let _ = writeln!(out, "{heavy}\n");

    let _ = writeln!(out, "Total Components: {}", plan.total_nodes);
    let _ = writeln!(out, "Total Dependencies: {}", plan.total_edges);
    let _ = writeln!(out, "Implementation Layers: {}", stats.layer_count);
    let _ = writeln!(out, "Average Layer Size: {:.1}", stats.avg_layer_size);
    let _ = writeln!(out, "Leaf Nodes: {}", plan.leaf_nodes.len());
    let _ = writeln!(out, "Max Dependencies: {}", stats.graph.max_out_degree);
    let _ = writeln!(out, "Max Dependents: {}", stats.graph.max_in_degree);
    let _ = writeln!(out, "Avg Dependencies: {:.2}", stats.graph.avg_out_degree);
    if !plan.unresolved_cycle_nodes.is_empty() {
        let _ = writeln!(
            out,
            "Nodes In Cycles: {}",
            plan.unresolved_cycle_nodes.len()
        );
    }
    let _ = writeln!(out, "Fingerprint: {}\n", plan.fingerprint);

    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "LEAF NODES (Start Implementation Here)");
    let _ = writeln!(out, "{light}");
    for (i, leaf) in plan.leaf_nodes.iter().take(limits.leaf_limit).enumerate() {
        let _ = writeln!(out, "{:3}. {leaf}", i + 1);
    }
    if let Some(rest) = overflow(plan.leaf_nodes.len(), limits.leaf_limit) {
        let _ = writeln!(out, "... and {rest} more");
    }

    let _ = writeln!(out, "\n{light}");
    let _ = writeln!(out, "IMPLEMENTATION LAYERS");
    let _ = writeln!(out, "{light}");
    for (i, layer) in plan
        .implementation_layers
        .iter()
        .take(limits.layer_limit)
        .enumerate()
    {
        let _ = writeln!(out, "\nLayer {} ({} components):", i + 1, layer.len());
        for member in layer.iter().take(limits.layer_member_limit) {
            let _ = writeln!(out, "  - {member}");
        }
        if let Some(rest) = overflow(layer.len(), limits.layer_member_limit) {
            let _ = writeln!(out, "  ... and {rest} more");
        }
    }
    if let Some(rest) = overflow(plan.implementation_layers.len(), limits.layer_limit) {
        let _ = writeln!(out, "\n... and {rest} more layers");
    }

    let _ = writeln!(out, "\n{heavy}");
    out
}

/// Write `SUMMARY.txt` into `output_dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn write_summary(
    plan: &ImplementationPlan,
    limits: &SummaryConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let path = output_dir.join(SUMMARY_FILE);
    fs::write(&path, render_summary(plan, limits))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "summary written");
    Ok(path)
}

/// Items hidden by a limit, `None` when nothing is cut.
const fn overflow(len: usize, limit: usize) -> Option<usize> {
    if len > limit { Some(len - limit) } else { None }
}
