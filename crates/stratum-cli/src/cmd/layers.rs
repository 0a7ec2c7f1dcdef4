//! `stratum layers`: batches that can be implemented in parallel.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use stratum_core::graph::implementation_layers;

use super::RunContext;
use crate::output::{pretty_rule, render_mode};

/// Arguments for `stratum layers`.
#[derive(Args, Debug, Default)]
pub struct LayersArgs {}

#[derive(Debug, Serialize)]
struct LayersOutput {
    layer_count: usize,
    layers: Vec<Vec<String>>,
}

/// Execute `stratum layers`.
pub fn run_layers(_args: &LayersArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let (store, _) = ctx.load_graph()?;
    let layers = implementation_layers(&store);
    let payload = LayersOutput {
        layer_count: layers.len(),
        layers,
    };
    render_mode(ctx.output, &payload, render_layers_text, render_layers_pretty)
}

/// One line per layer: index, then tab-separated members.
fn render_layers_text(out: &LayersOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for (i, layer) in out.layers.iter().enumerate() {
        writeln!(w, "{}\t{}", i + 1, layer.join("\t"))?;
    }
    Ok(())
}

fn render_layers_pretty(out: &LayersOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Implementation layers ({})", out.layer_count)?;
    pretty_rule(w)?;
    for (i, layer) in out.layers.iter().enumerate() {
        writeln!(w, "Layer {} ({} components):", i + 1, layer.len())?;
        for member in layer {
            writeln!(w, "  - {member}")?;
        }
    }
    Ok(())
}
