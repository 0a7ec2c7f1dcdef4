//! `stratum deps <NODE>`: dependency report for one node.

use std::io::Write;

use clap::Args;
use stratum_core::error::ErrorCode;
use stratum_core::graph::{MetadataValue, dependency_order};
use stratum_core::plan::ApiReport;

use super::RunContext;
use crate::output::{CliError, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `stratum deps`.
#[derive(Args, Debug, Default)]
pub struct DepsArgs {
    /// Fully qualified node name, e.g. `firebase::App::Create`.
    #[arg(value_name = "NODE")]
    pub node: String,
}

/// Execute `stratum deps`.
pub fn run_deps(args: &DepsArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let (store, _) = ctx.load_graph()?;
    let order = dependency_order(&store);

    let Some(report) = ApiReport::for_node(&store, &order, &args.node) else {
        render_error(
            ctx.output,
            &CliError::with_details(
                format!("node '{}' not found in dependency graph", args.node),
                "use the fully qualified name; `stratum order` lists every known node",
                ErrorCode::NodeNotFound.code(),
            ),
        )?;
        anyhow::bail!("node '{}' not found", args.node);
    };

    render_mode(ctx.output, &report, render_deps_text, render_deps_pretty)
}

fn render_deps_text(report: &ApiReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "{} direct={} transitive={} dependents={}",
        report.api,
        report.direct_dependencies.len(),
        report.dependency_count,
        report.direct_dependents.len()
    )?;
    for node in &report.implementation_order {
        writeln!(w, "{node}")?;
    }
    Ok(())
}

fn render_deps_pretty(report: &ApiReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &report.api)?;
    for (key, value) in &report.metadata {
        let shown = match value {
            MetadataValue::Flag(flag) => flag.to_string(),
            MetadataValue::Text(text) => text.clone(),
        };
        pretty_kv(w, key, shown)?;
    }
    pretty_kv(w, "Direct deps", report.direct_dependencies.len().to_string())?;
    pretty_kv(w, "Transitive deps", report.dependency_count.to_string())?;
    pretty_kv(w, "Dependents", report.direct_dependents.len().to_string())?;

    write_list(w, "Direct dependencies", &report.direct_dependencies)?;
    write_list(w, "Direct dependents", &report.direct_dependents)?;

    writeln!(w)?;
    pretty_section(w, "Implementation order")?;
    for (i, node) in report.implementation_order.iter().enumerate() {
        writeln!(w, "{:>4}. {node}", i + 1)?;
    }
    Ok(())
}

fn write_list(w: &mut dyn Write, heading: &str, items: &[String]) -> std::io::Result<()> {
    writeln!(w)?;
    pretty_section(w, heading)?;
    if items.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for item in items {
        writeln!(w, "  - {item}")?;
    }
    Ok(())
}
