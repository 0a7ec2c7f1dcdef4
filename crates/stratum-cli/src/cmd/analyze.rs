//! `stratum analyze`: run the full pipeline and write every output file.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use stratum_core::error::ErrorCode;
use stratum_core::graph::dependency_order;
use stratum_core::plan::{ImplementationPlan, write_api_reports, write_plan};
use stratum_core::summary::write_summary;
use tracing::info;

use super::RunContext;
use crate::output::{CliError, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `stratum analyze`.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Output directory (overrides `[output] dir`).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    input_dir: String,
    output_dir: String,
    fingerprint: String,
    total_nodes: usize,
    total_edges: usize,
    leaf_count: usize,
    layer_count: usize,
    cycle_node_count: usize,
    api_report_count: usize,
    skipped_rows: usize,
    missing_sources: Vec<String>,
    files: Vec<String>,
}

/// Execute `stratum analyze`.
pub fn run_analyze(args: &AnalyzeArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.output.dir.clone());

    let (store, report) = ctx.load_graph()?;
    let order = dependency_order(&store);
    let plan = ImplementationPlan::with_order(&store, &order);

    let written = write_plan(&plan, &output_dir).and_then(|plan_path| {
        let reports = write_api_reports(&store, &order, &output_dir)?;
        let summary_path = write_summary(&plan, &ctx.config.summary, &output_dir)?;
        Ok((plan_path, reports, summary_path))
    });
    let (plan_path, api_report_count, summary_path) = match written {
        Ok(written) => written,
        Err(err) => {
            render_error(
                ctx.output,
                &CliError::from_code(ErrorCode::OutputWriteFailed, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };

    info!(
        nodes = plan.total_nodes,
        edges = plan.total_edges,
        reports = api_report_count,
        "analysis complete"
    );

    let payload = AnalyzeOutput {
        input_dir: ctx.input_dir.display().to_string(),
        output_dir: output_dir.display().to_string(),
        fingerprint: plan.fingerprint.clone(),
        total_nodes: plan.total_nodes,
        total_edges: plan.total_edges,
        leaf_count: plan.leaf_nodes.len(),
        layer_count: plan.statistics.layer_count,
        cycle_node_count: plan.unresolved_cycle_nodes.len(),
        api_report_count,
        skipped_rows: report.skipped(),
        missing_sources: report
            .missing()
            .iter()
            .map(|kind| kind.file_name().to_string())
            .collect(),
        files: vec![
            plan_path.display().to_string(),
            output_dir
                .join(stratum_core::plan::API_REPORT_DIR)
                .display()
                .to_string(),
            summary_path.display().to_string(),
        ],
    };

    render_mode(
        ctx.output,
        &payload,
        render_analyze_text,
        render_analyze_pretty,
    )
}

fn render_analyze_text(out: &AnalyzeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "nodes={} edges={} leaves={} layers={} cycle_nodes={} api_reports={} skipped_rows={}",
        out.total_nodes,
        out.total_edges,
        out.leaf_count,
        out.layer_count,
        out.cycle_node_count,
        out.api_report_count,
        out.skipped_rows
    )?;
    for file in &out.files {
        writeln!(w, "{file}")?;
    }
    Ok(())
}

fn render_analyze_pretty(out: &AnalyzeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Dependency analysis complete")?;
    pretty_kv(w, "Input", &out.input_dir)?;
    pretty_kv(w, "Output", &out.output_dir)?;
    pretty_kv(w, "Fingerprint", &out.fingerprint)?;
    pretty_kv(w, "Nodes", out.total_nodes.to_string())?;
    pretty_kv(w, "Edges", out.total_edges.to_string())?;
    pretty_kv(w, "Leaf nodes", out.leaf_count.to_string())?;
    pretty_kv(w, "Layers", out.layer_count.to_string())?;
    pretty_kv(w, "API reports", out.api_report_count.to_string())?;
    if out.cycle_node_count > 0 {
        pretty_kv(w, "Nodes in cycles", format!("⚠ {}", out.cycle_node_count))?;
    }
    if out.skipped_rows > 0 {
        pretty_kv(w, "Skipped rows", format!("⚠ {}", out.skipped_rows))?;
    }
    if !out.missing_sources.is_empty() {
        pretty_kv(w, "Missing sources", out.missing_sources.join(", "))?;
    }
    writeln!(w)?;
    pretty_section(w, "Files")?;
    for file in &out.files {
        writeln!(w, "  - {file}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalyzeOutput {
        AnalyzeOutput {
            input_dir: "codeql_results".to_string(),
            output_dir: "analysis_output".to_string(),
            fingerprint: "blake3:abc".to_string(),
            total_nodes: 4,
            total_edges: 3,
            leaf_count: 2,
            layer_count: 3,
            cycle_node_count: 0,
            api_report_count: 1,
            skipped_rows: 2,
            missing_sources: vec!["field_dependencies.csv".to_string()],
            files: vec!["analysis_output/implementation_plan.json".to_string()],
        }
    }

    #[test]
    fn analyze_args_parse_output_dir() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AnalyzeArgs,
        }

        let parsed = Wrapper::parse_from(["test", "--output", "out"]);
        assert_eq!(parsed.args.output, Some(PathBuf::from("out")));

        let parsed = Wrapper::parse_from(["test"]);
        assert!(parsed.args.output.is_none());
    }

    #[test]
    fn text_summary_is_single_line_plus_files() {
        let mut out = Vec::new();
        render_analyze_text(&sample(), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.starts_with("nodes=4 edges=3 leaves=2 layers=3"));
        assert!(rendered.contains("skipped_rows=2"));
        assert!(rendered.contains("implementation_plan.json"));
    }

    #[test]
    fn pretty_flags_skipped_rows_and_missing_sources() {
        let mut out = Vec::new();
        render_analyze_pretty(&sample(), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("Dependency analysis complete"));
        assert!(rendered.contains("Skipped rows"));
        assert!(rendered.contains("field_dependencies.csv"));
        assert!(!rendered.contains("Nodes in cycles"));
    }
}
