//! Subcommand handlers.
//!
//! Each handler takes its clap `Args` struct and a [`RunContext`] and renders
//! through [`crate::output`].

pub mod analyze;
pub mod deps;
pub mod layers;
pub mod leaves;
pub mod order;
pub mod stats;

use std::path::PathBuf;

use stratum_core::config::Config;
use stratum_core::error::ErrorCode;
use stratum_core::graph::GraphStore;
use stratum_core::ingest::{IngestOptions, IngestReport, build_graph};

use crate::output::{CliError, OutputMode, render_error};

/// Resolved settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Config,
    pub input_dir: PathBuf,
    pub ingest: IngestOptions,
    pub output: OutputMode,
}

impl RunContext {
    /// Read the relationship sources into a graph.
    ///
    /// A missing input directory is only an error in strict mode. Ingestion
    /// failures are rendered as a [`CliError`] before being returned.
    pub fn load_graph(&self) -> anyhow::Result<(GraphStore, IngestReport)> {
        if self.ingest.strict && !self.input_dir.is_dir() {
            render_error(
                self.output,
                &CliError::from_code(
                    ErrorCode::InputDirMissing,
                    format!("input directory {} not found", self.input_dir.display()),
                ),
            )?;
            anyhow::bail!("input directory {} not found", self.input_dir.display());
        }

        match build_graph(&self.input_dir, &self.ingest) {
            Ok(loaded) => Ok(loaded),
            Err(err) => {
                render_error(
                    self.output,
                    &CliError::from_code(err.error_code(), err.to_string()),
                )?;
                Err(anyhow::Error::new(err).context("ingestion failed"))
            }
        }
    }
}
