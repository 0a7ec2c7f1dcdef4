use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "stratum.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the relationship CSV files.
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the plan, API reports and summary are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Preferred terminal rendering: `pretty`, `text` or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Abort on the first malformed row instead of skipping it.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_leaf_limit")]
    pub leaf_limit: usize,
    #[serde(default = "default_layer_limit")]
    pub layer_limit: usize,
    #[serde(default = "default_layer_member_limit")]
    pub layer_member_limit: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            leaf_limit: default_leaf_limit(),
            layer_limit: default_layer_limit(),
            layer_member_limit: default_layer_member_limit(),
        }
    }
}

/// Parse a config file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`Config`].
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective config.
///
/// An `explicit` path must exist. Without one, `<cwd>/stratum.toml` is used
/// when present; otherwise defaults apply.
///
/// # Errors
///
/// Returns an error if an explicit path is missing or any chosen file fails
/// to load.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file {} does not exist", path.display());
        }
        return load_config(path);
    }

    let discovered = cwd.join(CONFIG_FILE);
    if discovered.exists() {
        tracing::debug!(path = %discovered.display(), "using discovered config");
        return load_config(&discovered);
    }

    Ok(Config::default())
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("codeql_results")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("analysis_output")
}

const fn default_leaf_limit() -> usize {
    50
}

const fn default_layer_limit() -> usize {
    10
}

const fn default_layer_member_limit() -> usize {
    10
}
