//! Relationship ingestion.
//!
//! # Overview
//!
//! Reads the six relationship CSV sources from an input directory and
//! populates one [`GraphStore`]. Sources are processed in [`SourceKind::ALL`]
//! order. A missing file contributes nothing and is logged at `warn`; the
//! graph is built from whatever sources are present.
//!
//! ## Sources
//!
//! ```text
//! public_api_methods.csv        → add_node(method, {type: public_api, ...})
//! class_hierarchy.csv           → derived → base        (inherits)
//! method_dependencies.csv       → caller → callee       (calls)
//! type_dependencies.csv         → method → param type   (uses_type)
//! return_type_dependencies.csv  → method → return type  (returns)
//! field_dependencies.csv        → class → field type    (has_field)
//! ```
//!
//! Type columns pass through [`normalize::dependency_type`] before insertion.

pub mod normalize;
pub mod table;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::ErrorCode;
use crate::graph::{GraphStore, MetadataValue, NodeMetadata};

use self::table::{Row, read_table};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// One of the relationship tables the analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PublicApi,
    ClassHierarchy,
    MethodCalls,
    ParameterTypes,
    ReturnTypes,
    FieldTypes,
}

impl SourceKind {
    /// Every source, in processing order.
    pub const ALL: [Self; 6] = [
        Self::PublicApi,
        Self::ClassHierarchy,
        Self::MethodCalls,
        Self::ParameterTypes,
        Self::ReturnTypes,
        Self::FieldTypes,
    ];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::PublicApi => "public_api_methods.csv",
            Self::ClassHierarchy => "class_hierarchy.csv",
            Self::MethodCalls => "method_dependencies.csv",
            Self::ParameterTypes => "type_dependencies.csv",
            Self::ReturnTypes => "return_type_dependencies.csv",
            Self::FieldTypes => "field_dependencies.csv",
        }
    }

    /// Columns that must be present in the header.
    ///
    /// For edge sources the first column is the dependent and the second is
    /// the dependency.
    #[must_use]
    pub const fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::PublicApi => &["method_qualified", "class_name", "method_name"],
            Self::ClassHierarchy => &["derived_class", "base_class"],
            Self::MethodCalls => &["caller_qualified", "callee_function"],
            Self::ParameterTypes | Self::ReturnTypes => &["method_qualified", "type_qualified"],
            Self::FieldTypes => &["class_name", "type_qualified"],
        }
    }

    /// Columns read when present; absent means "false".
    #[must_use]
    pub const fn optional_columns(self) -> &'static [&'static str] {
        match self {
            Self::PublicApi => &["is_static", "is_virtual"],
            _ => &[],
        }
    }

    /// Relationship recorded on the dependent, `None` for the API table.
    #[must_use]
    pub const fn relationship(self) -> Option<Relationship> {
        match self {
            Self::PublicApi => None,
            Self::ClassHierarchy => Some(Relationship::Inherits),
            Self::MethodCalls => Some(Relationship::Calls),
            Self::ParameterTypes => Some(Relationship::UsesType),
            Self::ReturnTypes => Some(Relationship::Returns),
            Self::FieldTypes => Some(Relationship::HasField),
        }
    }

    /// Whether the dependency column holds a type name to normalize.
    #[must_use]
    pub const fn normalizes_target(self) -> bool {
        matches!(
            self,
            Self::ParameterTypes | Self::ReturnTypes | Self::FieldTypes
        )
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Kind of dependency an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Inherits,
    Calls,
    UsesType,
    Returns,
    HasField,
}

impl Relationship {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inherits => "inherits",
            Self::Calls => "calls",
            Self::UsesType => "uses_type",
            Self::Returns => "returns",
            Self::HasField => "has_field",
        }
    }

    fn metadata(self) -> NodeMetadata {
        NodeMetadata::from([("relationship".to_string(), MetadataValue::from(self.as_str()))])
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Options, report and errors
// ---------------------------------------------------------------------------

/// Ingestion policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Abort on the first malformed row instead of skipping it.
    pub strict: bool,
}

/// Per-source counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: SourceKind,
    pub file: String,
    /// `false` when the file does not exist.
    pub present: bool,
    /// Rows that passed validation.
    pub rows: usize,
    /// Malformed rows dropped under the lenient policy.
    pub skipped: usize,
    /// Type rows dropped after normalization (`void` or empty).
    pub excluded: usize,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub sources: Vec<SourceSummary>,
}

impl IngestReport {
    /// Total malformed rows skipped across every source.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.sources.iter().map(|s| s.skipped).sum()
    }

    /// Sources whose file was absent.
    #[must_use]
    pub fn missing(&self) -> Vec<SourceKind> {
        self.sources
            .iter()
            .filter(|s| !s.present)
            .map(|s| s.source)
            .collect()
    }
}

/// Errors produced while reading relationship sources.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed row in {} at line {line}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl IngestError {
    /// Stable code for CLI rendering.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::InternalUnexpected,
            Self::Csv { .. } | Self::MalformedRow { .. } | Self::MissingColumn { .. } => {
                ErrorCode::MalformedInput
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Graph construction
// ---------------------------------------------------------------------------

/// Build the dependency graph from every source in `input_dir`.
///
/// # Errors
///
/// Returns an [`IngestError`] if a present file cannot be read, or in strict
/// mode on the first malformed header or row.
#[instrument(skip(options), fields(input = %input_dir.display(), strict = options.strict))]
pub fn build_graph(
    input_dir: &Path,
    options: &IngestOptions,
) -> Result<(GraphStore, IngestReport), IngestError> {
    if !input_dir.is_dir() {
        warn!(
            input = %input_dir.display(),
            "input directory not found; every source will be empty"
        );
    }

    let mut store = GraphStore::new();
    let mut report = IngestReport::default();

    for kind in SourceKind::ALL {
        let summary = ingest_source(&mut store, input_dir, kind, options)?;
        report.sources.push(summary);
    }

    info!(
        nodes = store.node_count(),
        edges = store.edge_count(),
        skipped = report.skipped(),
        "dependency graph built"
    );
    Ok((store, report))
}

fn ingest_source(
    store: &mut GraphStore,
    input_dir: &Path,
    kind: SourceKind,
    options: &IngestOptions,
) -> Result<SourceSummary, IngestError> {
    let path = input_dir.join(kind.file_name());
    let mut summary = SourceSummary {
        source: kind,
        file: kind.file_name().to_string(),
        present: path.is_file(),
        rows: 0,
        skipped: 0,
        excluded: 0,
    };

    if !summary.present {
        warn!(source = %kind, path = %path.display(), "relationship source not found");
        return Ok(summary);
    }

    let table = read_table(&path, kind, options.strict)?;
    summary.rows = table.rows.len();
    summary.skipped = table.skipped;

    match kind.relationship() {
        None => {
            for row in &table.rows {
                let (node, metadata) = public_api_node(row);
                store.add_node(node, Some(&metadata));
            }
        }
        Some(relationship) => {
            let metadata = relationship.metadata();
            for row in &table.rows {
                let from = row.field(0);
                let raw_to = row.field(1);
                let to = if kind.normalizes_target() {
                    if let Some(normalized) = normalize::dependency_type(raw_to) {
                        normalized
                    } else {
                        summary.excluded += 1;
                        continue;
                    }
                } else {
                    raw_to.to_string()
                };
                store.add_edge(from, &to, Some(&metadata));
            }
        }
    }

    debug!(
        source = %kind,
        rows = summary.rows,
        skipped = summary.skipped,
        excluded = summary.excluded,
        "source ingested"
    );
    Ok(summary)
}

fn public_api_node(row: &Row) -> (&str, NodeMetadata) {
    let metadata = NodeMetadata::from([
        ("type".to_string(), MetadataValue::from("public_api")),
        ("class".to_string(), MetadataValue::from(row.field(1))),
        ("method".to_string(), MetadataValue::from(row.field(2))),
        (
            "is_static".to_string(),
            MetadataValue::from(row.optional_field(0).is_some_and(parse_flag)),
        ),
        (
            "is_virtual".to_string(),
            MetadataValue::from(row.optional_field(1).is_some_and(parse_flag)),
        ),
    ]);
    (row.field(0), metadata)
}

/// `true`, `1` and `yes` (any case, surrounding whitespace ignored) are true.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, kind: SourceKind, body: &str) {
        std::fs::write(dir.path().join(kind.file_name()), body).expect("write source");
    }

    fn lenient() -> IngestOptions {
        IngestOptions::default()
    }

    #[test]
    fn parse_flag_accepts_common_truthy_values() {
        for raw in ["true", "TRUE", "1", "yes", " Yes "] {
            assert!(parse_flag(raw), "{raw} should be true");
        }
        for raw in ["false", "0", "no", "", "y"] {
            assert!(!parse_flag(raw), "{raw} should be false");
        }
    }

    #[test]
    fn missing_directory_yields_empty_graph() {
        let dir = TempDir::new().expect("tempdir");
        let (store, report) =
            build_graph(&dir.path().join("absent"), &lenient()).expect("build");
        assert!(store.is_empty());
        assert_eq!(report.missing().len(), SourceKind::ALL.len());
    }

    #[test]
    fn public_api_rows_become_annotated_nodes() {
        let dir = TempDir::new().expect("tempdir");
        write(
            &dir,
            SourceKind::PublicApi,
            "method_qualified,class_name,method_name,is_static,is_virtual\n\
             firebase::App::Create,App,Create,true,0\n",
        );

        let (store, _) = build_graph(dir.path(), &lenient()).expect("build");
        let meta = store.metadata("firebase::App::Create").expect("metadata");
        assert_eq!(meta.get("type"), Some(&MetadataValue::from("public_api")));
        assert_eq!(meta.get("class"), Some(&MetadataValue::from("App")));
        assert_eq!(meta.get("method"), Some(&MetadataValue::from("Create")));
        assert_eq!(meta.get("is_static"), Some(&MetadataValue::Flag(true)));
        assert_eq!(meta.get("is_virtual"), Some(&MetadataValue::Flag(false)));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn edges_carry_relationship_on_dependent() {
        let dir = TempDir::new().expect("tempdir");
        write(
            &dir,
            SourceKind::ClassHierarchy,
            "derived_class,base_class\nfirebase::Auth,firebase::Base\n",
        );
        write(
            &dir,
            SourceKind::MethodCalls,
            "caller_qualified,callee_function\nfirebase::Auth::SignIn,firebase::Auth::Validate\n",
        );

        let (store, report) = build_graph(dir.path(), &lenient()).expect("build");
        assert_eq!(store.dependencies("firebase::Auth"), vec!["firebase::Base"]);
        assert_eq!(
            store
                .metadata("firebase::Auth::SignIn")
                .and_then(|m| m.get("relationship")),
            Some(&MetadataValue::from("calls"))
        );
        assert_eq!(report.missing().len(), 4);
    }

    #[test]
    fn type_targets_are_normalized_and_void_excluded() {
        let dir = TempDir::new().expect("tempdir");
        write(
            &dir,
            SourceKind::ParameterTypes,
            "method_qualified,type_qualified\n\
             App::Create,const AppOptions&\n\
             App::Create,void\n",
        );
        write(
            &dir,
            SourceKind::ReturnTypes,
            "method_qualified,type_qualified\nApp::Create,firebase::App*\n",
        );

        let (store, report) = build_graph(dir.path(), &lenient()).expect("build");
        assert_eq!(
            store.dependencies("App::Create"),
            vec!["AppOptions", "firebase::App"]
        );
        assert!(!store.contains("void"));

        let params = report
            .sources
            .iter()
            .find(|s| s.source == SourceKind::ParameterTypes)
            .expect("summary");
        assert_eq!(params.rows, 2);
        assert_eq!(params.excluded, 1);
    }

    #[test]
    fn strict_mode_surfaces_malformed_input_code() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, SourceKind::FieldTypes, "class_name\nApp\n");

        let err = build_graph(dir.path(), &IngestOptions { strict: true })
            .expect_err("strict must fail");
        assert_eq!(err.error_code(), ErrorCode::MalformedInput);
        assert!(err.to_string().contains("type_qualified"));
    }

    #[test]
    fn relationship_names_are_snake_case() {
        let names: Vec<&str> = SourceKind::ALL
            .iter()
            .filter_map(|k| k.relationship())
            .map(Relationship::as_str)
            .collect();
        assert_eq!(names, vec!["inherits", "calls", "uses_type", "returns", "has_field"]);
    }
}
