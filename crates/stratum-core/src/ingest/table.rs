//! Header-addressed CSV row loading.
//!
//! Columns are located by header name, so column order and extra columns in
//! the file do not matter. A row is malformed when the reader rejects it or
//! when it is too short to reach a required column. In lenient mode such rows
//! are skipped with a warning; in strict mode the first one becomes an
//! [`IngestError`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, warn};

use super::{IngestError, SourceKind};

/// One validated row: required values in declaration order, optional values
/// when the column exists and the row reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: u64,
    pub required: Vec<String>,
    pub optional: Vec<Option<String>>,
}

impl Row {
    /// Required column value by position.
    #[must_use]
    pub fn field(&self, idx: usize) -> &str {
        self.required.get(idx).map_or("", String::as_str)
    }

    /// Optional column value by position, `None` when absent.
    #[must_use]
    pub fn optional_field(&self, idx: usize) -> Option<&str> {
        self.optional.get(idx).and_then(Option::as_deref)
    }
}

/// Rows read from one source file.
#[derive(Debug, Default)]
pub struct Table {
    pub rows: Vec<Row>,
    pub skipped: usize,
}

/// Read every row of `path` for `kind`.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be opened or its header
/// cannot be read. In strict mode, also returns [`IngestError::MissingColumn`]
/// or [`IngestError::MalformedRow`] for the first offending header or row.
pub fn read_table(path: &Path, kind: SourceKind, strict: bool) -> Result<Table, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let mut required_idx = Vec::with_capacity(kind.required_columns().len());
    let mut missing: Option<&'static str> = None;
    for &name in kind.required_columns() {
        match column(name) {
            Some(idx) => required_idx.push(idx),
            None => {
                missing.get_or_insert(name);
            }
        }
    }
    let optional_idx: Vec<Option<usize>> =
        kind.optional_columns().iter().map(|&name| column(name)).collect();

    if let Some(column) = missing {
        if strict {
            return Err(IngestError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
        let skipped = reader.records().count();
        warn!(
            path = %path.display(),
            column,
            skipped,
            "required column missing from header; skipping every row"
        );
        return Ok(Table {
            rows: Vec::new(),
            skipped,
        });
    }

    let mut table = Table::default();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map_or(0, csv::Position::line);
                let reason = err.to_string();
                skip_or_fail(path, line, reason, strict)?;
                table.skipped += 1;
                continue;
            }
        };

        let line = record.position().map_or(0, csv::Position::line);

        let required: Option<Vec<String>> = required_idx
            .iter()
            .map(|idx| record.get(*idx).map(str::to_string))
            .collect();
        let Some(required) = required else {
            let reason = format!(
                "row has {} fields, too short for required columns",
                record.len()
            );
            skip_or_fail(path, line, reason, strict)?;
            table.skipped += 1;
            continue;
        };

        let optional = optional_idx
            .iter()
            .map(|idx| idx.and_then(|idx| record.get(idx)).map(str::to_string))
            .collect();

        table.rows.push(Row {
            line,
            required,
            optional,
        });
    }

    debug!(
        path = %path.display(),
        rows = table.rows.len(),
        skipped = table.skipped,
        "read relationship table"
    );
    Ok(table)
}

fn skip_or_fail(path: &Path, line: u64, reason: String, strict: bool) -> Result<(), IngestError> {
    if strict {
        return Err(IngestError::MalformedRow {
            path: path.to_path_buf(),
            line,
            reason,
        });
    }
    warn!(path = %path.display(), line, %reason, "skipping malformed row");
    Ok(())
}
