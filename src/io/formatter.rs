//! Rendering query results
//!
//! The query engine hands back records; this module turns them into text for
//! the command line. Nothing here is needed to run a query.

use crate::core::{Record, Value, RESERVED_FIELDS};
use crate::error::Result;
use std::collections::BTreeSet;

/// Output formats for result records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown table
    #[default]
    Table,
    /// JSON array of objects
    Json,
    /// YAML sequence of mappings
    Yaml,
    /// One document path per line
    Paths,
}

/// Render records in the requested format
///
/// `columns` are the table columns; when `None` the table shows `title`
/// followed by every field present in the results.
pub fn render(records: &[Record], columns: Option<&[String]>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let columns = match columns {
                Some(columns) => columns.to_vec(),
                None => default_columns(records),
            };
            Ok(render_table(records, &columns))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(records)?),
        OutputFormat::Paths => Ok(records
            .iter()
            .map(|record| format!("{}\n", record.file().path))
            .collect()),
    }
}

/// `title` followed by the sorted union of non-reserved field names
pub fn default_columns(records: &[Record]) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.fields().keys().map(String::as_str))
        .filter(|name| !RESERVED_FIELDS.contains(name))
        .collect();
    std::iter::once("title")
        .chain(names)
        .map(str::to_string)
        .collect()
}

/// Render records as a markdown table
///
/// Reserved columns (`title`, `name`, `path`) read from the file metadata,
/// like a projection does.
pub fn render_table<S: AsRef<str>>(records: &[Record], columns: &[S]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let header: Vec<String> = columns.iter().map(|c| escape_cell(c.as_ref())).collect();
    let separator = vec!["---".to_string(); columns.len()];
    let mut lines = vec![table_row(&header), table_row(&separator)];

    for record in records {
        let projected = record.project(columns);
        let cells: Vec<String> = columns
            .iter()
            .map(|column| cell_text(projected.value(column.as_ref())))
            .collect();
        lines.push(table_row(&cells));
    }
    lines.join("")
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |\n", cells.join(" | "))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => escape_cell(&other.to_string()),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
