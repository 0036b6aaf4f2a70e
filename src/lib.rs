//! matterq: spreadsheet-like queries over the front matter of markdown notes
//!
//! The library has two halves. The core parses the small YAML-like block at
//! the top of a document into a typed [`Record`] and runs [`QuerySpec`]s over
//! collections of records. The I/O layer finds documents on disk, loads them,
//! reads query files and renders results.
//!
//! # Quick Start
//!
//! ## Parsing
//!
//! ```rust
//! use matterq::{parse_document, Value};
//!
//! let text = "---\nrating: 4\nstart: 2024-11-03\ntags: [book, sci-fi]\n---\n# Dune\n";
//! let record = parse_document(text, "books/Dune.md");
//!
//! assert_eq!(record.value("rating"), &Value::from(4.0));
//! assert_eq!(record.file().title, "Dune");
//! ```
//!
//! ## Querying
//!
//! ```rust
//! use matterq::{execute, parse_document, Condition, QuerySpec, SortOrder};
//!
//! let records = vec![
//!     parse_document("---\ntype: book\nstart: 2024-11-03\n---\n", "Dune.md"),
//!     parse_document("---\ntype: movie\nstart: 2023-06-30\n---\n", "Arrival.md"),
//!     parse_document("---\ntype: book\nstart: 2024-01-09\n---\n", "Foundation.md"),
//! ];
//!
//! let spec = QuerySpec::new()
//!     .filter("type", Condition::one_of(["book", "audiobook"]))
//!     .sort_by("start", SortOrder::Desc)
//!     .limit(10)
//!     .select(["title", "start"]);
//!
//! let results = execute(&records, &spec);
//! let titles: Vec<_> = results.iter().map(|r| r.file().title.as_str()).collect();
//! assert_eq!(titles, ["Dune", "Foundation"]);
//! ```
//!
//! ## Loading a folder
//!
//! ```rust,no_run
//! use matterq::{load_directory, parse_query, execute, Result};
//!
//! fn main() -> Result<()> {
//!     let records = load_directory("notes/")?;
//!     let spec = parse_query("where:\n  status: { ne: done }\nsort: due\n")?;
//!     for record in execute(&records, &spec) {
//!         println!("{}", record.file().path);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: values, records, the parser and the query engine (no I/O)
//! - [`io`]: document discovery, loading, query files and output rendering
//! - [`error`]: error types for the I/O layer

// Public API exports
pub use crate::error::{MatterQError, Result};

// Core types
pub use crate::core::{
    Condition, DateValue, FileMeta, FrontmatterParser, Operator, QueryEngine, QuerySpec, Record,
    SortOrder, SortSpec, Value,
};

// IO types
pub use crate::io::{
    load_query_file, parse_condition_expr, parse_query, DocumentLoader, DocumentResolver,
    LoaderConfig, OutputFormat, ResolverConfig,
};

pub mod core;
pub mod error;
pub mod io;

pub use convenience::*;

/// Convenience functions for common operations
pub mod convenience {
    //! Convenience functions that use default settings throughout

    use crate::core::{query, FrontmatterParser, QuerySpec, Record};
    use crate::io::{DocumentLoader, DocumentResolver};
    use crate::Result;
    use std::path::Path;

    /// Parse one document's text into a record
    pub fn parse_document(text: &str, identity: &str) -> Record {
        FrontmatterParser::new().parse(text, identity)
    }

    /// Load every markdown document under a directory
    pub fn load_directory<P: AsRef<Path>>(dir: P) -> Result<Vec<Record>> {
        DocumentLoader::new().load_paths(&DocumentResolver::new(), &[dir])
    }

    /// Run a query over records
    pub fn execute(records: &[Record], spec: &QuerySpec) -> Vec<Record> {
        query::execute(records, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_end_to_end_workflow() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("Dune.md"),
            "---\ntype: book\nrating: 5\n---\n# Dune\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("Serial.md"),
            "---\ntype: podcast\nrating: 4\n---\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("Scratch.md"), "no front matter\n").unwrap();

        let records = load_directory(temp_dir.path()).unwrap();
        assert_eq!(records.len(), 3);

        let spec = QuerySpec::new()
            .filter("rating", Condition::exists())
            .sort_by("rating", SortOrder::Asc)
            .select(["title", "rating"]);
        let results = execute(&records, &spec);

        let titles: Vec<_> = results.iter().map(|r| r.file().title.as_str()).collect();
        assert_eq!(titles, ["Serial", "Dune"]);
        assert_eq!(results[0].len(), 2);
    }

    #[test]
    fn test_error_handling() {
        let result = load_directory("/nonexistent/notes");
        assert!(matches!(result, Err(MatterQError::FileNotFound { .. })));

        let invalid = parse_query("where:\n  x: { near: 3 }");
        assert!(matches!(invalid, Err(MatterQError::InvalidCondition { .. })));
    }
}
