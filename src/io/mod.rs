//! Everything that touches the filesystem or produces text
//!
//! - [`resolver`]: expanding paths into documents
//! - [`loader`]: reading documents into records
//! - [`query_file`]: query specifications from YAML/JSON and condition expressions
//! - [`formatter`]: rendering result records

pub mod formatter;
pub mod loader;
pub mod query_file;
pub mod resolver;

pub use formatter::{render, render_table, OutputFormat};
pub use loader::{DocumentLoader, LoaderConfig};
pub use query_file::{load_query_file, parse_condition_expr, parse_query};
pub use resolver::{DocumentResolver, ResolverConfig};
