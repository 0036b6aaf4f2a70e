//! Core types: values, records, the front matter parser and the query engine
//!
//! Nothing in here touches the filesystem. Callers hand the parser raw text
//! and hand the engine records.

pub mod condition;
pub mod parser;
pub mod query;
pub mod record;
pub mod value;

pub use condition::{Condition, Operator, Predicate};
pub use parser::{parse_scalar, FrontmatterParser};
pub use query::{QueryEngine, QuerySpec, SortOrder, SortSpec};
pub use record::{FileMeta, Record, RESERVED_FIELDS};
pub use value::{DateValue, Value};
