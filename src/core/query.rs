//! Query pipeline over parsed records
//!
//! A [`QuerySpec`] describes up to four stages, which always run in the same
//! order:
//!
//! 1. **filter**: keep records satisfying every `where` condition
//! 2. **sort**: stable sort on one field using [`Value::compare`]
//! 3. **limit**: keep the first `n` records
//! 4. **select**: project each record to the requested fields
//!
//! A stage that the query leaves unset passes its input through. No
//! stage mutates the records it is given.

use crate::core::condition::{matches, Condition};
use crate::core::record::Record;
use crate::core::value::Value;
use log::debug;
use std::cmp::Ordering;
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a direction from its name (`"asc"` or `"desc"`)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Which field to sort on, and in which direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

/// A query request: where / sort / limit / fields
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    conditions: Vec<(String, Condition)>,
    sort: Option<SortSpec>,
    limit: Option<usize>,
    fields: Option<Vec<String>>,
}

impl QuerySpec {
    /// Create a query that returns every record unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition on `field`, replacing any earlier condition on it
    pub fn filter(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.set_condition(field, condition);
        self
    }

    /// Add a literal-equality condition on `field`
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, Condition::literal(value))
    }

    /// Add a predicate condition on `field`
    pub fn where_fn<F>(self, field: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value, &Record) -> bool + Send + Sync + 'static,
    {
        self.filter(field, Condition::predicate(predicate))
    }

    /// Sort on `field` in the given direction
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortSpec::new(field, order));
        self
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Keep at most `n` records; zero means no limit
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Project results to these fields
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Insert or replace the condition on `field`
    pub fn set_condition(&mut self, field: impl Into<String>, condition: Condition) {
        let field = field.into();
        match self.conditions.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = condition,
            None => self.conditions.push((field, condition)),
        }
    }

    pub fn conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// The effective limit; zero counts as unset
    pub fn limit_value(&self) -> Option<usize> {
        self.limit.filter(|&n| n > 0)
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// Check if this query has no stages at all
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
            && self.sort.is_none()
            && self.limit_value().is_none()
            && self.fields.is_none()
    }
}

/// Runs [`QuerySpec`]s against record collections
///
/// The engine holds no state; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run all four stages and return the resulting records
    pub fn execute(&self, records: &[Record], spec: &QuerySpec) -> Vec<Record> {
        let filtered = self.filter(records, spec.conditions());
        let sorted = match spec.sort() {
            Some(sort) => self.sort(&filtered, sort),
            None => filtered,
        };
        let limited = match spec.limit_value() {
            Some(n) => self.limit(&sorted, n),
            None => sorted,
        };
        let selected = match spec.fields() {
            Some(fields) => self.select(&limited, fields),
            None => limited,
        };
        debug!(
            "query over {} records returned {}",
            records.len(),
            selected.len()
        );
        selected
    }

    /// Keep records that satisfy every condition
    pub fn filter(&self, records: &[Record], conditions: &[(String, Condition)]) -> Vec<Record> {
        let kept: Vec<Record> = records
            .iter()
            .filter(|record| {
                conditions
                    .iter()
                    .all(|(field, condition)| matches(record, field, condition))
            })
            .cloned()
            .collect();
        debug!("filter: {} -> {} records", records.len(), kept.len());
        kept
    }

    /// Stable sort on one field; records without the field always come last
    pub fn sort(&self, records: &[Record], sort: &SortSpec) -> Vec<Record> {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| {
            compare_for_sort(a.value(&sort.field), b.value(&sort.field), sort.order)
        });
        debug!(
            "sort: {} records by {} {}",
            sorted.len(),
            sort.field,
            sort.order
        );
        sorted
    }

    /// Keep the first `n` records; zero keeps them all
    pub fn limit(&self, records: &[Record], n: usize) -> Vec<Record> {
        if n == 0 {
            return records.to_vec();
        }
        records.iter().take(n).cloned().collect()
    }

    /// Project every record to `fields`
    pub fn select<S: AsRef<str>>(&self, records: &[Record], fields: &[S]) -> Vec<Record> {
        records.iter().map(|record| record.project(fields)).collect()
    }
}

/// Descending order reverses values but keeps nulls at the end
fn compare_for_sort(a: &Value, b: &Value, order: SortOrder) -> Ordering {
    match (a.is_null(), b.is_null(), order) {
        (false, false, SortOrder::Desc) => b.compare(a),
        _ => a.compare(b),
    }
}

/// Run a query with a default engine
pub fn execute(records: &[Record], spec: &QuerySpec) -> Vec<Record> {
    QueryEngine::new().execute(records, spec)
}
