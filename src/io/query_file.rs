//! Building query specifications from text
//!
//! Two sources are supported:
//!
//! - query files in YAML (or JSON):
//!
//!   ```yaml
//!   where:
//!     type: { in: [book, audiobook] }
//!     killed: false
//!     start: { gte: 2024-01-01 }
//!   sort: { field: start, order: desc }
//!   limit: 10
//!   fields: [title, start]
//!   ```
//!
//! - single condition expressions as typed on the command line:
//!   `type=book`, `start:gte=2024-01-01`, `type:in=book,audiobook`,
//!   `rating:exists`.

use crate::core::{parse_scalar, Condition, Operator, QuerySpec, SortOrder, SortSpec, Value};
use crate::error::{MatterQError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

static CONDITION_EXPR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_-]*)(?::([a-z_]+))?(?:=(.*))?$")
        .expect("condition expression pattern is valid")
});

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryDocument {
    #[serde(default, rename = "where")]
    conditions: serde_yaml::Mapping,
    #[serde(default)]
    sort: Option<SortDocument>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    fields: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SortDocument {
    Field(String),
    Full {
        field: String,
        #[serde(default)]
        order: Option<String>,
    },
}

impl SortDocument {
    fn into_sort_spec(self) -> Result<SortSpec> {
        match self {
            Self::Field(field) => Ok(SortSpec::asc(field)),
            Self::Full { field, order } => {
                let order = match order {
                    Some(name) => SortOrder::from_name(&name).ok_or_else(|| {
                        MatterQError::invalid_query(format!("unknown sort order '{}'", name))
                    })?,
                    None => SortOrder::Asc,
                };
                Ok(SortSpec::new(field, order))
            }
        }
    }
}

/// Parse a query specification from YAML or JSON text
pub fn parse_query(text: &str) -> Result<QuerySpec> {
    if text.trim().is_empty() {
        return Ok(QuerySpec::new());
    }

    let document: QueryDocument = serde_yaml::from_str(text)?;
    let mut spec = QuerySpec::new();

    for (key, condition) in &document.conditions {
        let field = key
            .as_str()
            .ok_or_else(|| MatterQError::invalid_query(format!("field name {:?} is not a string", key)))?;
        spec.set_condition(field, condition_from_yaml(field, condition)?);
    }

    if let Some(sort) = document.sort {
        spec = spec.with_sort(Some(sort.into_sort_spec()?));
    }
    if let Some(limit) = document.limit {
        spec = spec.limit(limit);
    }
    if let Some(fields) = document.fields {
        spec = spec.select(fields);
    }
    Ok(spec)
}

/// Read and parse a query file
pub fn load_query_file<P: AsRef<Path>>(path: P) -> Result<QuerySpec> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(MatterQError::file_not_found(path));
    }
    parse_query(&fs::read_to_string(path)?)
}

/// Turn a `where` entry into a condition
///
/// A mapping with a single operator key is an operator condition, anything
/// else is a literal.
fn condition_from_yaml(field: &str, yaml: &serde_yaml::Value) -> Result<Condition> {
    let serde_yaml::Value::Mapping(map) = yaml else {
        return Ok(Condition::Literal(value_from_yaml(field, yaml)?));
    };

    let mut entries = map.iter();
    let (op_name, target) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(MatterQError::invalid_condition(
                field,
                "an operator condition needs exactly one operator",
            ))
        }
    };
    let op = op_name
        .as_str()
        .and_then(Operator::from_name)
        .ok_or_else(|| {
            MatterQError::invalid_condition(field, format!("unknown operator {:?}", op_name))
        })?;

    if op.is_unary() {
        return Ok(Condition::op(op, Value::Null));
    }
    Ok(Condition::op(op, value_from_yaml(field, target)?))
}

fn value_from_yaml(field: &str, yaml: &serde_yaml::Value) -> Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Sequence(items) => Value::list(
            items
                .iter()
                .map(|item| scalar_from_yaml(field, item))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => scalar_from_yaml(field, other)?,
    })
}

fn scalar_from_yaml(field: &str, yaml: &serde_yaml::Value) -> Result<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| MatterQError::invalid_condition(field, format!("bad number {}", n))),
        serde_yaml::Value::String(s) => Ok(Value::date_or_string(s)),
        serde_yaml::Value::Sequence(_) => Err(MatterQError::invalid_condition(
            field,
            "lists cannot be nested",
        )),
        serde_yaml::Value::Mapping(_) | serde_yaml::Value::Tagged(_) => Err(
            MatterQError::invalid_condition(field, "expected a scalar value"),
        ),
    }
}

/// Parse a command-line condition expression into `(field, condition)`
///
/// - `FIELD=VALUE` is a literal condition
/// - `FIELD:OP=VALUE` is an operator condition; `in` takes a comma-separated list
/// - `FIELD:exists` and `FIELD:not_exists` take no value
///
/// Values follow the same scalar rules as front matter, so `false`, `3` and
/// `2024-01-01` are typed.
pub fn parse_condition_expr(expr: &str) -> Result<(String, Condition)> {
    let caps = CONDITION_EXPR.captures(expr.trim()).ok_or_else(|| {
        MatterQError::invalid_query(format!(
            "cannot parse condition '{}' (expected FIELD=VALUE or FIELD:OP=VALUE)",
            expr
        ))
    })?;

    let field = caps[1].to_string();
    let raw_value = caps.get(3).map(|m| m.as_str());

    let Some(op_name) = caps.get(2).map(|m| m.as_str()) else {
        let value = raw_value.ok_or_else(|| {
            MatterQError::invalid_condition(&field, "missing '=VALUE'")
        })?;
        return Ok((field, Condition::Literal(parse_scalar(value))));
    };

    let op = Operator::from_name(op_name).ok_or_else(|| {
        MatterQError::invalid_condition(&field, format!("unknown operator '{}'", op_name))
    })?;

    let condition = match (op.is_unary(), raw_value) {
        (true, None) => Condition::op(op, Value::Null),
        (true, Some(_)) => {
            return Err(MatterQError::invalid_condition(
                &field,
                format!("operator '{}' takes no value", op),
            ))
        }
        (false, None) => {
            return Err(MatterQError::invalid_condition(
                &field,
                format!("operator '{}' needs a value", op),
            ))
        }
        (false, Some(value)) if op == Operator::In => Condition::op(op, parse_list_expr(value)),
        (false, Some(value)) => Condition::op(op, parse_scalar(value)),
    };
    Ok((field, condition))
}

fn parse_list_expr(s: &str) -> Value {
    let s = s.trim();
    let inner = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    Value::list(
        inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(parse_scalar),
    )
}
