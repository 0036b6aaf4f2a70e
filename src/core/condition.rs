//! Per-field conditions used by the `where` stage of a query
//!
//! A condition comes in one of three shapes:
//!
//! - a literal value, matched by equality (with a special case for `false`)
//! - a predicate closure receiving the field value and the whole record
//! - an operator with a target, e.g. `gte 2024-01-01` or `in [book, audiobook]`

use crate::core::record::Record;
use crate::core::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Function type used in `Condition::Predicate`
pub type Predicate = dyn Fn(&Value, &Record) -> bool + Send + Sync;

/// Comparison operators available to operator conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    NotContains,
    In,
    Exists,
    NotExists,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Contains,
        Self::NotContains,
        Self::In,
        Self::Exists,
        Self::NotExists,
    ];

    /// Parse an operator from its name (e.g. `"gte"`, `"not_contains"`)
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == s)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::In => "in",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
        }
    }

    /// Whether the operator ignores its target
    pub fn is_unary(&self) -> bool {
        matches!(self, Self::Exists | Self::NotExists)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A test applied to one field of a record
#[derive(Clone)]
pub enum Condition {
    /// Equality against a literal
    Literal(Value),
    /// Arbitrary caller logic; its answer is used as is
    Predicate(Arc<Predicate>),
    /// `{ operator, target }`
    Operator { op: Operator, target: Value },
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Predicate(_) => write!(f, "Predicate(<function>)"),
            Self::Operator { op, target } => f
                .debug_struct("Operator")
                .field("op", op)
                .field("target", target)
                .finish(),
        }
    }
}

impl Condition {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value, &Record) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn op(op: Operator, target: impl Into<Value>) -> Self {
        Self::Operator {
            op,
            target: target.into(),
        }
    }

    pub fn eq(target: impl Into<Value>) -> Self {
        Self::op(Operator::Eq, target)
    }

    pub fn ne(target: impl Into<Value>) -> Self {
        Self::op(Operator::Ne, target)
    }

    pub fn gt(target: impl Into<Value>) -> Self {
        Self::op(Operator::Gt, target)
    }

    pub fn gte(target: impl Into<Value>) -> Self {
        Self::op(Operator::Gte, target)
    }

    pub fn lt(target: impl Into<Value>) -> Self {
        Self::op(Operator::Lt, target)
    }

    pub fn lte(target: impl Into<Value>) -> Self {
        Self::op(Operator::Lte, target)
    }

    pub fn contains(target: impl Into<Value>) -> Self {
        Self::op(Operator::Contains, target)
    }

    pub fn not_contains(target: impl Into<Value>) -> Self {
        Self::op(Operator::NotContains, target)
    }

    /// Membership in a list of candidates
    pub fn one_of<I, V>(candidates: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::op(
            Operator::In,
            Value::list(candidates.into_iter().map(Into::into)),
        )
    }

    pub fn exists() -> Self {
        Self::op(Operator::Exists, Value::Null)
    }

    pub fn not_exists() -> Self {
        Self::op(Operator::NotExists, Value::Null)
    }

    /// Check `record[field]` against this condition
    pub fn matches(&self, record: &Record, field: &str) -> bool {
        matches(record, field, self)
    }
}

/// Decide whether `record[field]` satisfies `condition`
///
/// Absent fields are treated as null.
pub fn matches(record: &Record, field: &str, condition: &Condition) -> bool {
    let value = record.value(field);
    match condition {
        Condition::Predicate(predicate) => predicate(value, record),
        Condition::Operator { op, target } => apply_operator(*op, value, target),
        Condition::Literal(expected) => matches_literal(value, expected),
    }
}

fn matches_literal(value: &Value, expected: &Value) -> bool {
    match expected {
        Value::Null => value.is_null(),
        // unset and blank count as false
        Value::Bool(false) => match value {
            Value::Bool(false) | Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        },
        Value::Bool(true) => matches!(value, Value::Bool(true)),
        other => value.loosely_equals(other),
    }
}

fn apply_operator(op: Operator, value: &Value, target: &Value) -> bool {
    match op {
        Operator::Eq => value.loosely_equals(target),
        Operator::Ne => !value.loosely_equals(target),
        Operator::Gt => value.compare(target) == Ordering::Greater,
        Operator::Gte => value.compare(target) != Ordering::Less,
        Operator::Lt => value.compare(target) == Ordering::Less,
        Operator::Lte => value.compare(target) != Ordering::Greater,
        Operator::Contains => contains(value, target).unwrap_or(false),
        Operator::NotContains => value.is_null() || !contains(value, target).unwrap_or(false),
        Operator::In => target
            .as_list()
            .map(|candidates| candidates.iter().any(|c| value.loosely_equals(c)))
            .unwrap_or(false),
        Operator::Exists => !value.is_null(),
        Operator::NotExists => value.is_null(),
    }
}

/// Strings match case-insensitive substrings, lists match members exactly;
/// `None` for types that cannot contain anything
fn contains(value: &Value, target: &Value) -> Option<bool> {
    match value {
        Value::String(s) => {
            let needle = target.to_string().to_lowercase();
            Some(s.to_lowercase().contains(&needle))
        }
        Value::List(items) => Some(items.iter().any(|item| item.loosely_equals(target))),
        _ => None,
    }
}
