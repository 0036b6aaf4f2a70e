//! Typed values extracted from front matter
//!
//! A [`Value`] is what a single front matter field parses to. Besides the
//! usual scalars it has a [`DateValue`] for `YYYY-MM-DD` literals, which
//! orders by calendar tuple but still remembers the text it came from.
//!
//! The ordering defined by [`Value::compare`] is total and is shared by
//! sorting and by the `gt`/`gte`/`lt`/`lte` operators.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("date pattern is valid"));

/// A calendar date written as `YYYY-MM-DD` in front matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateValue {
    year: i32,
    month: u32,
    day: u32,
    literal: String,
}

impl DateValue {
    /// Parse a date literal; anything other than exactly `YYYY-MM-DD` is rejected
    ///
    /// Only the shape is checked, so `2024-13-40` is still a date.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = DATE_PATTERN.captures(s)?;
        Some(Self {
            year: caps[1].parse().ok()?,
            month: caps[2].parse().ok()?,
            day: caps[3].parse().ok()?,
            literal: caps[0].to_string(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The text the date was parsed from
    pub fn literal(&self) -> &str {
        &self.literal
    }

    fn tuple(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

impl Ord for DateValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tuple().cmp(&other.tuple())
    }
}

impl PartialOrd for DateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A typed front matter value
///
/// Lists are flat: the parser only understands one level of nesting, so a
/// `List` never holds another `List`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateValue),
    List(Vec<Value>),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Create a list value
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::List(items.into_iter().collect())
    }

    /// Create a date value from its literal, falling back to a string when
    /// the literal is not `YYYY-MM-DD`
    pub fn date_or_string(s: &str) -> Self {
        DateValue::parse(s)
            .map(Self::Date)
            .unwrap_or_else(|| Self::string(s))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateValue> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Name of the variant, for logs and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::List(_) => "list",
        }
    }

    /// Replace a date with its literal text; every other value is returned as is
    fn unwrap_date(&self) -> Cow<'_, Value> {
        match self {
            Self::Date(d) => Cow::Owned(Self::String(d.literal.clone())),
            other => Cow::Borrowed(other),
        }
    }

    /// Equality used by query conditions
    ///
    /// Dates on either side are compared by their literal text, so a date
    /// field equals the string `"2024-11-03"` as well as the date itself.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self.unwrap_date().as_ref(), other.unwrap_date().as_ref()) {
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (a, b) => a == b,
        }
    }

    /// Total order over values
    ///
    /// - nulls are equal to each other and sort after everything else
    /// - two dates compare by (year, month, day)
    /// - a date against anything else compares as its literal text
    /// - numbers, strings and booleans compare naturally against their own kind
    /// - any other mix compares by string representation
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => return Ordering::Equal,
            (Self::Null, _) => return Ordering::Greater,
            (_, Self::Null) => return Ordering::Less,
            (Self::Date(a), Self::Date(b)) => return a.cmp(b),
            _ => {}
        }

        let left = self.unwrap_date();
        let right = other.unwrap_date();
        match (left.as_ref(), right.as_ref()) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateValue> for Value {
    fn from(d: DateValue) -> Self {
        Self::Date(d)
    }
}

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            Self::String(s) => write!(f, "{}", s),
            Self::Date(d) => write!(f, "{}", d.literal),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(d) => serializer.serialize_str(&d.literal),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Value {
        Value::Date(DateValue::parse(s).unwrap())
    }

    #[test]
    fn test_date_parsing() {
        let d = DateValue::parse("2024-11-03").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 11, 3));
        assert_eq!(d.literal(), "2024-11-03");

        assert!(DateValue::parse("2024-1-1").is_none());
        assert!(DateValue::parse(" 2024-01-01").is_none());
        assert!(DateValue::parse("2024-01-01T10:00").is_none());
    }

    #[test]
    fn test_null_sorts_last() {
        assert_eq!(Value::Null.compare(&Value::Null), Ordering::Equal);
        assert_eq!(Value::Null.compare(&Value::from(1.0)), Ordering::Greater);
        assert_eq!(Value::from("a").compare(&Value::Null), Ordering::Less);
    }

    #[test]
    fn test_dates_compare_as_tuples() {
        assert_eq!(
            date("2024-02-01").compare(&date("2024-01-09")),
            Ordering::Greater
        );
        assert_eq!(date("2023-12-31").compare(&date("2024-01-01")), Ordering::Less);
        assert_eq!(date("2024-05-05").compare(&date("2024-05-05")), Ordering::Equal);
    }

    #[test]
    fn test_date_against_string_uses_literal() {
        assert_eq!(
            date("2024-02-01").compare(&Value::from("2024-01-09")),
            Ordering::Greater
        );
        // "2024-1-1" is not a date, so this is plain text ordering: '0' < '1'
        assert_eq!(
            date("2024-01-09").compare(&Value::from("2024-1-1")),
            Ordering::Less
        );
    }

    #[test]
    fn test_same_type_natural_order() {
        assert_eq!(Value::from(2.0).compare(&Value::from(10.0)), Ordering::Less);
        assert_eq!(Value::from("b").compare(&Value::from("a")), Ordering::Greater);
        assert_eq!(Value::from(false).compare(&Value::from(true)), Ordering::Less);
    }

    #[test]
    fn test_cross_type_falls_back_to_text() {
        // "10" < "9" as text even though 10 > 9 as numbers
        assert_eq!(Value::from(10.0).compare(&Value::from("9")), Ordering::Less);
        // "true" > "1"
        assert_eq!(Value::from(true).compare(&Value::from(1.0)), Ordering::Greater);
    }

    #[test]
    fn test_loose_equality() {
        assert!(date("2024-11-03").loosely_equals(&Value::from("2024-11-03")));
        assert!(Value::from("2024-11-03").loosely_equals(&date("2024-11-03")));
        assert!(Value::from(3.0).loosely_equals(&Value::from(3i64)));
        assert!(!Value::from("3").loosely_equals(&Value::from(3.0)));
        assert!(Value::list(vec![date("2024-01-01")])
            .loosely_equals(&Value::list(vec![Value::from("2024-01-01")])));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(4.0).to_string(), "4");
        assert_eq!(Value::from(4.5).to_string(), "4.5");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::list(vec![Value::from("a"), Value::from(1.0)]).to_string(),
            "a, 1"
        );
    }

    #[test]
    fn test_serialize() {
        let v = Value::list(vec![date("2024-11-03"), Value::from(3.0), Value::from(0.5)]);
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"["2024-11-03",3,0.5]"#
        );
    }
}
