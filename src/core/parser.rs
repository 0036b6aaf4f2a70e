//! Line-oriented front matter parser
//!
//! This is deliberately not a YAML parser. It understands the flat subset
//! people actually write at the top of notes:
//!
//! ```text
//! ---
//! rating: 4
//! start: 2024-11-03
//! tags: [book, sci-fi]
//! authors:
//!   - Frank Herbert
//! ---
//! ```
//!
//! Parsing never fails. Lines it does not understand are skipped, and a
//! document without a front matter block still yields a record carrying its
//! file metadata.

use crate::core::record::{FileMeta, Record};
use crate::core::value::{DateValue, Value};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

const DELIMITER: &str = "---";

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s+(.*)$").expect("list item pattern is valid"));

static KEY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_-]*)\s*:\s*(.*)$").expect("key line pattern is valid")
});

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").expect("number pattern is valid"));

/// Parse one document into a record
///
/// `identity` is usually the file path; it only feeds [`FileMeta`].
pub fn parse(raw_text: &str, identity: &str) -> Record {
    FrontmatterParser::new().parse(raw_text, identity)
}

/// Return the text between the opening and closing `---` lines, if the
/// document starts with a front matter block
pub fn extract_block(raw_text: &str) -> Option<String> {
    let mut lines = raw_text.lines();
    if lines.next()?.trim_end() != DELIMITER {
        return None;
    }

    let mut body = Vec::new();
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some(body.join("\n"));
        }
        body.push(line);
    }
    // no closing delimiter
    None
}

/// Parse a single scalar
///
/// Precedence matters: `true` is a boolean but `"true"` stays a string,
/// and `2024-01-01` is a date while `'2024-01-01'` is text.
pub fn parse_scalar(raw: &str) -> Value {
    let s = raw.trim();

    if s.is_empty() {
        return Value::Null;
    }
    match s {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "~" => return Value::Null,
        _ => {}
    }
    if NUMBER.is_match(s) {
        if let Ok(n) = s.parse::<f64>() {
            return Value::Number(n);
        }
    }
    if let Some(date) = DateValue::parse(s) {
        return Value::Date(date);
    }
    if let Some(inner) = strip_quotes(s) {
        return Value::string(inner);
    }
    Value::string(s)
}

fn strip_quotes(s: &str) -> Option<&str> {
    if s.len() < 2 {
        return None;
    }
    ['"', '\'']
        .iter()
        .find_map(|&q| s.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)))
}

/// Parse `[a, b, c]` into a list, dropping empty elements
fn parse_inline_list(s: &str) -> Option<Value> {
    let inner = s.strip_prefix('[')?.strip_suffix(']')?;
    Some(Value::list(
        inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(parse_scalar),
    ))
}

#[derive(Debug)]
enum State {
    TopLevel,
    CollectingList { key: String, items: Vec<Value> },
}

/// Front matter parser
///
/// Holds no state between documents, so one instance can parse any number
/// of them, from any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterParser;

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw document text into a record
    pub fn parse(&self, raw_text: &str, identity: &str) -> Record {
        let file = FileMeta::from_identity(identity);
        match extract_block(raw_text) {
            Some(block) => Record::with_fields(file, self.parse_block(&block)),
            None => {
                trace!("{}: no front matter block", identity);
                Record::new(file)
            }
        }
    }

    /// Parse the body of a front matter block (without delimiters)
    pub fn parse_block(&self, block: &str) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        let mut state = State::TopLevel;

        for line in block.lines() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(caps) = LIST_ITEM.captures(line) {
                match &mut state {
                    State::CollectingList { items, .. } => items.push(parse_scalar(&caps[1])),
                    State::TopLevel => trace!("dropping list item outside a list: {:?}", line),
                }
                continue;
            }

            if let Some(caps) = KEY_LINE.captures(line) {
                if let State::CollectingList { key, items } =
                    std::mem::replace(&mut state, State::TopLevel)
                {
                    fields.insert(key, Value::List(items));
                }

                let key = caps[1].to_string();
                let raw_value = caps[2].trim();
                if let Some(list) = parse_inline_list(raw_value) {
                    fields.insert(key, list);
                } else if raw_value.is_empty() {
                    state = State::CollectingList {
                        key,
                        items: Vec::new(),
                    };
                } else {
                    fields.insert(key, parse_scalar(raw_value));
                }
                continue;
            }

            trace!("ignoring unrecognized line: {:?}", line);
        }

        if let State::CollectingList { key, items } = state {
            fields.insert(key, Value::List(items));
        }

        fields
    }
}
