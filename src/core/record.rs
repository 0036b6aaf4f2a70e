//! Parsed documents
//!
//! A [`Record`] is one document's front matter fields plus the [`FileMeta`]
//! identity of the document it came from. The identity is derived from the
//! path, never from the front matter, and survives every query stage.

use crate::core::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Field names that resolve to [`FileMeta`] when projected
pub const RESERVED_FIELDS: [&str; 3] = ["title", "name", "path"];

/// Identity of the source document
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct FileMeta {
    /// The identity the document was parsed with, usually its path
    pub path: String,
    /// Last path segment
    pub name: String,
    /// `name` without a trailing `.md`
    pub title: String,
}

impl FileMeta {
    /// Derive file metadata from a path-like identity
    pub fn from_identity(identity: &str) -> Self {
        let name = identity
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(identity)
            .to_string();
        let title = name.strip_suffix(".md").unwrap_or(&name).to_string();
        Self {
            path: identity.to_string(),
            name,
            title,
        }
    }

    /// Look up one of the reserved names; empty entries count as missing
    pub fn get(&self, field: &str) -> Option<&str> {
        let index = RESERVED_FIELDS.iter().position(|name| *name == field)?;
        let value = [&self.title, &self.name, &self.path][index];
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// One document's front matter fields plus its file identity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: BTreeMap<String, Value>,
    file: FileMeta,
}

impl Record {
    /// Create a record with no fields
    pub fn new(file: FileMeta) -> Self {
        Self {
            fields: BTreeMap::new(),
            file,
        }
    }

    /// Create a record from a set of fields
    pub fn with_fields(file: FileMeta, fields: BTreeMap<String, Value>) -> Self {
        Self { fields, file }
    }

    /// Builder-style insert, handy for constructing records by hand
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value, if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field value, treating absent fields as null
    pub fn value(&self, name: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(name).unwrap_or(&NULL)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn file(&self) -> &FileMeta {
        &self.file
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record holding exactly `names`
    ///
    /// `title`, `name` and `path` come from [`FileMeta`] first and only fall
    /// back to a front matter field of the same name when the file metadata
    /// has nothing for them. Fields the record lacks project as null. The
    /// file metadata is always carried over.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Record {
        let mut fields = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let value = match self.file.get(name) {
                Some(meta) => Value::string(meta),
                None => self.value(name).clone(),
            };
            fields.insert(name.to_string(), value);
        }
        Record::with_fields(self.file.clone(), fields)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("file", &self.file)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_meta_derivation() {
        let meta = FileMeta::from_identity("notes/books/Dune.md");
        assert_eq!(meta.path, "notes/books/Dune.md");
        assert_eq!(meta.name, "Dune.md");
        assert_eq!(meta.title, "Dune");

        let meta = FileMeta::from_identity("todo.txt");
        assert_eq!(meta.name, "todo.txt");
        assert_eq!(meta.title, "todo.txt");

        let meta = FileMeta::from_identity(r"C:\vault\Plan.md");
        assert_eq!(meta.name, "Plan.md");
        assert_eq!(meta.title, "Plan");
    }

    #[test]
    fn test_file_meta_get_reserved_names() {
        let meta = FileMeta::from_identity("notes/Dune.md");
        let resolved: Vec<_> = RESERVED_FIELDS.iter().map(|f| meta.get(f)).collect();
        assert_eq!(
            resolved,
            vec![Some("Dune"), Some("Dune.md"), Some("notes/Dune.md")]
        );
        assert_eq!(meta.get("rating"), None);
        assert_eq!(FileMeta::default().get("title"), None);
    }

    #[test]
    fn test_absent_field_is_null() {
        let record = Record::new(FileMeta::from_identity("a.md")).field("x", 1i64);
        assert_eq!(record.value("x"), &Value::from(1.0));
        assert!(record.value("missing").is_null());
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn test_project_prefers_file_meta() {
        let record = Record::new(FileMeta::from_identity("notes/Foo Bar.md"))
            .field("title", "Foo")
            .field("rating", 4i64)
            .field("tags", Value::list(vec![Value::from("x")]));

        let projected = record.project(&["title", "rating", "status"]);
        assert_eq!(projected.len(), 3);
        assert_eq!(projected.value("title"), &Value::from("Foo Bar"));
        assert_eq!(projected.value("rating"), &Value::from(4.0));
        assert!(projected.value("status").is_null());
        assert!(projected.get("tags").is_none());
        assert_eq!(projected.file(), record.file());
    }

    #[test]
    fn test_project_falls_back_when_meta_missing() {
        let record = Record::new(FileMeta::default()).field("title", "Foo");
        let projected = record.project(&["title"]);
        assert_eq!(projected.value("title"), &Value::from("Foo"));
    }

    #[test]
    fn test_serialize_includes_file() {
        let record = Record::new(FileMeta::from_identity("a/b.md")).field("n", 2i64);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["n"], serde_json::json!(2));
        assert_eq!(json["file"]["title"], serde_json::json!("b"));
        assert_eq!(json["file"]["path"], serde_json::json!("a/b.md"));
    }
}
