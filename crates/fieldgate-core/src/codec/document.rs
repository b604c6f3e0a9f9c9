use crate::types::ObjectId;
use serde::{Deserialize, Serialize};

///
/// Document
///
/// The store's native record: ordered string keys mapping to values.
/// Keys are unique; inserting an existing key replaces its value in place.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    entries: Vec<(String, DocValue)>,
}

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: DocValue) -> Option<DocValue> {
        let key = key.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<DocValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;

        Some(self.entries.remove(index).1)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, DocValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, DocValue)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }

        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, DocValue);
    type IntoIter = std::vec::IntoIter<(String, DocValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

///
/// DocValue
///

#[remain::sorted]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum DocValue {
    Array(Vec<Self>),
    Binary(#[serde(with = "serde_bytes")] Vec<u8>),
    Bool(bool),
    Document(Document),
    Double(f64),
    Int64(i64),
    Null,
    ObjectId(ObjectId),
    String(String),
}

impl DocValue {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Binary(_) => "binary",
            Self::Bool(_) => "bool",
            Self::Document(_) => "document",
            Self::Double(_) => "double",
            Self::Int64(_) => "int64",
            Self::Null => "null",
            Self::ObjectId(_) => "object id",
            Self::String(_) => "string",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for DocValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<ObjectId> for DocValue {
    fn from(id: ObjectId) -> Self {
        Self::ObjectId(id)
    }
}

impl From<Document> for DocValue {
    fn from(doc: Document) -> Self {
        Self::Document(doc)
    }
}
