use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Value of one problem attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Attr {
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Text(text) => f.write_str(text),
            Attr::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Attr {
    fn from(value: &str) -> Self {
        Attr::Text(value.to_string())
    }
}

impl From<String> for Attr {
    fn from(value: String) -> Self {
        Attr::Text(value)
    }
}

impl From<&String> for Attr {
    fn from(value: &String) -> Self {
        Attr::Text(value.clone())
    }
}

impl From<Vec<String>> for Attr {
    fn from(value: Vec<String>) -> Self {
        Attr::List(value)
    }
}

/// One finding: named attributes kept in insertion order.
///
/// Built once by a detector and never mutated after it is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problem {
    attributes: Vec<(String, Attr)>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute. A repeated key replaces the earlier value in place.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Attr>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Attr> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Text attribute, or `""` when absent or not text.
    pub fn text(&self, key: &str) -> &str {
        match self.get(key) {
            Some(Attr::Text(text)) => text,
            _ => "",
        }
    }

    /// List attribute, or an empty slice when absent or not a list.
    pub fn list(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(Attr::List(items)) => items,
            _ => &[],
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attr)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Serialize for Problem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Problems emitted during a single detector run, in emission order.
#[derive(Debug, Default)]
pub struct Problems {
    items: Vec<Problem>,
}

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, problem: Problem) {
        self.items.push(problem);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Problem] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Problem> {
        self.items
    }
}
