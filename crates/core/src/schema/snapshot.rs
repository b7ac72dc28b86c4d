use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::introspector::{Introspector, ViewListing};
use super::types::{Column, ForeignKey, Index, Table};
use crate::error::DoctorResult;

/// Immutable picture of a database schema, fetched once and shared by every
/// detector of a run.
///
/// `views` is `None` when the backend that produced the snapshot cannot
/// enumerate views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub backend: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub views: Option<Vec<String>>,
}

impl SchemaSnapshot {
    /// Empty snapshot for a backend with view introspection.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            tables: Vec::new(),
            views: Some(Vec::new()),
        }
    }

    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn view(mut self, name: impl Into<String>) -> Self {
        self.views.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    pub fn without_view_introspection(mut self) -> Self {
        self.views = None;
        self
    }

    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Read a snapshot previously written by [`SchemaSnapshot::save`].
    pub fn load(path: &Path) -> DoctorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> DoctorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> DoctorResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Hex SHA-256 of the canonical JSON form. Equal schemas give equal fingerprints.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        // Serializing plain data into a Vec cannot fail.
        hasher.update(serde_json::to_vec(self).unwrap_or_default());
        format!("{:x}", hasher.finalize())
    }
}

impl Introspector for SchemaSnapshot {
    fn backend(&self) -> &str {
        &self.backend
    }

    fn tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn views(&self) -> ViewListing<'_> {
        match &self.views {
            Some(views) => ViewListing::Supported(views),
            None => ViewListing::Unsupported,
        }
    }

    fn table_exists(&self, table: &str) -> bool {
        self.find_table(table).is_some()
    }

    fn indexes(&self, table: &str) -> &[Index] {
        self.find_table(table).map_or(&[], |t| &t.indexes)
    }

    fn columns(&self, table: &str) -> &[Column] {
        self.find_table(table).map_or(&[], |t| &t.columns)
    }

    fn foreign_keys(&self, table: &str) -> &[ForeignKey] {
        self.find_table(table).map_or(&[], |t| &t.foreign_keys)
    }

    fn primary_key_columns(&self, table: &str) -> &[String] {
        self.find_table(table).map_or(&[], |t| &t.primary_key)
    }
}
