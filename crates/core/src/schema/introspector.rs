use super::types::{Column, ForeignKey, Index};

/// Result of listing views. Backends without view introspection report
/// `Unsupported`, which callers must not treat as "no views".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewListing<'a> {
    Supported(&'a [String]),
    Unsupported,
}

impl<'a> ViewListing<'a> {
    /// `None` when views cannot be enumerated on this backend.
    pub fn contains(&self, name: &str) -> Option<bool> {
        match self {
            ViewListing::Supported(views) => Some(views.iter().any(|v| v == name)),
            ViewListing::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ViewListing::Supported(_))
    }
}

/// Read-only query surface over database structure. This is the only channel
/// through which detectors observe the database.
///
/// Lookups for tables that do not exist return empty results; use
/// [`Introspector::table_exists`] to test for absence.
pub trait Introspector: Sync {
    /// Backend identifier, e.g. `postgresql`.
    fn backend(&self) -> &str;

    /// Table names in name order.
    fn tables(&self) -> Vec<&str>;

    fn views(&self) -> ViewListing<'_>;

    fn supports_view_introspection(&self) -> bool {
        self.views().is_supported()
    }

    fn table_exists(&self, table: &str) -> bool;

    fn indexes(&self, table: &str) -> &[Index];

    fn columns(&self, table: &str) -> &[Column];

    fn foreign_keys(&self, table: &str) -> &[ForeignKey];

    fn primary_key_columns(&self, table: &str) -> &[String];

    fn column(&self, table: &str, column: &str) -> Option<&Column> {
        self.columns(table).iter().find(|c| c.name == column)
    }

    /// The single primary key column of `table`. Absent for tables without a
    /// primary key and for composite keys.
    fn primary_key(&self, table: &str) -> Option<&Column> {
        match self.primary_key_columns(table) {
            [name] => self.column(table, name),
            _ => None,
        }
    }
}
