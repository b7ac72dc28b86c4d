pub mod extraneous_indexes;
pub mod mismatched_foreign_key_type;
pub mod missing_foreign_keys;
pub mod short_primary_key_type;
pub mod table_without_primary_key;
pub mod table_without_timestamps;
pub mod undefined_table_references;
pub mod unindexed_deleted_at;
pub mod unindexed_foreign_keys;

#[cfg(test)]
mod testing;

use schema_doctor::detector::{Detector, DetectorRegistry};
use schema_doctor::DoctorResult;

/// Returns all built-in detectors
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(extraneous_indexes::ExtraneousIndexes),
        Box::new(mismatched_foreign_key_type::MismatchedForeignKeyType),
        Box::new(missing_foreign_keys::MissingForeignKeys),
        Box::new(short_primary_key_type::ShortPrimaryKeyType),
        Box::new(table_without_primary_key::TableWithoutPrimaryKey),
        Box::new(table_without_timestamps::TableWithoutTimestamps),
        Box::new(undefined_table_references::UndefinedTableReferences),
        Box::new(unindexed_deleted_at::UnindexedDeletedAt),
        Box::new(unindexed_foreign_keys::UnindexedForeignKeys),
    ]
}

/// Registry holding every built-in detector.
pub fn default_registry() -> DoctorResult<DetectorRegistry> {
    let mut registry = DetectorRegistry::new();
    registry.register_all(all_detectors())?;
    Ok(registry)
}

/// Columns named like `user_id` look like references to another table.
pub(crate) fn looks_like_foreign_key(column: &str) -> bool {
    column.len() > 3 && column.ends_with("_id")
}

/// `commentable_id` is polymorphic when `commentable_type` sits next to it.
pub(crate) fn polymorphic_type_column(
    columns: &[schema_doctor::schema::Column],
    column: &str,
) -> Option<String> {
    let prefix = column.strip_suffix("_id")?;
    let type_column = format!("{prefix}_type");
    columns
        .iter()
        .any(|c| c.name == type_column)
        .then_some(type_column)
}
