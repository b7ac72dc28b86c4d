use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::schema::Index;
use schema_doctor::DoctorResult;

use crate::{looks_like_foreign_key, polymorphic_type_column};

/// Detects foreign-key columns that no index can serve lookups for.
///
/// A column counts as a foreign key when a constraint says so or when it is
/// named `*_id`. It is covered by any index that starts with it; polymorphic
/// pairs are also covered by an index starting with `(*_type, *_id)`.
pub struct UnindexedForeignKeys;

fn leads_with(index: &Index, columns: &[&str]) -> bool {
    index.columns.len() >= columns.len()
        && index.columns.iter().zip(columns).all(|(a, b)| a == b)
}

impl Detector for UnindexedForeignKeys {
    fn name(&self) -> &str {
        "unindexed_foreign_keys"
    }

    fn description(&self) -> &str {
        "Detects foreign keys that are not covered by an index"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_tables(), Setting::ignore_columns()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        let ignored_columns = ctx.ignore("ignore_columns")?;

        for table in ctx.tables()? {
            let columns = ctx.schema.columns(table);
            let indexes = ctx.schema.indexes(table);
            let constrained: Vec<&str> = ctx
                .schema
                .foreign_keys(table)
                .iter()
                .filter_map(|fk| fk.columns.first().map(String::as_str))
                .collect();

            for column in columns {
                let name = column.name.as_str();
                if !looks_like_foreign_key(name) && !constrained.contains(&name) {
                    continue;
                }
                if ignored_columns.matches_column(table, name) {
                    continue;
                }

                let mut covered = indexes.iter().any(|index| leads_with(index, &[name]));
                if !covered {
                    if let Some(type_column) = polymorphic_type_column(columns, name) {
                        covered = indexes
                            .iter()
                            .any(|index| leads_with(index, &[type_column.as_str(), name]));
                    }
                }

                if !covered {
                    problems.emit(Problem::new().with("table", table).with("column", name));
                }
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        format!(
            "add an index on {}.{} - foreign keys are often used in database lookups and should be indexed for performance reasons",
            problem.text("table"),
            problem.text("column")
        )
    }
}
