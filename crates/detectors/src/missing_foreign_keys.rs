use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::DoctorResult;

use crate::{looks_like_foreign_key, polymorphic_type_column};

/// Detects `*_id` columns that have no foreign key constraint.
/// Polymorphic columns (with a sibling `*_type`) cannot be constrained and are skipped.
pub struct MissingForeignKeys;

impl Detector for MissingForeignKeys {
    fn name(&self) -> &str {
        "missing_foreign_keys"
    }

    fn description(&self) -> &str {
        "Detects association columns without a foreign key constraint"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_tables(), Setting::ignore_columns()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        let ignored_columns = ctx.ignore("ignore_columns")?;

        for table in ctx.tables()? {
            let columns = ctx.schema.columns(table);
            let foreign_keys = ctx.schema.foreign_keys(table);

            for column in columns {
                let name = column.name.as_str();
                if !looks_like_foreign_key(name) || ignored_columns.matches_column(table, name) {
                    continue;
                }
                if polymorphic_type_column(columns, name).is_some() {
                    continue;
                }
                let constrained = foreign_keys
                    .iter()
                    .any(|fk| fk.columns.iter().any(|c| c == name));
                if !constrained {
                    problems.emit(Problem::new().with("table", table).with("column", name));
                }
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        format!(
            "create a foreign key on {}.{} - looks like an association without a foreign key constraint",
            problem.text("table"),
            problem.text("column")
        )
    }
}
