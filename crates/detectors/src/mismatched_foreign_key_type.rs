use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::DoctorResult;

/// Detects foreign key columns whose type differs from the column they reference.
pub struct MismatchedForeignKeyType;

impl Detector for MismatchedForeignKeyType {
    fn name(&self) -> &str {
        "mismatched_foreign_key_type"
    }

    fn description(&self) -> &str {
        "Detects foreign keys whose type differs from the referenced column"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_tables(), Setting::ignore_columns()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        let ignored_columns = ctx.ignore("ignore_columns")?;

        for table in ctx.tables()? {
            for fk in ctx.schema.foreign_keys(table) {
                for (column_name, referenced_name) in fk.columns.iter().zip(&fk.referenced_columns) {
                    if ignored_columns.matches_column(table, column_name) {
                        continue;
                    }
                    let Some(column) = ctx.schema.column(table, column_name) else {
                        continue;
                    };
                    let Some(referenced) = ctx.schema.column(&fk.referenced_table, referenced_name)
                    else {
                        continue;
                    };
                    if column.sql_type != referenced.sql_type {
                        problems.emit(
                            Problem::new()
                                .with("table", table)
                                .with("column", &column.name)
                                .with("type", &column.sql_type)
                                .with("referenced_table", &fk.referenced_table)
                                .with("referenced_column", &referenced.name)
                                .with("referenced_type", &referenced.sql_type),
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        format!(
            "{}.{} is a foreign key of type {} and references {}.{} of type {} - foreign keys should be of the same type as the referenced column",
            problem.text("table"),
            problem.text("column"),
            problem.text("type"),
            problem.text("referenced_table"),
            problem.text("referenced_column"),
            problem.text("referenced_type")
        )
    }
}
