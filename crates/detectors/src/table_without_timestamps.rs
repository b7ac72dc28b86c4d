use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::DoctorResult;

/// Detects tables missing `created_at`/`updated_at` (or the `_on` variants).
pub struct TableWithoutTimestamps;

const TIMESTAMPS: [(&str, &str); 2] = [("created_at", "created_on"), ("updated_at", "updated_on")];

impl Detector for TableWithoutTimestamps {
    fn name(&self) -> &str {
        "table_without_timestamps"
    }

    fn description(&self) -> &str {
        "Detects tables without created_at/updated_at columns"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_tables()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        for table in ctx.tables()? {
            for (column, alternative) in TIMESTAMPS {
                let present = ctx.schema.column(table, column).is_some()
                    || ctx.schema.column(table, alternative).is_some();
                if !present {
                    problems.emit(Problem::new().with("table", table).with("column", column));
                }
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        format!(
            "add a {} timestamp column to {}",
            problem.text("column"),
            problem.text("table")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use schema_doctor::schema::{Column, SchemaSnapshot, Table};

    #[test]
    fn test_detects_missing_timestamps() {
        let schema = SchemaSnapshot::new("postgresql")
            .table(Table::new("events").with_id())
            .table(
                Table::new("users")
                    .with_id()
                    .column(Column::new("created_at", "timestamp(6) without time zone").not_null()),
            );
        assert_problems(
            &TableWithoutTimestamps,
            &schema,
            &[
                "add a created_at timestamp column to events",
                "add a updated_at timestamp column to events",
                "add a updated_at timestamp column to users",
            ],
        );
    }

    #[test]
    fn test_accepts_on_variants() {
        let schema = SchemaSnapshot::new("postgresql").table(
            Table::new("reports")
                .with_id()
                .column(Column::new("created_on", "date"))
                .column(Column::new("updated_at", "timestamp without time zone")),
        );
        refute_problems(&TableWithoutTimestamps, &schema);
    }
}
