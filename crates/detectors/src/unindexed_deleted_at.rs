use schema_doctor::detector::{AnalysisContext, Detector, Setting, SettingValue};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::DoctorResult;

/// Detects full indexes on soft-deletable tables. Lookups on such tables
/// usually filter on the soft-delete column, so a partial index is smaller
/// and faster.
pub struct UnindexedDeletedAt;

impl Detector for UnindexedDeletedAt {
    fn name(&self) -> &str {
        "unindexed_deleted_at"
    }

    fn description(&self) -> &str {
        "Detects indexes on soft-deletable tables that are not partial on the soft-delete column"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![
            Setting::ignore_tables(),
            Setting::ignore_columns(),
            Setting::ignore_indexes(),
            Setting::new("column_names", "soft-delete column names")
                .default_value(SettingValue::list(["deleted_at", "discarded_at"])),
        ]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        let ignored_columns = ctx.ignore("ignore_columns")?;
        let ignored_indexes = ctx.ignore("ignore_indexes")?;
        let column_names = ctx.config.list("column_names")?;

        for table in ctx.tables()? {
            for column in ctx.schema.columns(table) {
                if !column_names.contains(&column.name)
                    || ignored_columns.matches_column(table, &column.name)
                {
                    continue;
                }
                for index in ctx.schema.indexes(table) {
                    let filters_column = index
                        .predicate
                        .as_deref()
                        .is_some_and(|predicate| predicate.contains(column.name.as_str()));
                    if filters_column || ignored_indexes.matches(&index.name) {
                        continue;
                    }
                    problems.emit(
                        Problem::new()
                            .with("table", table)
                            .with("index", &index.name)
                            .with("column_name", &column.name),
                    );
                }
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        let column = problem.text("column_name");
        format!(
            "consider adding `WHERE {column} IS NULL` or `WHERE {column} IS NOT NULL` to {} - a partial index can speed lookups of soft-deletable models",
            problem.text("index")
        )
    }
}
