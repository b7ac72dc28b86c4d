use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::DoctorResult;

/// Detects models mapped to tables that do not exist.
///
/// A model may be backed by a view, so this needs view introspection. When
/// the backend cannot list views, models whose table is missing are skipped
/// rather than reported.
pub struct UndefinedTableReferences;

impl Detector for UndefinedTableReferences {
    fn name(&self) -> &str {
        "undefined_table_references"
    }

    fn description(&self) -> &str {
        "Detects models referencing undefined tables or views"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_models()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        let views = ctx.schema.views();
        if !views.is_supported() {
            tracing::warn!(
                backend = ctx.schema.backend(),
                "view introspection unsupported; models without a table will not be reported"
            );
        }

        for model in ctx.models()? {
            if ctx.schema.table_exists(&model.table_name) {
                continue;
            }
            match views.contains(&model.table_name) {
                Some(true) | None => continue,
                Some(false) => problems.emit(
                    Problem::new()
                        .with("model", &model.name)
                        .with("table", &model.table_name),
                ),
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        format!(
            "{} references a non-existent table or view named {}",
            problem.text("model"),
            problem.text("table")
        )
    }
}
