use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::DoctorResult;

/// Detects tables without a primary key. Composite keys count as keys.
pub struct TableWithoutPrimaryKey;

impl Detector for TableWithoutPrimaryKey {
    fn name(&self) -> &str {
        "table_without_primary_key"
    }

    fn description(&self) -> &str {
        "Detects tables without a primary key"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_tables()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        for table in ctx.tables()? {
            if ctx.schema.primary_key_columns(table).is_empty() {
                problems.emit(Problem::new().with("table", table));
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        format!("add a primary key to {}", problem.text("table"))
    }
}
