use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::DoctorResult;

/// Detects primary keys stored in 32-bit or smaller integers, which can run
/// out of values on busy tables.
pub struct ShortPrimaryKeyType;

const SHORT_TYPES: &[&str] = &[
    "integer",
    "int",
    "int4",
    "int2",
    "smallint",
    "mediumint",
    "tinyint",
    "serial",
    "serial4",
    "smallserial",
];

fn is_short_integer(sql_type: &str) -> bool {
    let base = sql_type
        .split('(')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    SHORT_TYPES.contains(&base.as_str())
}

impl Detector for ShortPrimaryKeyType {
    fn name(&self) -> &str {
        "short_primary_key_type"
    }

    fn description(&self) -> &str {
        "Detects primary keys using integer types shorter than 64 bits"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_tables()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        for table in ctx.tables()? {
            let Some(column) = ctx.schema.primary_key(table) else {
                continue;
            };
            if is_short_integer(&column.sql_type) {
                problems.emit(
                    Problem::new()
                        .with("table", table)
                        .with("column", &column.name)
                        .with("type", &column.sql_type),
                );
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        format!(
            "change the type of {}.{} from {} to bigint",
            problem.text("table"),
            problem.text("column"),
            problem.text("type")
        )
    }
}
