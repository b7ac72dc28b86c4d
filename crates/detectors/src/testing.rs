//! Helpers for running one detector against an in-memory schema.

use schema_doctor::detector::{run, Detector, Overrides};
use schema_doctor::model::ModelMapping;
use schema_doctor::schema::SchemaSnapshot;

/// Run `detector` and return (success, output lines).
pub fn run_detector(
    detector: &dyn Detector,
    schema: &SchemaSnapshot,
    models: &[ModelMapping],
    overrides: &Overrides,
) -> (bool, Vec<String>) {
    let mut output: Vec<String> = Vec::new();
    let success = run(detector, overrides, schema, models, &mut output).unwrap();
    (success, output)
}

pub fn assert_problems(detector: &dyn Detector, schema: &SchemaSnapshot, expected: &[&str]) {
    assert_problems_with(detector, schema, &[], &Overrides::new(), expected);
}

pub fn assert_problems_with(
    detector: &dyn Detector,
    schema: &SchemaSnapshot,
    models: &[ModelMapping],
    overrides: &Overrides,
    expected: &[&str],
) {
    let (success, output) = run_detector(detector, schema, models, overrides);
    assert_eq!(output, expected);
    assert!(!success, "detector reported success despite problems");
}

pub fn refute_problems(detector: &dyn Detector, schema: &SchemaSnapshot) {
    refute_problems_with(detector, schema, &[], &Overrides::new());
}

pub fn refute_problems_with(
    detector: &dyn Detector,
    schema: &SchemaSnapshot,
    models: &[ModelMapping],
    overrides: &Overrides,
) {
    let (success, output) = run_detector(detector, schema, models, overrides);
    assert!(output.is_empty(), "unexpected problems: {output:?}");
    assert!(success);
}
