use serde::Serialize;

use crate::problem::Problem;
use crate::schema::SchemaSnapshot;

#[derive(Debug, Clone, Serialize)]
pub struct ReportedProblem {
    pub message: String,
    pub attributes: Problem,
}

/// Outcome of one detector run.
#[derive(Debug, Clone, Serialize)]
pub struct DetectorReport {
    pub detector: String,
    pub success: bool,
    pub problems: Vec<ReportedProblem>,
}

/// Aggregate of several detector runs against one schema snapshot.
#[derive(Debug, Serialize)]
pub struct SuiteReport {
    pub backend: String,
    pub schema_fingerprint: String,
    pub tables_analyzed: usize,
    pub detectors_run: usize,
    pub total_problems: usize,
    pub success: bool,
    pub reports: Vec<DetectorReport>,
}

impl SuiteReport {
    pub fn from_reports(schema: &SchemaSnapshot, reports: Vec<DetectorReport>) -> Self {
        let total = reports.iter().map(|r| r.problems.len()).sum();
        Self {
            backend: schema.backend.clone(),
            schema_fingerprint: schema.fingerprint(),
            tables_analyzed: schema.tables.len(),
            detectors_run: reports.len(),
            total_problems: total,
            success: reports.iter().all(|r| r.success),
            reports,
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &DetectorReport> {
        self.reports.iter().filter(|r| !r.success)
    }
}
