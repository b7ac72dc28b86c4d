//! One detector run: Start → Analyze → Report → Finalize.
//!
//! Each step consumes the previous state, so a run can be reported once and
//! a second pass needs a fresh [`Invocation`].

use super::context::AnalysisContext;
use super::settings::{EffectiveConfig, Overrides};
use super::traits::Detector;
use crate::error::DoctorResult;
use crate::model::ModelMapping;
use crate::problem::{OutputSink, Problem, Problems};
use crate::report::{DetectorReport, ReportedProblem};
use crate::schema::Introspector;

/// A started run: configuration resolved, no problems yet.
pub struct Invocation<'d> {
    detector: &'d dyn Detector,
    config: EffectiveConfig,
    problems: Problems,
}

impl<'d> Invocation<'d> {
    pub fn start(detector: &'d dyn Detector, overrides: &Overrides) -> DoctorResult<Self> {
        let config = EffectiveConfig::resolve(detector, overrides)?;
        tracing::debug!(detector = detector.name(), "starting detector run");
        Ok(Self {
            detector,
            config,
            problems: Problems::new(),
        })
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// Run the detector's analysis to completion.
    pub fn analyze(
        mut self,
        schema: &dyn Introspector,
        models: &[ModelMapping],
    ) -> DoctorResult<Analyzed<'d>> {
        let ctx = AnalysisContext::new(schema, models, &self.config);
        self.detector.detect(&ctx, &mut self.problems)?;
        tracing::debug!(
            detector = self.detector.name(),
            problems = self.problems.len(),
            "analysis finished"
        );
        Ok(Analyzed {
            detector: self.detector,
            problems: self.problems.into_vec(),
        })
    }
}

/// A run whose analysis finished; its problems are waiting to be reported.
pub struct Analyzed<'d> {
    detector: &'d dyn Detector,
    problems: Vec<Problem>,
}

impl<'d> Analyzed<'d> {
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Write one message line per problem, in emission order, and finish
    /// the run. Success means nothing was emitted.
    pub fn report(self, sink: &mut dyn OutputSink) -> DoctorResult<DetectorReport> {
        let mut reported = Vec::with_capacity(self.problems.len());
        for problem in self.problems {
            let message = self.detector.message(&problem);
            sink.write_line(&message)?;
            reported.push(ReportedProblem {
                message,
                attributes: problem,
            });
        }

        Ok(DetectorReport {
            detector: self.detector.name().to_string(),
            success: reported.is_empty(),
            problems: reported,
        })
    }
}

/// Start, analyze and report in one call. Returns `true` when the schema
/// passed the check.
pub fn run(
    detector: &dyn Detector,
    overrides: &Overrides,
    schema: &dyn Introspector,
    models: &[ModelMapping],
    sink: &mut dyn OutputSink,
) -> DoctorResult<bool> {
    let report = Invocation::start(detector, overrides)?
        .analyze(schema, models)?
        .report(sink)?;
    Ok(report.success)
}
