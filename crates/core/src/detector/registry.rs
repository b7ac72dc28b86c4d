use rayon::prelude::*;

use super::run::Invocation;
use super::settings::validate_definition;
use super::traits::Detector;
use crate::config::Config;
use crate::error::{DoctorError, DoctorResult};
use crate::model::ModelMapping;
use crate::report::DetectorReport;
use crate::schema::Introspector;

/// Registry that holds all detectors and runs them against a schema.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Register a detector. Rejects duplicate names and settings without a
    /// default, so definition errors surface before anything runs.
    pub fn register(&mut self, detector: Box<dyn Detector>) -> DoctorResult<()> {
        validate_definition(detector.as_ref())?;
        if self.get(detector.name()).is_some() {
            return Err(DoctorError::DuplicateDetector(detector.name().to_string()));
        }
        self.detectors.push(detector);
        Ok(())
    }

    /// Register multiple detectors at once
    pub fn register_all(&mut self, detectors: Vec<Box<dyn Detector>>) -> DoctorResult<()> {
        for detector in detectors {
            self.register(detector)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }

    pub fn detectors(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    /// List all registered detector names
    pub fn list_detectors(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every enabled detector. Outcomes come back in registration order;
    /// a detector that errors does not discard the others' reports.
    pub fn run_all(
        &self,
        schema: &dyn Introspector,
        models: &[ModelMapping],
        config: &Config,
    ) -> Vec<DoctorResult<DetectorReport>> {
        let selected: Vec<&dyn Detector> = self.detectors().collect();
        self.run_detectors(&selected, schema, models, config)
    }

    /// Run only detectors matching the given names, in registration order.
    pub fn run_selected(
        &self,
        names: &[&str],
        schema: &dyn Introspector,
        models: &[ModelMapping],
        config: &Config,
    ) -> DoctorResult<Vec<DoctorResult<DetectorReport>>> {
        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(DoctorError::UnknownDetector(unknown.to_string()));
        }
        let selected: Vec<&dyn Detector> = self
            .detectors()
            .filter(|d| names.contains(&d.name()))
            .collect();
        Ok(self.run_detectors(&selected, schema, models, config))
    }

    /// Each run gets its own configuration, problem list and buffer; the
    /// schema is shared read-only.
    fn run_detectors(
        &self,
        selected: &[&dyn Detector],
        schema: &dyn Introspector,
        models: &[ModelMapping],
        config: &Config,
    ) -> Vec<DoctorResult<DetectorReport>> {
        let enabled: Vec<&dyn Detector> = selected
            .iter()
            .copied()
            .filter(|d| {
                let enabled = config.is_detector_enabled(d.name());
                if !enabled {
                    tracing::info!(detector = d.name(), "detector disabled by config");
                }
                enabled
            })
            .collect();

        let outcomes: Vec<DoctorResult<DetectorReport>> = enabled
            .par_iter()
            .map(|detector| {
                let overrides = config.overrides_for(detector.name());
                let mut buffer: Vec<String> = Vec::new();
                Invocation::start(*detector, &overrides)
                    .and_then(|invocation| invocation.analyze(schema, models))
                    .and_then(|analyzed| analyzed.report(&mut buffer))
                    .map_err(|err| {
                        tracing::error!(detector = detector.name(), error = %err, "detector failed");
                        DoctorError::Detector {
                            detector: detector.name().to_string(),
                            source: Box::new(err),
                        }
                    })
            })
            .collect();

        tracing::info!(
            detectors = outcomes.len(),
            failed = outcomes
                .iter()
                .filter(|o| !matches!(o, Ok(report) if report.success))
                .count(),
            "detector suite finished"
        );
        outcomes
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
