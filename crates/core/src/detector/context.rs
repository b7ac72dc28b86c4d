use super::settings::{EffectiveConfig, PatternList};
use crate::error::DoctorResult;
use crate::model::ModelMapping;
use crate::schema::Introspector;

/// What a detector may see during one run: the schema, the model mappings
/// supplied by the caller, and its resolved settings.
pub struct AnalysisContext<'a> {
    pub schema: &'a dyn Introspector,
    pub models: &'a [ModelMapping],
    pub config: &'a EffectiveConfig,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        schema: &'a dyn Introspector,
        models: &'a [ModelMapping],
        config: &'a EffectiveConfig,
    ) -> Self {
        Self {
            schema,
            models,
            config,
        }
    }

    /// Glob patterns from an `ignore_*` setting. Empty when the detector does
    /// not declare the setting.
    pub fn ignore(&self, key: &str) -> DoctorResult<PatternList> {
        if self.config.declares(key) {
            self.config.patterns(key)
        } else {
            Ok(PatternList::default())
        }
    }

    /// Tables in name order, minus those matched by `ignore_tables`
    pub fn tables(&self) -> DoctorResult<Vec<&'a str>> {
        let ignored = self.ignore("ignore_tables")?;
        Ok(self
            .schema
            .tables()
            .into_iter()
            .filter(|t| !ignored.matches(t))
            .collect())
    }

    /// Models minus those matched by `ignore_models`
    pub fn models(&self) -> DoctorResult<Vec<&'a ModelMapping>> {
        let ignored = self.ignore("ignore_models")?;
        Ok(self
            .models
            .iter()
            .filter(|m| !ignored.matches(&m.name))
            .collect())
    }
}
