use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::detector::settings::{recognized_settings, Overrides, SettingValue};
use crate::detector::DetectorRegistry;
use crate::error::{DoctorError, DoctorResult};

/// Project-level configuration loaded from `.schema-doctor.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub database: DatabaseConfig,
    pub detectors: BTreeMap<String, DetectorConfig>,
}

/// `[global]`: output options plus settings applied to every detector that
/// recognizes them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub output_format: String,
    #[serde(flatten)]
    pub settings: BTreeMap<String, SettingValue>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_format: "text".to_string(),
            settings: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub schema: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: "public".to_string(),
        }
    }
}

/// `[detectors.<name>]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub settings: BTreeMap<String, SettingValue>,
}

impl Config {
    /// Load config from a TOML file path. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> DoctorResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> DoctorResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check if a detector is enabled according to config.
    pub fn is_detector_enabled(&self, name: &str) -> bool {
        self.detectors
            .get(name)
            .and_then(|d| d.enabled)
            .unwrap_or(true)
    }

    /// Explicit values for one detector: global settings, then the
    /// detector's own section on top.
    pub fn overrides_for(&self, name: &str) -> Overrides {
        let overrides = Overrides::new().layer(self.global.settings.clone());
        match self.detectors.get(name) {
            Some(section) => overrides.layer(section.settings.clone()),
            None => overrides,
        }
    }

    /// Reject detector sections and settings that nothing registered
    /// understands.
    pub fn validate(&self, registry: &DetectorRegistry) -> DoctorResult<()> {
        for (name, section) in &self.detectors {
            let detector = registry
                .get(name)
                .ok_or_else(|| DoctorError::UnknownDetector(name.clone()))?;
            let recognized = recognized_settings(detector);
            if let Some(key) = section
                .settings
                .keys()
                .find(|k| !recognized.contains(k.as_str()))
            {
                return Err(DoctorError::UnrecognizedSetting {
                    detector: name.clone(),
                    key: key.clone(),
                });
            }
        }

        for key in self.global.settings.keys() {
            let known = registry
                .detectors()
                .any(|d| recognized_settings(d).contains(key.as_str()));
            if !known {
                return Err(DoctorError::UnrecognizedGlobalSetting(key.clone()));
            }
        }

        Ok(())
    }

    /// Generate default config file content.
    pub fn default_toml() -> &'static str {
        r#"# schema-doctor configuration

[global]
# Output format: "text", "json"
output_format = "text"
# Settings here apply to every detector that recognizes them.
ignore_tables = ["schema_migrations", "ar_internal_metadata"]

[database]
# url = "postgres://localhost/app_development"
schema = "public"

# Per-detector overrides
# [detectors.extraneous_indexes]
# enabled = false

# [detectors.unindexed_deleted_at]
# column_names = ["deleted_at", "discarded_at", "archived_at"]
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::settings::{EffectiveConfig, Setting};
    use crate::detector::{AnalysisContext, Detector};
    use crate::problem::{Problem, Problems};

    struct IndexChecker;

    impl Detector for IndexChecker {
        fn name(&self) -> &str {
            "index_checker"
        }
        fn description(&self) -> &str {
            "test detector"
        }
        fn settings(&self) -> Vec<Setting> {
            vec![Setting::ignore_tables(), Setting::ignore_indexes()]
        }
        fn detect(&self, _ctx: &AnalysisContext<'_>, _problems: &mut Problems) -> DoctorResult<()> {
            Ok(())
        }
        fn message(&self, _problem: &Problem) -> String {
            String::new()
        }
    }

    fn registry() -> DetectorRegistry {
        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(IndexChecker)).unwrap();
        registry
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.global.output_format, "text");
        assert_eq!(config.database.schema, "public");
        assert!(config.is_detector_enabled("any_detector"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[global]
output_format = "json"
ignore_tables = ["schema_migrations"]

[database]
url = "postgres://localhost/app"

[detectors.index_checker]
enabled = false
ignore_indexes = ["index_legacy_*"]
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.global.output_format, "json");
        assert_eq!(
            config.global.settings.get("ignore_tables"),
            Some(&SettingValue::list(["schema_migrations"]))
        );
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(config.database.schema, "public");
        assert!(!config.is_detector_enabled("index_checker"));
        assert!(config.is_detector_enabled("other"));
        assert!(config.validate(&registry()).is_ok());
    }

    #[test]
    fn test_overrides_layering() {
        let toml = r#"
[global]
ignore_tables = ["schema_migrations"]

[detectors.index_checker]
ignore_tables = ["audits"]
"#;
        let config = Config::from_toml(toml).unwrap();
        let resolved = EffectiveConfig::resolve(&IndexChecker, &config.overrides_for("index_checker")).unwrap();
        assert_eq!(resolved.list("ignore_tables").unwrap(), ["audits"]);
        assert!(resolved.list("ignore_indexes").unwrap().is_empty());

        let other = config.overrides_for("something_else");
        assert_eq!(
            other.get("ignore_tables"),
            Some(&SettingValue::list(["schema_migrations"]))
        );
    }

    #[test]
    fn test_validate_rejects_unknown_detector() {
        let config = Config::from_toml("[detectors.bogus]\nenabled = false\n").unwrap();
        assert!(matches!(
            config.validate(&registry()),
            Err(DoctorError::UnknownDetector(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_validate_rejects_unrecognized_setting() {
        let config =
            Config::from_toml("[detectors.index_checker]\nignore_models = [\"User\"]\n").unwrap();
        assert!(matches!(
            config.validate(&registry()),
            Err(DoctorError::UnrecognizedSetting { key, .. }) if key == "ignore_models"
        ));
    }

    #[test]
    fn test_validate_rejects_unrecognized_global() {
        let config = Config::from_toml("[global]\ncolumn_names = [\"deleted_at\"]\n").unwrap();
        assert!(matches!(
            config.validate(&registry()),
            Err(DoctorError::UnrecognizedGlobalSetting(key)) if key == "column_names"
        ));
    }

    #[test]
    fn test_default_toml_parses() {
        let config = Config::from_toml(Config::default_toml()).unwrap();
        assert!(config.validate(&registry()).is_ok());
        assert_eq!(config.global.settings.len(), 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/.schema-doctor.toml")).unwrap();
        assert!(config.detectors.is_empty());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::from_toml("[global\n"),
            Err(DoctorError::ConfigParse(_))
        ));
    }
}
