use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::traits::Detector;
use crate::error::{DoctorError, DoctorResult};

/// Value of a detector setting, as declared or as read from config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl SettingValue {
    pub fn kind(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "a boolean",
            SettingValue::Integer(_) => "an integer",
            SettingValue::Text(_) => "a string",
            SettingValue::List(_) => "a list of strings",
        }
    }

    /// Shorthand for list defaults: `SettingValue::list(["deleted_at"])`.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SettingValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Integer(i) => write!(f, "{i}"),
            SettingValue::Text(s) => write!(f, "{s:?}"),
            SettingValue::List(items) => write!(f, "{items:?}"),
        }
    }
}

/// A setting a detector recognizes.
#[derive(Debug, Clone)]
pub struct Setting {
    pub key: &'static str,
    pub description: &'static str,
    pub default: Option<SettingValue>,
}

impl Setting {
    /// Declare a setting. It must be given a default with
    /// [`Setting::default_value`] or registration will fail.
    pub fn new(key: &'static str, description: &'static str) -> Self {
        Self {
            key,
            description,
            default: None,
        }
    }

    pub fn default_value(mut self, value: SettingValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Glob list of table names to skip, empty by default.
    pub fn ignore_tables() -> Self {
        Self::new("ignore_tables", "tables whose problems should not be reported")
            .default_value(SettingValue::List(Vec::new()))
    }

    /// Glob list of `table.column` names to skip, empty by default.
    pub fn ignore_columns() -> Self {
        Self::new("ignore_columns", "columns (as table.column) whose problems should not be reported")
            .default_value(SettingValue::List(Vec::new()))
    }

    pub fn ignore_indexes() -> Self {
        Self::new("ignore_indexes", "indexes whose problems should not be reported")
            .default_value(SettingValue::List(Vec::new()))
    }

    pub fn ignore_models() -> Self {
        Self::new("ignore_models", "models whose problems should not be reported")
            .default_value(SettingValue::List(Vec::new()))
    }
}

/// Keys a detector understands.
pub fn recognized_settings(detector: &dyn Detector) -> BTreeSet<&'static str> {
    detector.settings().iter().map(|s| s.key).collect()
}

/// Check that every declared setting has a default. Run at registration.
pub fn validate_definition(detector: &dyn Detector) -> DoctorResult<()> {
    for setting in detector.settings() {
        if setting.default.is_none() {
            return Err(DoctorError::MissingDefault {
                detector: detector.name().to_string(),
                key: setting.key.to_string(),
            });
        }
    }
    Ok(())
}

/// Explicit setting values layered over detector defaults. Later layers win.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    layers: Vec<BTreeMap<String, SettingValue>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, values: BTreeMap<String, SettingValue>) -> Self {
        self.layers.push(values);
        self
    }

    /// Single-value override on top of the existing layers.
    pub fn set(mut self, key: impl Into<String>, value: SettingValue) -> Self {
        let mut layer = BTreeMap::new();
        layer.insert(key.into(), value);
        self.layers.push(layer);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.layers.iter().rev().find_map(|layer| layer.get(key))
    }
}

/// Settings resolved for one detector run. Immutable once built.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    detector: String,
    values: BTreeMap<&'static str, SettingValue>,
}

impl EffectiveConfig {
    /// Resolve every setting the detector declares: override if present,
    /// otherwise the declared default. Overrides for keys the detector does
    /// not declare are ignored here; `Config::validate` reports them.
    pub fn resolve(detector: &dyn Detector, overrides: &Overrides) -> DoctorResult<Self> {
        let name = detector.name().to_string();
        let mut values = BTreeMap::new();

        for setting in detector.settings() {
            let default = setting.default.ok_or_else(|| DoctorError::MissingDefault {
                detector: name.clone(),
                key: setting.key.to_string(),
            })?;

            let value = match overrides.get(setting.key) {
                Some(explicit) => {
                    if std::mem::discriminant(explicit) != std::mem::discriminant(&default) {
                        return Err(DoctorError::SettingType {
                            detector: name,
                            key: setting.key.to_string(),
                            expected: default.kind(),
                            found: explicit.kind(),
                        });
                    }
                    explicit.clone()
                }
                None => default,
            };
            values.insert(setting.key, value);
        }

        Ok(Self {
            detector: name,
            values,
        })
    }

    pub fn detector(&self) -> &str {
        &self.detector
    }

    pub fn declares(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn get(&self, key: &str) -> DoctorResult<&SettingValue> {
        self.values
            .get(key)
            .ok_or_else(|| DoctorError::UnknownSetting {
                detector: self.detector.clone(),
                key: key.to_string(),
            })
    }

    pub fn flag(&self, key: &str) -> DoctorResult<bool> {
        match self.get(key)? {
            SettingValue::Bool(b) => Ok(*b),
            other => Err(self.type_error(key, "a boolean", other)),
        }
    }

    pub fn integer(&self, key: &str) -> DoctorResult<i64> {
        match self.get(key)? {
            SettingValue::Integer(i) => Ok(*i),
            other => Err(self.type_error(key, "an integer", other)),
        }
    }

    pub fn text(&self, key: &str) -> DoctorResult<&str> {
        match self.get(key)? {
            SettingValue::Text(s) => Ok(s),
            other => Err(self.type_error(key, "a string", other)),
        }
    }

    pub fn list(&self, key: &str) -> DoctorResult<&[String]> {
        match self.get(key)? {
            SettingValue::List(items) => Ok(items),
            other => Err(self.type_error(key, "a list of strings", other)),
        }
    }

    /// Compile a list setting into glob patterns.
    pub fn patterns(&self, key: &str) -> DoctorResult<PatternList> {
        PatternList::compile(self.list(key)?)
    }

    fn type_error(&self, key: &str, expected: &'static str, found: &SettingValue) -> DoctorError {
        DoctorError::SettingType {
            detector: self.detector.clone(),
            key: key.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

/// Glob patterns used by the `ignore_*` settings.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<glob::Pattern>,
}

impl PatternList {
    pub fn compile(sources: &[String]) -> DoctorResult<Self> {
        let patterns = sources
            .iter()
            .map(|source| {
                glob::Pattern::new(source).map_err(|err| DoctorError::InvalidPattern {
                    pattern: source.clone(),
                    message: err.to_string(),
                })
            })
            .collect::<DoctorResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// Columns are matched as `table.column`.
    pub fn matches_column(&self, table: &str, column: &str) -> bool {
        !self.patterns.is_empty() && self.matches(&format!("{table}.{column}"))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
