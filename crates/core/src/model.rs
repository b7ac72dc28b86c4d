use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DoctorResult;

/// One ORM model and the table it is mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMapping {
    pub name: String,
    pub table_name: String,
}

impl ModelMapping {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
        }
    }
}

/// Model definitions supplied by the caller, e.g. exported from the
/// application's ORM layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSet {
    #[serde(default)]
    pub models: Vec<ModelMapping>,
}

impl ModelSet {
    /// Load `[[models]]` entries from a TOML file.
    pub fn load(path: &Path) -> DoctorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> DoctorResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn as_slice(&self) -> &[ModelMapping] {
        &self.models
    }
}

impl From<Vec<ModelMapping>> for ModelSet {
    fn from(models: Vec<ModelMapping>) -> Self {
        Self { models }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_models() {
        let models = ModelSet::from_toml(
            r#"
[[models]]
name = "User"
table_name = "users"

[[models]]
name = "Admin::AuditEntry"
table_name = "audit_entries"
"#,
        )
        .unwrap();
        assert_eq!(
            models.as_slice(),
            &[
                ModelMapping::new("User", "users"),
                ModelMapping::new("Admin::AuditEntry", "audit_entries"),
            ]
        );
    }

    #[test]
    fn test_empty_file_has_no_models() {
        assert!(ModelSet::from_toml("").unwrap().models.is_empty());
    }
}
