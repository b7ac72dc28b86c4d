use thiserror::Error;

/// Result type for schema-doctor operations.
pub type DoctorResult<T> = Result<T, DoctorError>;

/// Framework-level errors. Detected schema problems are never errors; they are
/// emitted as [`crate::problem::Problem`] records.
#[derive(Debug, Error)]
pub enum DoctorError {
    /// A detector declares a setting without a default value.
    #[error("detector `{detector}` must provide a default value for `{key}`")]
    MissingDefault { detector: String, key: String },

    /// Two detectors were registered under the same name.
    #[error("detector `{0}` is already registered")]
    DuplicateDetector(String),

    #[error("unknown detector `{0}`")]
    UnknownDetector(String),

    /// The configuration names a setting the detector does not recognize.
    #[error("detector `{detector}` does not recognize setting `{key}`")]
    UnrecognizedSetting { detector: String, key: String },

    /// A global setting that no registered detector recognizes.
    #[error("no detector recognizes global setting `{0}`")]
    UnrecognizedGlobalSetting(String),

    /// A detector asked for a setting it never declared.
    #[error("setting `{key}` is not declared by detector `{detector}`")]
    UnknownSetting { detector: String, key: String },

    #[error("setting `{key}` of detector `{detector}` must be {expected}, got {found}")]
    SettingType {
        detector: String,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// One detector of a suite failed; the others still report.
    #[error("detector `{detector}` failed: {source}")]
    Detector {
        detector: String,
        #[source]
        source: Box<DoctorError>,
    },

    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid schema snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
