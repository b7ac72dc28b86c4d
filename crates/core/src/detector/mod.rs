pub mod context;
pub mod registry;
pub mod run;
pub mod settings;
pub mod traits;

pub use context::AnalysisContext;
pub use registry::DetectorRegistry;
pub use run::{run, Analyzed, Invocation};
pub use settings::{EffectiveConfig, Overrides, PatternList, Setting, SettingValue};
pub use traits::Detector;
