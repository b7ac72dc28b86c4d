pub mod introspector;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod snapshot;
pub mod types;

pub use introspector::{Introspector, ViewListing};
pub use snapshot::SchemaSnapshot;
pub use types::{Column, ForeignKey, Index, Table};
