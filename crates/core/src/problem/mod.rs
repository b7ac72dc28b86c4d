pub mod sink;
pub mod types;

pub use sink::{IoSink, OutputSink};
pub use types::{Attr, Problem, Problems};
