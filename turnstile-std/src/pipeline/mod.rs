//! Pipeline compilation and execution.

mod compile;
mod execute;

pub use compile::{CompiledPipeline, ResponseWrapper};
pub use execute::RunOutcome;
