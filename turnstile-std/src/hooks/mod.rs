//! Standard hook implementations.

mod logging;
#[cfg(feature = "timeout")]
mod timeout;

pub use logging::{LoggingAfter, LoggingBefore};
#[cfg(feature = "timeout")]
pub use timeout::{TimeoutBefore, TimeoutError};
