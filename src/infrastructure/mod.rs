pub mod error;
pub mod logging;

pub use error::{ErrorCategory, ReviewError, ReviewResult};
pub use logging::{setup_logging, LogFormat, LogOutput, LoggingConfig, StageTimer};
