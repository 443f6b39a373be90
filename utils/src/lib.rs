//! Shared utilities for the custody tools.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat, LoggingError};
pub use time::{format_age, format_duration};
