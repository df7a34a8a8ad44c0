//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; `env_logger` is installed by the entry point.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
