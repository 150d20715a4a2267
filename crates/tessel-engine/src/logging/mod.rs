//! Logging setup.
//!
//! The engine itself only talks to the `log` facade; hosts call
//! [`init_logging`] early to pick an `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
