//! Structured logging for Restmount.
//!
//! Restmount logs through [`tracing`]. This crate installs a
//! `tracing-subscriber` registry with an [`EnvFilter`](tracing_subscriber::EnvFilter)
//! and a JSON or pretty formatting layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use restmount_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! tracing::info!(port = 8080, "starting");
//! ```

#![doc(html_root_url = "https://docs.rs/restmount-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{create_env_filter, init_logging, LogConfig};
