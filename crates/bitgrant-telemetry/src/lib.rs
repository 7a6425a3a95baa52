//! Bitgrant Telemetry - logging setup for bitgrant tools and services.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats
//! - Stdout, stderr and rotating file targets
//! - Per-target directive overrides via `EnvFilter`
//!
//! # Example
//!
//! ```rust,no_run
//! use bitgrant_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), bitgrant_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("bitgrant_gate=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
