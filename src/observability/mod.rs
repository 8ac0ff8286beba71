//! Structured logging setup.
//!
//! The library itself only emits `tracing` events. Services embedding it call
//! [`init_tracing`] once at startup to install a subscriber built from
//! `[observability.logging]`.

#[cfg(feature = "logging")]
mod tracing_init;

#[cfg(feature = "logging")]
pub use tracing_init::*;
