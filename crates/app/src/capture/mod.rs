//! Button-triggered capture: pin setup, the polling state machine, and the
//! cleanup that runs on every exit path.
//!
//! The module is split into focused submodules:
//! - `config`: CLI configuration parsing.
//! - `telemetry`: tracing subscriber and optional Prometheus exporter.
//! - `state`: capture loop states.
//! - `clock`: wall time and sleeping, swappable in tests.
//! - `session`: ownership of the camera and pins plus guaranteed release.
//! - `pipeline`: startup sequence and the poll loop itself.

pub use config::{CaptureCliArgs, CaptureConfig};
pub use pipeline::run;

mod clock;
mod config;
mod pipeline;
mod session;
mod state;
mod telemetry;
#[cfg(test)]
mod testing;

pub(crate) use telemetry::init_tracing;
