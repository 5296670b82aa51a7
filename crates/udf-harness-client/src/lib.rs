//! UDF Harness Client
//!
//! The controller side of the harness: spawn the harness process, learn its
//! port from the first parseable stdout line, wait for `/health`, then post
//! invocations and fold the returned telemetry into a single timeline.

mod client;
mod error;
mod process;
mod telemetry;

pub use client::{HarnessClient, wait_until_ready};
pub use error::ClientError;
pub use process::{HarnessProcess, parse_port_line};
pub use telemetry::{TelemetryEvent, merge_telemetry};
