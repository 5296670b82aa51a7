//! Telemetry capture for resolver invocations.
//!
//! Instead of replacing process-wide globals, every invocation owns a
//! [`TelemetryBuffer`] and hands instrumented handles (a [`Console`] here, a
//! fetch client in `udf-harness-fetch`) to the resolver. Anything the
//! resolver does through those handles ends up in the buffer, in call order.

mod buffer;
mod clock;
mod console;
mod sink;

pub use buffer::{TelemetryBuffer, TelemetrySnapshot};
pub use clock::now_millis;
pub use console::Console;
pub use sink::TelemetrySink;
