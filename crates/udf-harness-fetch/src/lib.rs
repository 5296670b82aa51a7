//! Instrumented fetch for resolvers.
//!
//! [`Fetch`] wraps a single `reqwest::Client` (created once per harness) and
//! reports every completed request to a
//! [`TelemetrySink`](udf_harness_telemetry::TelemetrySink). Bodies of json,
//! plain text and html responses are buffered and recorded; everything else
//! stays a stream and is only described by status and content type.

mod client;
mod error;
mod mime;
mod response;

pub use client::Fetch;
pub use error::FetchError;
pub use mime::{ContentKind, mime_essence};
pub use response::FetchResponse;
