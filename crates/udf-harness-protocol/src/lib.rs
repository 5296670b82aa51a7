//! UDF Harness Protocol
//!
//! This crate contains the serializable types exchanged between the harness
//! process and the CLI that controls it. Field names follow the JSON the
//! controller already speaks (`loggedAt`, `statusCode`, `fetchRequests`, ...),
//! so changing a rename here is a breaking wire change.
//!
//! The harness writes these types; the controller reads them back.

mod fetch;
mod invoke;
mod log;
mod routes;

pub use fetch::FetchRequest;
pub use invoke::{GraphQlErrorPayload, InvokeRequest, InvokeResponse, InvokeResult};
pub use log::{LogEntry, LogLevel};
pub use routes::{HEALTH_PATH, HealthStatus, INVOKE_PATH};
