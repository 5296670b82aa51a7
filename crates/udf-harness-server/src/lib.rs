//! HTTP surface of the udf harness.
//!
//! Two routes on a loopback listener:
//!
//! - `GET /health` answers `{"ready": true}`
//! - `POST /invoke` runs the resolver and always answers 200; failures of
//!   the resolver are part of the JSON body
//!
//! A known path with the wrong method gets a 405, anything else a 404, both
//! with a plain text body naming the path.
//!
//! On startup the bound port is written to stdout exactly once. A parent
//! process reads that line to find the harness; nothing else may be written
//! to stdout.

mod error;
mod router;
mod server;

pub use error::ServerError;
pub use router::router;
pub use server::{HarnessServer, serve};
