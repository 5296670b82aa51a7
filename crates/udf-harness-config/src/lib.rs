//! UDF Harness Config
//!
//! Serializable settings for the harness server and for the controller that
//! spawns it. Every field has a default, so an empty JSON object (or no file
//! at all) yields a working configuration:
//!
//! ```json
//! { "server": { "host": "127.0.0.1", "port": 0 },
//!   "readiness": { "retry_count": 50, "retry_interval_ms": 100 } }
//! ```
//!
//! Values from a file can be overridden afterwards by CLI flags.

mod error;
mod harness;

pub use error::ConfigError;
pub use harness::{HarnessConfig, ReadinessConfig, ServerConfig};
