use serde::{Deserialize, Serialize};

/// Readiness probe, `GET` only.
pub const HEALTH_PATH: &str = "/health";

/// Resolver invocation, `POST` only.
pub const INVOKE_PATH: &str = "/invoke";

/// Body of a successful health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
  pub ready: bool,
}

impl HealthStatus {
  pub const READY: HealthStatus = HealthStatus { ready: true };
}
