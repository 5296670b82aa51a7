use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
  #[serde(default)]
  pub server: ServerConfig,
  #[serde(default)]
  pub readiness: ReadinessConfig,
}

impl HarnessConfig {
  /// Load configuration from a JSON file.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// Where the harness listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
  /// Interface to bind. Loopback unless deliberately changed.
  #[serde(default = "default_host")]
  pub host: IpAddr,
  /// Port to bind; `0` lets the OS pick one, which is then announced on stdout.
  #[serde(default)]
  pub port: u16,
}

impl ServerConfig {
  pub fn socket_addr(&self) -> SocketAddr {
    SocketAddr::new(self.host, self.port)
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: 0,
    }
  }
}

fn default_host() -> IpAddr {
  IpAddr::V4(Ipv4Addr::LOCALHOST)
}

/// How long a controller waits for a freshly spawned harness to answer
/// `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessConfig {
  #[serde(default = "default_retry_count")]
  pub retry_count: usize,
  #[serde(default = "default_retry_interval_ms")]
  pub retry_interval_ms: u64,
}

impl ReadinessConfig {
  pub fn retry_interval(&self) -> Duration {
    Duration::from_millis(self.retry_interval_ms)
  }
}

impl Default for ReadinessConfig {
  fn default() -> Self {
    Self {
      retry_count: default_retry_count(),
      retry_interval_ms: default_retry_interval_ms(),
    }
  }
}

fn default_retry_count() -> usize {
  50
}

fn default_retry_interval_ms() -> u64 {
  100
}
