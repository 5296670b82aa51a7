use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a captured console call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Debug,
  Error,
  Info,
  Warn,
}

impl LogLevel {
  pub const ALL: [LogLevel; 4] = [
    LogLevel::Debug,
    LogLevel::Error,
    LogLevel::Info,
    LogLevel::Warn,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      LogLevel::Debug => "debug",
      LogLevel::Error => "error",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
    }
  }
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single console call made by the resolver during an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
  /// Milliseconds since the unix epoch.
  pub logged_at: u64,
  pub level: LogLevel,
  /// Arguments, each JSON-encoded, joined by a single space.
  pub message: String,
}
