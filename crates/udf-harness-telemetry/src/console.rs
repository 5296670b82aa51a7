use std::sync::Arc;

use serde::Serialize;
use udf_harness_protocol::{LogEntry, LogLevel};

use crate::clock::now_millis;
use crate::sink::TelemetrySink;

/// Console handed to a resolver.
///
/// Every call records exactly one [`LogEntry`] and prints nothing. Arguments
/// are JSON-encoded one by one and joined with a space, so
/// `console.info(["total", 3])` records the message `"total" 3`.
#[derive(Clone)]
pub struct Console {
  sink: Arc<dyn TelemetrySink>,
}

impl Console {
  pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
    Self { sink }
  }

  pub fn debug<I>(&self, args: I)
  where
    I: IntoIterator,
    I::Item: Serialize,
  {
    self.record(LogLevel::Debug, args);
  }

  pub fn info<I>(&self, args: I)
  where
    I: IntoIterator,
    I::Item: Serialize,
  {
    self.record(LogLevel::Info, args);
  }

  pub fn warn<I>(&self, args: I)
  where
    I: IntoIterator,
    I::Item: Serialize,
  {
    self.record(LogLevel::Warn, args);
  }

  pub fn error<I>(&self, args: I)
  where
    I: IntoIterator,
    I::Item: Serialize,
  {
    self.record(LogLevel::Error, args);
  }

  /// Same as [`Console::info`].
  pub fn log<I>(&self, args: I)
  where
    I: IntoIterator,
    I::Item: Serialize,
  {
    self.record(LogLevel::Info, args);
  }

  pub fn record<I>(&self, level: LogLevel, args: I)
  where
    I: IntoIterator,
    I::Item: Serialize,
  {
    let message = args
      .into_iter()
      .map(|arg| serde_json::to_string(&arg).unwrap_or_else(|_| "null".to_string()))
      .collect::<Vec<_>>()
      .join(" ");

    self.sink.record_log(LogEntry {
      logged_at: now_millis(),
      level,
      message,
    });
  }
}

impl std::fmt::Debug for Console {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Console").finish_non_exhaustive()
  }
}
