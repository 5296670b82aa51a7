use std::sync::{Mutex, MutexGuard};

use udf_harness_protocol::{FetchRequest, LogEntry};

use crate::sink::TelemetrySink;

/// In-memory, append-only telemetry for a single invocation.
#[derive(Debug, Default)]
pub struct TelemetryBuffer {
  inner: Mutex<TelemetrySnapshot>,
}

/// Everything recorded so far, in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
  pub log_entries: Vec<LogEntry>,
  pub fetch_requests: Vec<FetchRequest>,
}

impl TelemetryBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn snapshot(&self) -> TelemetrySnapshot {
    self.lock().clone()
  }

  pub fn len(&self) -> usize {
    let inner = self.lock();
    inner.log_entries.len() + inner.fetch_requests.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  // A panicking resolver must not take the telemetry down with it.
  fn lock(&self) -> MutexGuard<'_, TelemetrySnapshot> {
    self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl TelemetrySink for TelemetryBuffer {
  fn record_log(&self, entry: LogEntry) {
    self.lock().log_entries.push(entry);
  }

  fn record_fetch(&self, request: FetchRequest) {
    self.lock().fetch_requests.push(request);
  }
}
