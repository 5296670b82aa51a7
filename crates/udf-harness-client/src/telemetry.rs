use std::fmt;

use udf_harness_protocol::{FetchRequest, InvokeResponse, LogEntry};

/// One item on an invocation's telemetry timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
  Log(LogEntry),
  Fetch(FetchRequest),
}

impl TelemetryEvent {
  /// Milliseconds since the Unix epoch.
  pub fn logged_at(&self) -> u64 {
    match self {
      TelemetryEvent::Log(entry) => entry.logged_at,
      TelemetryEvent::Fetch(fetch) => fetch.logged_at,
    }
  }
}

impl fmt::Display for TelemetryEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TelemetryEvent::Log(entry) => write!(f, "[{}] {}", entry.level, entry.message),
      TelemetryEvent::Fetch(fetch) => write!(
        f,
        "[fetch] {} {} -> {} ({} ms)",
        fetch.method, fetch.url, fetch.status_code, fetch.duration
      ),
    }
  }
}

/// Merge log entries and fetches into one timeline ordered by `loggedAt`.
///
/// The sort is stable: events with equal timestamps keep log entries before
/// fetches, each in recorded order.
pub fn merge_telemetry(response: &InvokeResponse) -> Vec<TelemetryEvent> {
  let mut events: Vec<TelemetryEvent> = response
    .log_entries
    .iter()
    .cloned()
    .map(TelemetryEvent::Log)
    .chain(
      response
        .fetch_requests
        .iter()
        .cloned()
        .map(TelemetryEvent::Fetch),
    )
    .collect();

  events.sort_by_key(TelemetryEvent::logged_at);
  events
}

#[cfg(test)]
mod tests {
  use serde_json::Value;
  use udf_harness_protocol::{InvokeResult, LogLevel};

  use super::*;

  fn log(logged_at: u64, message: &str) -> LogEntry {
    LogEntry {
      logged_at,
      level: LogLevel::Info,
      message: message.to_string(),
    }
  }

  fn fetch(logged_at: u64, url: &str) -> FetchRequest {
    FetchRequest {
      logged_at,
      url: url.to_string(),
      method: "GET".to_string(),
      status_code: 200,
      duration: 3,
      content_type: None,
      body: None,
    }
  }

  #[test]
  fn test_merge_orders_by_logged_at() {
    let response = InvokeResponse {
      value: InvokeResult::Success(Value::Null),
      log_entries: vec![log(10, "a"), log(30, "c")],
      fetch_requests: vec![fetch(20, "http://b"), fetch(40, "http://d")],
    };

    let order: Vec<u64> = merge_telemetry(&response)
      .iter()
      .map(TelemetryEvent::logged_at)
      .collect();
    assert_eq!(order, [10, 20, 30, 40]);
  }

  #[test]
  fn test_merge_is_stable_for_equal_timestamps() {
    let response = InvokeResponse {
      value: InvokeResult::Success(Value::Null),
      log_entries: vec![log(5, "first"), log(5, "second")],
      fetch_requests: vec![fetch(5, "http://third")],
    };

    let events = merge_telemetry(&response);
    assert_eq!(
      events,
      [
        TelemetryEvent::Log(log(5, "first")),
        TelemetryEvent::Log(log(5, "second")),
        TelemetryEvent::Fetch(fetch(5, "http://third")),
      ]
    );
  }

  #[test]
  fn test_merge_empty() {
    let response = InvokeResponse {
      value: InvokeResult::Error("boom".to_string()),
      log_entries: vec![],
      fetch_requests: vec![],
    };
    assert!(merge_telemetry(&response).is_empty());
  }

  #[test]
  fn test_display() {
    assert_eq!(
      TelemetryEvent::Log(log(1, "\"hi\"")).to_string(),
      "[info] \"hi\""
    );
    assert_eq!(
      TelemetryEvent::Fetch(fetch(1, "http://x/")).to_string(),
      "[fetch] GET http://x/ -> 200 (3 ms)"
    );
  }
}
