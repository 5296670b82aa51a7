use udf_harness_protocol::{FetchRequest, LogEntry};

/// Receives telemetry produced while a resolver runs.
///
/// The executor owns the sink; instrumented handles only ever append.
/// Implementations must preserve the order in which records arrive.
pub trait TelemetrySink: Send + Sync {
  /// Called once per console call.
  fn record_log(&self, entry: LogEntry);

  /// Called once per completed outbound fetch.
  fn record_fetch(&self, request: FetchRequest);
}
