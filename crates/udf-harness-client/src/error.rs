//! Client error types.

/// Errors that can occur while driving a harness process.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  /// The harness process could not be started.
  #[error("failed to spawn harness: {source}")]
  Spawn {
    #[source]
    source: std::io::Error,
  },

  /// The harness exited or closed stdout before announcing a port.
  #[error("harness exited without announcing a port; output: {output:?}")]
  SpawnFailed { output: String },

  /// Reading the harness stdout failed.
  #[error("failed to read harness output: {source}")]
  Output {
    #[source]
    source: std::io::Error,
  },

  /// The harness never answered its health check.
  #[error("harness on port {port} not ready after {attempts} attempts")]
  NotReady { port: u16, attempts: usize },

  /// The harness answered with a non-success status.
  #[error("harness returned {status}: {message}")]
  Status { status: u16, message: String },

  #[error("harness request failed: {0}")]
  Http(#[from] reqwest::Error),
}
