//! Runtime error types.

/// Errors that can occur before the resolver runs.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
  /// The request body is not a valid invocation envelope.
  #[error("invalid invocation payload: {message}")]
  InvalidPayload { message: String },
}
