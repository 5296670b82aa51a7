/// Errors returned by [`crate::KvNamespace`].
#[derive(Debug, thiserror::Error)]
pub enum KvError {
  /// The key itself is unusable (empty, `.` or `..`).
  #[error("invalid key: {message}")]
  InvalidKey { message: String },

  /// The request violates a store limit; `status` mirrors the HTTP status the
  /// deployed store answers with.
  #[error("KV {operation} failed: {status} {message}")]
  Rejected {
    operation: &'static str,
    status: u16,
    message: String,
  },

  /// The stored value is not valid JSON for the requested type.
  #[error("stored value is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
}

impl KvError {
  pub(crate) fn invalid_key(message: impl Into<String>) -> Self {
    Self::InvalidKey {
      message: message.into(),
    }
  }

  pub(crate) fn rejected(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
    Self::Rejected {
      operation,
      status,
      message: message.into(),
    }
  }
}
