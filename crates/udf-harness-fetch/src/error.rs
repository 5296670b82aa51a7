/// Errors surfaced to the resolver by [`crate::Fetch`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  /// The request could not be built, sent, or its body read.
  #[error("fetch failed: {0}")]
  Request(#[from] reqwest::Error),

  /// The response body is not valid JSON for the requested type.
  #[error("invalid JSON body: {0}")]
  Decode(#[from] serde_json::Error),
}
