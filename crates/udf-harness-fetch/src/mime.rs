use reqwest::header::{CONTENT_TYPE, HeaderMap};

/// How a body is treated, keyed on the MIME essence of its `content-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
  Json,
  Text,
  Html,
  Other,
}

impl ContentKind {
  /// Classify a MIME essence such as `application/json`.
  pub fn from_essence(essence: &str) -> Self {
    let essence = essence.trim();
    if essence.eq_ignore_ascii_case("application/json") {
      ContentKind::Json
    } else if essence.eq_ignore_ascii_case("text/plain") {
      ContentKind::Text
    } else if essence.eq_ignore_ascii_case("text/html") {
      ContentKind::Html
    } else {
      ContentKind::Other
    }
  }

  /// Classify from headers. A missing or unreadable `content-type` is `Other`.
  pub fn from_headers(headers: &HeaderMap) -> Self {
    mime_essence(headers)
      .map(|essence| Self::from_essence(&essence))
      .unwrap_or(ContentKind::Other)
  }

  /// Whether the body is small, textual and worth recording.
  pub fn is_textual(&self) -> bool {
    !matches!(self, ContentKind::Other)
  }
}

/// `content-type` up to the first `;`, trimmed.
pub fn mime_essence(headers: &HeaderMap) -> Option<String> {
  let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
  let essence = value.split(';').next().unwrap_or_default().trim();
  Some(essence.to_string())
}
