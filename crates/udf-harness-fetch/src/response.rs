use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::FetchError;
use crate::mime::ContentKind;

/// Response returned by [`crate::Fetch`].
///
/// Telemetry never consumes the body: textual bodies are buffered once and
/// kept here, other bodies are still unread.
#[derive(Debug)]
pub struct FetchResponse {
  status: StatusCode,
  headers: HeaderMap,
  url: Url,
  body: Body,
}

#[derive(Debug)]
enum Body {
  Buffered(Bytes),
  Streaming(reqwest::Response),
}

impl FetchResponse {
  pub(crate) fn buffered(status: StatusCode, headers: HeaderMap, url: Url, body: Bytes) -> Self {
    Self {
      status,
      headers,
      url,
      body: Body::Buffered(body),
    }
  }

  pub(crate) fn streaming(response: reqwest::Response) -> Self {
    Self {
      status: response.status(),
      headers: response.headers().clone(),
      url: response.url().clone(),
      body: Body::Streaming(response),
    }
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  pub fn content_kind(&self) -> ContentKind {
    ContentKind::from_headers(&self.headers)
  }

  pub async fn bytes(self) -> Result<Bytes, FetchError> {
    match self.body {
      Body::Buffered(bytes) => Ok(bytes),
      Body::Streaming(response) => Ok(response.bytes().await?),
    }
  }

  pub async fn text(self) -> Result<String, FetchError> {
    let bytes = self.bytes().await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  pub async fn json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
    let bytes = self.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
  }
}
