use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, IntoUrl, Method, Request, RequestBuilder};
use tracing::debug;
use udf_harness_protocol::FetchRequest;
use udf_harness_telemetry::{TelemetrySink, now_millis};

use crate::error::FetchError;
use crate::mime::{ContentKind, mime_essence};
use crate::response::FetchResponse;

/// HTTP client handed to a resolver.
///
/// Cloning is cheap; clones share the connection pool and the sink.
#[derive(Clone)]
pub struct Fetch {
  client: Client,
  sink: Arc<dyn TelemetrySink>,
}

impl Fetch {
  /// Wrap `client`, reporting completed requests to `sink`.
  pub fn new(client: Client, sink: Arc<dyn TelemetrySink>) -> Self {
    Self { client, sink }
  }

  /// Start building a request. Send it with [`Fetch::send`].
  pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
    self.client.request(method, url)
  }

  pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
    self.request(Method::GET, url)
  }

  pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
    self.request(Method::POST, url)
  }

  /// `GET url`.
  pub async fn fetch(&self, url: impl IntoUrl) -> Result<FetchResponse, FetchError> {
    self.send(self.get(url)).await
  }

  pub async fn send(&self, builder: RequestBuilder) -> Result<FetchResponse, FetchError> {
    let request = builder.build()?;
    self.execute(request).await
  }

  /// Execute a prepared request and record it.
  ///
  /// A request that fails before a response arrives is not recorded; the
  /// error goes straight back to the caller.
  pub async fn execute(&self, request: Request) -> Result<FetchResponse, FetchError> {
    let url = request.url().to_string();
    let method = request.method().to_string();

    let start = Instant::now();
    let response = self.client.execute(request).await?;
    let duration = start.elapsed();

    let status = response.status();
    let content_type = mime_essence(response.headers());
    let kind = content_type
      .as_deref()
      .map(ContentKind::from_essence)
      .unwrap_or(ContentKind::Other);

    let (response, body) = if kind.is_textual() {
      let headers = response.headers().clone();
      let response_url = response.url().clone();
      let bytes = response.bytes().await?;
      let text = String::from_utf8_lossy(&bytes).into_owned();
      (
        FetchResponse::buffered(status, headers, response_url, bytes),
        Some(text),
      )
    } else {
      (FetchResponse::streaming(response), None)
    };

    debug!(%url, %method, status = status.as_u16(), "fetch completed");

    self.sink.record_fetch(FetchRequest {
      logged_at: now_millis(),
      url,
      method,
      status_code: status.as_u16(),
      duration: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
      content_type,
      body,
    });

    Ok(response)
  }
}

impl std::fmt::Debug for Fetch {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Fetch").finish_non_exhaustive()
  }
}
