use reqwest::StatusCode;
use tracing::{debug, instrument};
use udf_harness_config::ReadinessConfig;
use udf_harness_protocol::{HEALTH_PATH, HealthStatus, INVOKE_PATH, InvokeRequest, InvokeResponse};

use crate::error::ClientError;

/// HTTP client for one harness instance.
#[derive(Debug, Clone)]
pub struct HarnessClient {
  http: reqwest::Client,
  base_url: String,
}

impl HarnessClient {
  /// Talk to a harness on the loopback interface.
  pub fn new(port: u16) -> Self {
    Self::with_base_url(format!("http://127.0.0.1:{port}"))
  }

  pub fn with_base_url(base_url: impl Into<String>) -> Self {
    Self {
      http: reqwest::Client::new(),
      base_url: base_url.into(),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub async fn health(&self) -> Result<HealthStatus, ClientError> {
    let response = self
      .http
      .get(format!("{}{HEALTH_PATH}", self.base_url))
      .send()
      .await?;
    let response = check_status(response).await?;
    Ok(response.json().await?)
  }

  /// Post one invocation and return the harness envelope.
  #[instrument(name = "harness_invoke", skip(self, request), fields(base_url = %self.base_url))]
  pub async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeResponse, ClientError> {
    let response = self
      .http
      .post(format!("{}{INVOKE_PATH}", self.base_url))
      .json(request)
      .send()
      .await?;
    let response = check_status(response).await?;
    Ok(response.json().await?)
  }
}

/// Poll `GET /health` until the harness on `port` answers ready.
///
/// Connection errors count as "not ready yet"; any other failure is returned
/// immediately.
pub async fn wait_until_ready(
  port: u16,
  config: &ReadinessConfig,
) -> Result<HarnessClient, ClientError> {
  let client = HarnessClient::new(port);

  for attempt in 1..=config.retry_count {
    match client.health().await {
      Ok(status) if status.ready => {
        debug!(port, attempt, "harness ready");
        return Ok(client);
      }
      Ok(_) => debug!(port, attempt, "harness not ready"),
      Err(ClientError::Http(e)) if e.is_connect() => {
        debug!(port, attempt, "harness not accepting connections yet")
      }
      Err(e) => return Err(e),
    }

    if attempt < config.retry_count {
      tokio::time::sleep(config.retry_interval()).await;
    }
  }

  Err(ClientError::NotReady {
    port,
    attempts: config.retry_count,
  })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
  let status = response.status();
  if status == StatusCode::OK {
    return Ok(response);
  }

  let message = response.text().await.unwrap_or_default();
  Err(ClientError::Status {
    status: status.as_u16(),
    message,
  })
}
