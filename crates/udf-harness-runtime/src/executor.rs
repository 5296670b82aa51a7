//! Resolver invocation.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, instrument, warn};
use udf_harness_fetch::Fetch;
use udf_harness_kv::KvNamespace;
use udf_harness_protocol::{InvokeRequest, InvokeResponse, InvokeResult};
use udf_harness_telemetry::{Console, TelemetryBuffer, TelemetrySink, TelemetrySnapshot};

use crate::classify::{classify, normalize_output};
use crate::error::RuntimeError;
use crate::resolver::{Resolver, ResolverCall, ResolverContext};
use crate::thrown::Thrown;

/// Runs the resolver, one invocation at a time or concurrently.
///
/// Each invocation gets its own telemetry buffer and KV namespace, so
/// overlapping invocations never observe each other.
pub struct UdfExecutor {
  resolver: Arc<dyn Resolver>,
  client: reqwest::Client,
}

impl UdfExecutor {
  pub fn new(resolver: Arc<dyn Resolver>) -> Self {
    Self::with_client(resolver, reqwest::Client::new())
  }

  /// Use `client` for every fetch the resolver makes.
  pub fn with_client(resolver: Arc<dyn Resolver>, client: reqwest::Client) -> Self {
    Self { resolver, client }
  }

  /// Parse a raw `POST /invoke` body and invoke.
  pub async fn invoke_json(&self, body: &[u8]) -> Result<InvokeResponse, RuntimeError> {
    let request: InvokeRequest =
      serde_json::from_slice(body).map_err(|e| RuntimeError::InvalidPayload {
        message: e.to_string(),
      })?;

    Ok(self.invoke(request).await)
  }

  /// Invoke the resolver once.
  #[instrument(
    name = "udf_invoke",
    skip(self, request),
    fields(
      invocation_id = %uuid::Uuid::new_v4(),
      has_context = request.context.is_some(),
    )
  )]
  pub async fn invoke(&self, request: InvokeRequest) -> InvokeResponse {
    info!("invocation started");

    let telemetry = Arc::new(TelemetryBuffer::new());
    let value = self.invoke_inner(request, telemetry.clone()).await;

    match &value {
      InvokeResult::Success(_) => info!("invocation succeeded"),
      InvokeResult::Error(message) => info!(error = %message, "resolver threw"),
      InvokeResult::GraphQlError(payload) => {
        info!(error = %payload.message, "resolver threw a GraphQL error")
      }
    }

    let TelemetrySnapshot {
      log_entries,
      fetch_requests,
    } = telemetry.snapshot();
    debug!(
      log_entries = log_entries.len(),
      fetch_requests = fetch_requests.len(),
      "telemetry captured"
    );

    InvokeResponse {
      value,
      fetch_requests,
      log_entries,
    }
  }

  /// Inner execution logic.
  async fn invoke_inner(
    &self,
    request: InvokeRequest,
    telemetry: Arc<TelemetryBuffer>,
  ) -> InvokeResult {
    let sink: Arc<dyn TelemetrySink> = telemetry;

    let InvokeRequest {
      parent,
      args,
      context,
      info,
    } = request;

    // Bind a fresh KV namespace into the context
    let context = context.map(|value| ResolverContext {
      value,
      kv: KvNamespace::in_memory(),
    });

    let call = ResolverCall {
      parent,
      args,
      context,
      info,
      console: Console::new(sink.clone()),
      fetch: Fetch::new(self.client.clone(), sink),
    };

    let outcome = AssertUnwindSafe(self.resolver.resolve(call))
      .catch_unwind()
      .await
      .unwrap_or_else(|payload| Err(panic_to_thrown(payload)));

    match outcome.and_then(normalize_output) {
      Ok(value) => InvokeResult::Success(value),
      Err(thrown) => classify(thrown),
    }
  }
}

fn panic_to_thrown(payload: Box<dyn Any + Send>) -> Thrown {
  let message = if let Some(message) = payload.downcast_ref::<&str>() {
    (*message).to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else {
    "unknown panic".to_string()
  };

  warn!(%message, "resolver panicked");
  Thrown::msg(format!("resolver panicked: {message}"))
}
