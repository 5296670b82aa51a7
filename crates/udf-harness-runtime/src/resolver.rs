use std::future::Future;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use udf_harness_fetch::Fetch;
use udf_harness_kv::KvNamespace;
use udf_harness_telemetry::Console;

use crate::thrown::Thrown;

/// A user-defined resolver.
///
/// Called once per invocation. Anything logged through `call.console` and
/// fetched through `call.fetch` is captured and returned to the caller next
/// to the result.
#[async_trait]
pub trait Resolver: Send + Sync {
  async fn resolve(&self, call: ResolverCall) -> Result<ResolverOutput, Thrown>;
}

/// Everything a resolver receives for one invocation.
#[derive(Debug)]
pub struct ResolverCall {
  pub parent: serde_json::Value,
  pub args: serde_json::Value,
  /// `None` when the request carried no (or a `null`) context.
  pub context: Option<ResolverContext>,
  pub info: serde_json::Value,
  pub console: Console,
  pub fetch: Fetch,
}

/// Request context with the injected KV namespace.
#[derive(Debug)]
pub struct ResolverContext {
  /// The context exactly as sent by the caller.
  pub value: serde_json::Value,
  /// Fresh for every invocation; empty when the resolver starts.
  pub kv: KvNamespace,
}

/// What a resolver returns.
#[derive(Debug)]
pub enum ResolverOutput {
  /// A plain JSON value, passed through untouched.
  Value(Value),
  /// A full HTTP response, normalized by its `content-type`.
  Response(http::Response<Bytes>),
}

impl From<Value> for ResolverOutput {
  fn from(value: Value) -> Self {
    ResolverOutput::Value(value)
  }
}

impl From<http::Response<Bytes>> for ResolverOutput {
  fn from(response: http::Response<Bytes>) -> Self {
    ResolverOutput::Response(response)
  }
}

/// Adapter implementing [`Resolver`] for an async closure.
pub struct ResolverFn<F>(F);

/// Wrap an async function as a [`Resolver`].
///
/// ```ignore
/// let resolver = resolver_fn(|call: ResolverCall| async move {
///   Ok(call.args.into())
/// });
/// ```
pub fn resolver_fn<F, Fut>(f: F) -> ResolverFn<F>
where
  F: Fn(ResolverCall) -> Fut + Send + Sync,
  Fut: Future<Output = Result<ResolverOutput, Thrown>> + Send + 'static,
{
  ResolverFn(f)
}

#[async_trait]
impl<F, Fut> Resolver for ResolverFn<F>
where
  F: Fn(ResolverCall) -> Fut + Send + Sync,
  Fut: Future<Output = Result<ResolverOutput, Thrown>> + Send + 'static,
{
  async fn resolve(&self, call: ResolverCall) -> Result<ResolverOutput, Thrown> {
    (self.0)(call).await
  }
}
