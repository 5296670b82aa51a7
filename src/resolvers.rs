//! Resolvers bundled with the harness binary.

use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use serde_json::{Value, json};
use udf_harness_runtime::{GraphQlError, Resolver, ResolverCall, ResolverOutput, Thrown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BundledResolver {
  /// Return the invocation inputs unchanged
  Echo,
  /// Increment a counter in the invocation's KV namespace
  KvCounter,
  /// Fetch `args.url` and return the response
  Fetch,
}

impl BundledResolver {
  /// The name accepted by `--resolver`.
  pub fn name(self) -> &'static str {
    match self {
      BundledResolver::Echo => "echo",
      BundledResolver::KvCounter => "kv-counter",
      BundledResolver::Fetch => "fetch",
    }
  }

  pub fn build(self) -> Arc<dyn Resolver> {
    match self {
      BundledResolver::Echo => Arc::new(Echo),
      BundledResolver::KvCounter => Arc::new(KvCounter),
      BundledResolver::Fetch => Arc::new(FetchProxy),
    }
  }
}

struct Echo;

#[async_trait]
impl Resolver for Echo {
  async fn resolve(&self, call: ResolverCall) -> Result<ResolverOutput, Thrown> {
    call.console.debug([&call.args]);

    Ok(
      json!({
        "parent": call.parent,
        "args": call.args,
        "context": call.context.map(|c| c.value),
        "info": call.info,
      })
      .into(),
    )
  }
}

/// Increments `args.key` (default `counter`) `args.times` times.
struct KvCounter;

#[async_trait]
impl Resolver for KvCounter {
  async fn resolve(&self, call: ResolverCall) -> Result<ResolverOutput, Thrown> {
    let Some(context) = call.context else {
      return Err(
        GraphQlError::new("kv-counter needs a request context")
          .with_extension("code", "NO_CONTEXT")
          .into(),
      );
    };

    let key = call.args["key"].as_str().unwrap_or("counter");
    let times = call.args["times"].as_u64().unwrap_or(1);

    let mut count = context.kv.get_json::<u64>(key).await?.unwrap_or(0);
    for _ in 0..times {
      count += 1;
      context.kv.put_json(key, &count).await?;
    }
    call.console.info([json!(key), json!(count)]);

    Ok(json!({ "key": key, "count": count }).into())
  }
}

/// Fetches `args.url` and hands the response back for normalization.
struct FetchProxy;

#[async_trait]
impl Resolver for FetchProxy {
  async fn resolve(&self, call: ResolverCall) -> Result<ResolverOutput, Thrown> {
    let Some(url) = call.args["url"].as_str() else {
      return Err(Thrown::msg("args.url must be a string"));
    };

    let response = call.fetch.fetch(url).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    if !status.is_success() {
      call.console.warn([Value::from(url), Value::from(status.as_u16())]);
    }

    let mut output = http::Response::new(body);
    *output.status_mut() = status;
    *output.headers_mut() = headers;
    Ok(output.into())
  }
}
