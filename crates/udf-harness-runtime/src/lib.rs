//! UDF Harness Runtime
//!
//! Runs a single [`Resolver`] once per invocation and turns whatever it does
//! into an [`InvokeResponse`](udf_harness_protocol::InvokeResponse):
//!
//! 1. fresh telemetry, so nothing from a previous call leaks in
//! 2. a fresh in-memory KV namespace when the request carries a context
//! 3. the resolver call, with an instrumented [`Console`] and [`Fetch`]
//! 4. `Response` outputs normalized by content type
//! 5. thrown values classified as `Error` or `GraphQLError`
//!
//! Resolver failures never surface as Rust errors from [`UdfExecutor::invoke`];
//! they are part of the response value.

mod classify;
mod error;
mod executor;
mod resolver;
mod thrown;

pub use classify::{classify, normalize_output};
pub use error::RuntimeError;
pub use executor::UdfExecutor;
pub use resolver::{
  Resolver, ResolverCall, ResolverContext, ResolverFn, ResolverOutput, resolver_fn,
};
pub use thrown::{GraphQlError, Thrown};

pub use udf_harness_fetch::{Fetch, FetchError, FetchResponse};
pub use udf_harness_kv::{KvError, KvNamespace};
pub use udf_harness_telemetry::Console;
