//! Integration tests for the harness HTTP surface on a real listener.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use udf_harness_config::ServerConfig;
use udf_harness_runtime::{Resolver, ResolverCall, ResolverOutput, Thrown, UdfExecutor};
use udf_harness_server::{HarnessServer, ServerError};

/// Echoes `args`, logging once; throws when `args.fail` is set.
struct Echo;

#[async_trait]
impl Resolver for Echo {
  async fn resolve(&self, call: ResolverCall) -> Result<ResolverOutput, Thrown> {
    call.console.info(["echo"]);
    if call.args["fail"].as_bool() == Some(true) {
      return Err(Thrown::msg("asked to fail"));
    }
    Ok(call.args.into())
  }
}

struct TestServer {
  base_url: String,
  cancel: CancellationToken,
  handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
  async fn start() -> Self {
    let server = HarnessServer::bind(&ServerConfig::default())
      .await
      .expect("failed to bind");
    let base_url = format!("http://{}", server.local_addr());
    let cancel = CancellationToken::new();
    let executor = Arc::new(UdfExecutor::new(Arc::new(Echo)));
    let handle = tokio::spawn(server.run(executor, cancel.clone()));

    Self {
      base_url,
      cancel,
      handle,
    }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url)
  }

  async fn stop(self) {
    self.cancel.cancel();
    self
      .handle
      .await
      .expect("server task panicked")
      .expect("server failed");
  }
}

#[tokio::test]
async fn test_binds_loopback_ephemeral_port() {
  let server = HarnessServer::bind(&ServerConfig::default())
    .await
    .expect("failed to bind");

  assert!(server.local_addr().ip().is_loopback());
  assert_ne!(server.port(), 0);
}

#[tokio::test]
async fn test_announces_port_as_single_line() {
  let server = HarnessServer::bind(&ServerConfig::default())
    .await
    .expect("failed to bind");

  let mut out = Vec::new();
  server.announce_to(&mut out).expect("announce failed");

  assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", server.port()));
}

#[tokio::test]
async fn test_health() {
  let server = TestServer::start().await;

  let response = reqwest::get(server.url("/health")).await.unwrap();
  assert_eq!(response.status(), 200);
  assert_eq!(
    response.headers()["content-type"].to_str().unwrap(),
    "application/json"
  );
  let body: Value = response.json().await.unwrap();
  assert_eq!(body, json!({ "ready": true }));

  server.stop().await;
}

#[tokio::test]
async fn test_invoke_success() {
  let server = TestServer::start().await;

  let response = reqwest::Client::new()
    .post(server.url("/invoke"))
    .json(&json!({ "parent": null, "args": { "x": 1 }, "context": {}, "info": {} }))
    .send()
    .await
    .unwrap();
  assert_eq!(response.status(), 200);

  let body: Value = response.json().await.unwrap();
  assert_eq!(body["value"], json!({ "Success": { "x": 1 } }));
  assert_eq!(body["fetchRequests"], json!([]));
  assert_eq!(body["logEntries"].as_array().unwrap().len(), 1);
  assert_eq!(body["logEntries"][0]["level"], "info");
  assert_eq!(body["logEntries"][0]["message"], "\"echo\"");

  server.stop().await;
}

#[tokio::test]
async fn test_resolver_failure_is_still_200() {
  let server = TestServer::start().await;

  let response = reqwest::Client::new()
    .post(server.url("/invoke"))
    .json(&json!({ "args": { "fail": true } }))
    .send()
    .await
    .unwrap();
  assert_eq!(response.status(), 200);

  let body: Value = response.json().await.unwrap();
  assert_eq!(body["value"], json!({ "Error": "asked to fail" }));

  server.stop().await;
}

#[tokio::test]
async fn test_malformed_invoke_body() {
  let server = TestServer::start().await;

  let response = reqwest::Client::new()
    .post(server.url("/invoke"))
    .body("{oops")
    .send()
    .await
    .unwrap();
  assert_eq!(response.status(), 400);
  assert!(
    response
      .text()
      .await
      .unwrap()
      .starts_with("invalid invocation payload")
  );

  server.stop().await;
}

#[tokio::test]
async fn test_wrong_method() {
  let server = TestServer::start().await;
  let client = reqwest::Client::new();

  let response = client.post(server.url("/health")).send().await.unwrap();
  assert_eq!(response.status(), 405);
  assert_eq!(response.text().await.unwrap(), "method not allowed for /health");

  let response = client.get(server.url("/invoke")).send().await.unwrap();
  assert_eq!(response.status(), 405);
  assert_eq!(response.text().await.unwrap(), "method not allowed for /invoke");

  server.stop().await;
}

#[tokio::test]
async fn test_unknown_path() {
  let server = TestServer::start().await;

  let response = reqwest::get(server.url("/graphql")).await.unwrap();
  assert_eq!(response.status(), 404);
  assert_eq!(response.text().await.unwrap(), "/graphql not found");

  server.stop().await;
}

#[tokio::test]
async fn test_health_after_invocations() {
  let server = TestServer::start().await;
  let client = reqwest::Client::new();

  for args in [json!({}), json!({ "fail": true })] {
    client
      .post(server.url("/invoke"))
      .json(&json!({ "args": args }))
      .send()
      .await
      .unwrap();
  }

  let body: Value = reqwest::get(server.url("/health"))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
  assert_eq!(body, json!({ "ready": true }));

  server.stop().await;
}
