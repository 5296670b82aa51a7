//! End-to-end tests against the real `udf-harness serve` process.

use serde_json::json;
use udf_harness_client::{HarnessProcess, merge_telemetry, wait_until_ready};
use udf_harness_config::ReadinessConfig;
use udf_harness_protocol::{InvokeRequest, InvokeResult, LogLevel};

async fn start(resolver: &str) -> HarnessProcess {
  let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_udf-harness"));
  command.args(["serve", "--resolver", resolver]);
  HarnessProcess::spawn(command)
    .await
    .expect("harness failed to start")
}

#[tokio::test]
async fn test_serve_echo() {
  let process = start("echo").await;
  let client = wait_until_ready(process.port(), &ReadinessConfig::default())
    .await
    .expect("harness not ready");

  let response = client
    .invoke(&InvokeRequest {
      args: json!({ "hello": "world" }),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(
    response.value,
    InvokeResult::Success(json!({
      "parent": null,
      "args": { "hello": "world" },
      "context": null,
      "info": null,
    }))
  );
  let events = merge_telemetry(&response);
  assert_eq!(events.len(), 1);
  assert_eq!(response.log_entries[0].level, LogLevel::Debug);

  process.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_serve_kv_counter_is_isolated() {
  let process = start("kv-counter").await;
  let client = wait_until_ready(process.port(), &ReadinessConfig::default())
    .await
    .expect("harness not ready");

  let request = InvokeRequest {
    args: json!({ "key": "visits", "times": 2 }),
    context: Some(json!({})),
    ..Default::default()
  };

  for _ in 0..2 {
    let response = client.invoke(&request).await.unwrap();
    assert_eq!(
      response.value,
      InvokeResult::Success(json!({ "key": "visits", "count": 2 }))
    );
  }

  process.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_serve_rejects_unknown_resolver() {
  let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_udf-harness"));
  command.args(["serve", "--resolver", "nope"]);

  let result = HarnessProcess::spawn(command).await;

  assert!(result.is_err());
}
