use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fetch::FetchRequest;
use crate::log::LogEntry;

/// Body of `POST /invoke`.
///
/// Every field is opaque to the harness and handed to the resolver as is.
/// A missing field reads as `null`; a `null` context means the resolver runs
/// without one (and therefore without a KV namespace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
  #[serde(default)]
  pub parent: Value,
  #[serde(default)]
  pub args: Value,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub context: Option<Value>,
  #[serde(default)]
  pub info: Value,
}

/// Outcome of running the resolver once.
///
/// Serialized externally tagged: `{"Success": ..}`, `{"Error": ".."}` or
/// `{"GraphQLError": {"message": .., "extensions": ..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InvokeResult {
  Success(Value),
  Error(String),
  #[serde(rename = "GraphQLError")]
  GraphQlError(GraphQlErrorPayload),
}

impl InvokeResult {
  pub fn is_success(&self) -> bool {
    matches!(self, InvokeResult::Success(_))
  }
}

/// A GraphQL error as thrown by the resolver, extensions preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlErrorPayload {
  pub message: String,
  #[serde(default)]
  pub extensions: Map<String, Value>,
}

/// Body returned from `POST /invoke`, always with status 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResponse {
  pub value: InvokeResult,
  pub fetch_requests: Vec<FetchRequest>,
  pub log_entries: Vec<LogEntry>,
}
