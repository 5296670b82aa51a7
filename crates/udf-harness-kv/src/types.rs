use serde::{Deserialize, Serialize};

/// Options for [`crate::KvNamespace::put_with`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutOptions {
  /// Absolute expiry, seconds since the unix epoch.
  pub expiration: Option<u64>,
  /// Relative expiry in seconds. Takes precedence over `expiration`.
  pub expiration_ttl: Option<u64>,
  /// Arbitrary JSON stored alongside the value.
  pub metadata: Option<serde_json::Value>,
}

/// Options for [`crate::KvNamespace::list`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
  pub prefix: Option<String>,
  /// Page size; defaults to 1000, the maximum.
  pub limit: Option<usize>,
  /// Cursor returned by a previous page.
  pub cursor: Option<String>,
}

/// A key returned by a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInfo {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expiration: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metadata: Option<serde_json::Value>,
}

/// One page of keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
  pub keys: Vec<KeyInfo>,
  pub list_complete: bool,
  /// Present when more keys remain.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cursor: Option<String>,
}

/// A value read together with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct KvValue {
  pub value: Option<String>,
  pub metadata: Option<serde_json::Value>,
}
