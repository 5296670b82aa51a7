use async_trait::async_trait;
use bytes::Bytes;

use crate::types::{ListOptions, ListResult};

/// A value as held by the storage engine.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
  pub value: Bytes,
  /// Seconds since the unix epoch after which the entry is gone.
  pub expiration: Option<u64>,
  pub metadata: Option<serde_json::Value>,
}

/// Storage engine behind a [`crate::KvNamespace`].
///
/// The namespace validates input; the engine only stores, expires and lists.
/// Expired entries must never be returned.
#[async_trait]
pub trait KvStorage: Send + Sync {
  /// Get an entry by key.
  async fn get(&self, key: &str) -> Option<StoredValue>;

  /// Insert or replace an entry.
  async fn put(&self, key: &str, value: StoredValue);

  /// Remove an entry. Returns whether a live entry was removed.
  async fn delete(&self, key: &str) -> bool;

  /// List live keys, sorted, one page at a time.
  async fn list(&self, options: &ListOptions) -> ListResult;
}
