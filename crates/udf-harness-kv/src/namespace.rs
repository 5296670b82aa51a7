use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::clock::{Clock, system_clock};
use crate::error::KvError;
use crate::memory::{MAX_LIST_KEYS, MemoryStorage, decode_cursor};
use crate::storage::{KvStorage, StoredValue};
use crate::types::{KvValue, ListOptions, ListResult, PutOptions};

const MAX_KEY_SIZE: usize = 512;
const MAX_VALUE_SIZE: usize = 25 * 1024 * 1024;
const MAX_METADATA_SIZE: usize = 1024;
const MIN_CACHE_TTL: u64 = 60;
const MAX_EXPIRATION: u64 = i32::MAX as u64;

/// A key-value namespace handle.
///
/// Cheap to clone; clones share the same storage.
#[derive(Clone)]
pub struct KvNamespace {
  storage: Arc<dyn KvStorage>,
  clock: Clock,
}

impl KvNamespace {
  pub fn new(storage: Arc<dyn KvStorage>) -> Self {
    Self::with_clock(storage, system_clock())
  }

  pub fn with_clock(storage: Arc<dyn KvStorage>, clock: Clock) -> Self {
    Self { storage, clock }
  }

  /// A namespace over a fresh, empty [`MemoryStorage`].
  pub fn in_memory() -> Self {
    Self::new(Arc::new(MemoryStorage::new()))
  }

  /// Read a value as text. Invalid UTF-8 is replaced, not rejected.
  pub async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
    Ok(
      self
        .get_bytes(key)
        .await?
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
    )
  }

  pub async fn get_bytes(&self, key: &str) -> Result<Option<Bytes>, KvError> {
    validate_key("GET", key)?;
    Ok(self.storage.get(key).await.map(|stored| stored.value))
  }

  pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
    match self.get_bytes(key).await? {
      Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  pub async fn get_with_metadata(&self, key: &str) -> Result<KvValue, KvError> {
    validate_key("GET", key)?;
    Ok(match self.storage.get(key).await {
      Some(stored) => KvValue {
        value: Some(String::from_utf8_lossy(&stored.value).into_owned()),
        metadata: stored.metadata,
      },
      None => KvValue {
        value: None,
        metadata: None,
      },
    })
  }

  pub async fn put(&self, key: &str, value: impl Into<Bytes>) -> Result<(), KvError> {
    self.put_with(key, value, PutOptions::default()).await
  }

  pub async fn put_with(
    &self,
    key: &str,
    value: impl Into<Bytes>,
    options: PutOptions,
  ) -> Result<(), KvError> {
    validate_key("PUT", key)?;
    let value = value.into();
    let expiration = self.resolve_expiration(&options)?;

    if value.len() > MAX_VALUE_SIZE {
      return Err(KvError::rejected(
        "PUT",
        413,
        format!(
          "Value length of {} exceeds limit of {MAX_VALUE_SIZE}.",
          value.len()
        ),
      ));
    }

    if let Some(metadata) = &options.metadata {
      let length = serde_json::to_vec(metadata)?.len();
      if length > MAX_METADATA_SIZE {
        return Err(KvError::rejected(
          "PUT",
          413,
          format!("Metadata length of {length} exceeds limit of {MAX_METADATA_SIZE}."),
        ));
      }
    }

    self
      .storage
      .put(
        key,
        StoredValue {
          value,
          expiration,
          metadata: options.metadata,
        },
      )
      .await;
    Ok(())
  }

  /// Serialize `value` as JSON and store it.
  pub async fn put_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
    let bytes = serde_json::to_vec(value)?;
    self.put(key, bytes).await
  }

  /// Deleting a missing key is not an error.
  pub async fn delete(&self, key: &str) -> Result<(), KvError> {
    validate_key("DELETE", key)?;
    self.storage.delete(key).await;
    Ok(())
  }

  pub async fn list(&self, options: ListOptions) -> Result<ListResult, KvError> {
    let limit = options.limit.unwrap_or(MAX_LIST_KEYS);
    if limit < 1 {
      return Err(KvError::rejected(
        "GET",
        400,
        format!("Invalid key_count_limit of {limit}. Please specify an integer greater than 0."),
      ));
    }
    if limit > MAX_LIST_KEYS {
      return Err(KvError::rejected(
        "GET",
        400,
        format!(
          "Invalid key_count_limit of {limit}. Please specify an integer less than {MAX_LIST_KEYS}."
        ),
      ));
    }
    if let Some(cursor) = &options.cursor
      && decode_cursor(cursor).is_none()
    {
      return Err(KvError::rejected(
        "GET",
        400,
        format!("Invalid cursor {cursor}."),
      ));
    }

    Ok(self.storage.list(&options).await)
  }

  fn resolve_expiration(&self, options: &PutOptions) -> Result<Option<u64>, KvError> {
    let now = (self.clock)();

    if let Some(ttl) = options.expiration_ttl {
      if ttl == 0 || ttl > MAX_EXPIRATION {
        return Err(KvError::rejected(
          "PUT",
          400,
          format!("Invalid expiration_ttl of {ttl}. Please specify integer greater than 0."),
        ));
      }
      if ttl < MIN_CACHE_TTL {
        return Err(KvError::rejected(
          "PUT",
          400,
          format!(
            "Invalid expiration_ttl of {ttl}. Expiration TTL must be at least {MIN_CACHE_TTL}."
          ),
        ));
      }
      return Ok(Some(now + ttl));
    }

    if let Some(expiration) = options.expiration {
      if expiration <= now || expiration > MAX_EXPIRATION {
        return Err(KvError::rejected(
          "PUT",
          400,
          format!(
            "Invalid expiration of {expiration}. Please specify integer greater than the current number of seconds since the UNIX epoch."
          ),
        ));
      }
      if expiration < now + MIN_CACHE_TTL {
        return Err(KvError::rejected(
          "PUT",
          400,
          format!(
            "Invalid expiration of {expiration}. Expiration times must be at least {MIN_CACHE_TTL} seconds in the future."
          ),
        ));
      }
      return Ok(Some(expiration));
    }

    Ok(None)
  }
}

impl std::fmt::Debug for KvNamespace {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("KvNamespace").finish_non_exhaustive()
  }
}

fn validate_key(operation: &'static str, key: &str) -> Result<(), KvError> {
  match key {
    "" => Err(KvError::invalid_key("Key name cannot be empty.")),
    "." => Err(KvError::invalid_key("\".\" is not allowed as a key name.")),
    ".." => Err(KvError::invalid_key("\"..\" is not allowed as a key name.")),
    _ if key.len() > MAX_KEY_SIZE => Err(KvError::rejected(
      operation,
      414,
      format!(
        "UTF-8 encoded length of {} exceeds key length limit of {MAX_KEY_SIZE}.",
        key.len()
      ),
    )),
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU64, Ordering};

  use serde_json::json;

  use super::*;

  const NOW: u64 = 1_700_000_000;

  fn namespace_at(now: u64) -> (KvNamespace, Arc<AtomicU64>) {
    let time = Arc::new(AtomicU64::new(now));
    let handle = time.clone();
    let clock: Clock = Arc::new(move || handle.load(Ordering::SeqCst));
    let storage = Arc::new(MemoryStorage::with_clock(clock.clone()));
    (KvNamespace::with_clock(storage, clock), time)
  }

  #[tokio::test]
  async fn test_put_then_get() {
    let kv = KvNamespace::in_memory();

    assert_eq!(kv.get("k").await.unwrap(), None);
    kv.put("k", "v").await.unwrap();
    assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("v"));
  }

  #[tokio::test]
  async fn test_fresh_namespaces_do_not_share_state() {
    let first = KvNamespace::in_memory();
    first.put("k", "v").await.unwrap();

    let second = KvNamespace::in_memory();
    assert_eq!(second.get("k").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_clones_share_state() {
    let kv = KvNamespace::in_memory();
    let clone = kv.clone();

    clone.put("k", "v").await.unwrap();
    assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("v"));
  }

  #[tokio::test]
  async fn test_json_values() {
    let kv = KvNamespace::in_memory();

    kv.put_json("user", &json!({ "name": "Ada", "visits": 3 }))
      .await
      .unwrap();
    let user: serde_json::Value = kv.get_json("user").await.unwrap().unwrap();
    assert_eq!(user["visits"], 3);

    kv.put("broken", "{").await.unwrap();
    let err = kv.get_json::<serde_json::Value>("broken").await.unwrap_err();
    assert!(matches!(err, KvError::Json(_)));
  }

  #[tokio::test]
  async fn test_metadata_round_trip() {
    let kv = KvNamespace::in_memory();

    kv.put_with(
      "k",
      "v",
      PutOptions {
        metadata: Some(json!({ "owner": "ada" })),
        ..Default::default()
      },
    )
    .await
    .unwrap();

    let read = kv.get_with_metadata("k").await.unwrap();
    assert_eq!(read.value.as_deref(), Some("v"));
    assert_eq!(read.metadata, Some(json!({ "owner": "ada" })));

    let missing = kv.get_with_metadata("nope").await.unwrap();
    assert_eq!(missing.value, None);
    assert_eq!(missing.metadata, None);
  }

  #[tokio::test]
  async fn test_delete() {
    let kv = KvNamespace::in_memory();

    kv.put("k", "v").await.unwrap();
    kv.delete("k").await.unwrap();
    assert_eq!(kv.get("k").await.unwrap(), None);

    // Deleting twice is fine.
    kv.delete("k").await.unwrap();
  }

  #[tokio::test]
  async fn test_invalid_keys() {
    let kv = KvNamespace::in_memory();

    for key in ["", ".", ".."] {
      let err = kv.put(key, "v").await.unwrap_err();
      assert!(matches!(err, KvError::InvalidKey { .. }), "key {key:?}");
    }

    let long_key = "k".repeat(513);
    let err = kv.get(&long_key).await.unwrap_err();
    assert!(matches!(err, KvError::Rejected { status: 414, .. }));
    assert!(err.to_string().starts_with("KV GET failed: 414"));

    kv.put(&"k".repeat(512), "v").await.unwrap();
  }

  #[tokio::test]
  async fn test_oversized_metadata_is_rejected() {
    let kv = KvNamespace::in_memory();

    let err = kv
      .put_with(
        "k",
        "v",
        PutOptions {
          metadata: Some(json!("x".repeat(1100))),
          ..Default::default()
        },
      )
      .await
      .unwrap_err();
    assert!(matches!(err, KvError::Rejected { status: 413, .. }));
  }

  #[tokio::test]
  async fn test_expiration_ttl() {
    let (kv, time) = namespace_at(NOW);

    kv.put_with(
      "session",
      "abc",
      PutOptions {
        expiration_ttl: Some(60),
        ..Default::default()
      },
    )
    .await
    .unwrap();

    let listed = kv.list(ListOptions::default()).await.unwrap();
    assert_eq!(listed.keys[0].expiration, Some(NOW + 60));

    time.store(NOW + 59, Ordering::SeqCst);
    assert!(kv.get("session").await.unwrap().is_some());

    time.store(NOW + 60, Ordering::SeqCst);
    assert_eq!(kv.get("session").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_invalid_expirations() {
    let (kv, _) = namespace_at(NOW);

    let cases = [
      PutOptions {
        expiration_ttl: Some(0),
        ..Default::default()
      },
      PutOptions {
        expiration_ttl: Some(59),
        ..Default::default()
      },
      PutOptions {
        expiration: Some(NOW),
        ..Default::default()
      },
      PutOptions {
        expiration: Some(NOW + 30),
        ..Default::default()
      },
    ];

    for options in cases {
      let err = kv.put_with("k", "v", options.clone()).await.unwrap_err();
      assert!(
        matches!(err, KvError::Rejected { status: 400, .. }),
        "options {options:?}"
      );
    }

    kv.put_with(
      "k",
      "v",
      PutOptions {
        expiration: Some(NOW + 60),
        ..Default::default()
      },
    )
    .await
    .unwrap();
  }

  #[tokio::test]
  async fn test_list_limits() {
    let kv = KvNamespace::in_memory();

    for limit in [0, 1001] {
      let err = kv
        .list(ListOptions {
          limit: Some(limit),
          ..Default::default()
        })
        .await
        .unwrap_err();
      assert!(matches!(err, KvError::Rejected { status: 400, .. }));
    }

    let err = kv
      .list(ListOptions {
        cursor: Some("not base64!".to_string()),
        ..Default::default()
      })
      .await
      .unwrap_err();
    assert!(matches!(err, KvError::Rejected { status: 400, .. }));
  }

  #[tokio::test]
  async fn test_list_walks_all_pages() {
    let kv = KvNamespace::in_memory();
    for i in 0..7 {
      kv.put(&format!("item:{i}"), "x").await.unwrap();
    }
    kv.put("other", "x").await.unwrap();

    let mut seen = Vec::new();
    let mut cursor = None;
    loop {
      let page = kv
        .list(ListOptions {
          prefix: Some("item:".to_string()),
          limit: Some(3),
          cursor: cursor.take(),
        })
        .await
        .unwrap();
      seen.extend(page.keys.into_iter().map(|k| k.name));
      if page.list_complete {
        break;
      }
      cursor = page.cursor;
    }

    assert_eq!(seen.len(), 7);
    assert!(seen.iter().all(|name| name.starts_with("item:")));
  }
}
