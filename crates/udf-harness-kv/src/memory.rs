use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::clock::{Clock, system_clock};
use crate::storage::{KvStorage, StoredValue};
use crate::types::{KeyInfo, ListOptions, ListResult};

pub(crate) const MAX_LIST_KEYS: usize = 1000;

/// In-memory storage engine.
///
/// Entries live in a sorted map, so listing is already in key order.
/// Expired entries are dropped lazily, whenever they are read or listed.
pub struct MemoryStorage {
  entries: Mutex<BTreeMap<String, StoredValue>>,
  clock: Clock,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::with_clock(system_clock())
  }

  pub fn with_clock(clock: Clock) -> Self {
    Self {
      entries: Mutex::new(BTreeMap::new()),
      clock,
    }
  }

  fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StoredValue>> {
    self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  fn now(&self) -> u64 {
    (self.clock)()
  }
}

impl Default for MemoryStorage {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for MemoryStorage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MemoryStorage")
      .field("entries", &self.lock().len())
      .finish_non_exhaustive()
  }
}

fn is_expired(value: &StoredValue, now: u64) -> bool {
  value.expiration.is_some_and(|expiration| expiration <= now)
}

pub(crate) fn encode_cursor(key: &str) -> String {
  STANDARD.encode(key)
}

pub(crate) fn decode_cursor(cursor: &str) -> Option<String> {
  let bytes = STANDARD.decode(cursor).ok()?;
  String::from_utf8(bytes).ok()
}

#[async_trait]
impl KvStorage for MemoryStorage {
  async fn get(&self, key: &str) -> Option<StoredValue> {
    let now = self.now();
    let mut entries = self.lock();

    if entries.get(key).is_some_and(|value| is_expired(value, now)) {
      entries.remove(key);
      return None;
    }

    entries.get(key).cloned()
  }

  async fn put(&self, key: &str, value: StoredValue) {
    self.lock().insert(key.to_string(), value);
  }

  async fn delete(&self, key: &str) -> bool {
    let now = self.now();
    match self.lock().remove(key) {
      Some(value) => !is_expired(&value, now),
      None => false,
    }
  }

  async fn list(&self, options: &ListOptions) -> ListResult {
    let now = self.now();
    let mut entries = self.lock();
    entries.retain(|_, value| !is_expired(value, now));

    let prefix = options.prefix.as_deref().unwrap_or_default();
    let start_after = options.cursor.as_deref().and_then(decode_cursor);
    let limit = options.limit.unwrap_or(MAX_LIST_KEYS);

    let mut matching = entries
      .iter()
      .filter(|(name, _)| name.starts_with(prefix))
      .filter(|(name, _)| {
        start_after
          .as_deref()
          .is_none_or(|after| name.as_str() > after)
      });

    let keys: Vec<KeyInfo> = matching
      .by_ref()
      .take(limit)
      .map(|(name, value)| KeyInfo {
        name: name.clone(),
        expiration: value.expiration,
        metadata: value.metadata.clone(),
      })
      .collect();

    let cursor = if matching.next().is_some() {
      keys.last().map(|key| encode_cursor(&key.name))
    } else {
      None
    };

    ListResult {
      keys,
      list_complete: cursor.is_none(),
      cursor,
    }
  }
}
