//! Key-value namespace for resolver contexts.
//!
//! A [`KvNamespace`] validates requests the way the deployed store does
//! (key and value limits, expiration rules, list limits) and delegates
//! storage to a [`KvStorage`] engine. Locally that engine is a
//! [`MemoryStorage`], created fresh for each invocation, so nothing written
//! by one invocation is visible to the next.

mod clock;
mod error;
mod memory;
mod namespace;
mod storage;
mod types;

pub use clock::{Clock, system_clock};
pub use error::KvError;
pub use memory::MemoryStorage;
pub use namespace::KvNamespace;
pub use storage::{KvStorage, StoredValue};
pub use types::{KeyInfo, KvValue, ListOptions, ListResult, PutOptions};
