use std::sync::Arc;

/// Source of the current time in whole seconds since the unix epoch.
///
/// Expiration is expressed in seconds, matching the deployed store.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub fn system_clock() -> Clock {
  Arc::new(|| u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default())
}
