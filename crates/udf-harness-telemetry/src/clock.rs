/// Wall clock time in milliseconds since the unix epoch.
pub fn now_millis() -> u64 {
  u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
