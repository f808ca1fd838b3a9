use std::time::Duration;

/// Run configuration, built once from validated CLI input and immutable
/// for the lifetime of the monitoring loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Exact process name to match (not a substring).
    pub process_name: String,
    /// Lifetime ceiling in minutes; instances strictly above it are killed.
    pub max_lifetime_minutes: u64,
    /// Pause between poll cycles.
    pub poll_interval: Duration,
}

impl MonitorConfig {
    /// Build a config from CLI values. The monitoring frequency arrives in
    /// minutes and is converted to milliseconds here.
    pub fn new(
        process_name: impl Into<String>,
        max_lifetime_minutes: u64,
        frequency_minutes: u64,
    ) -> Self {
        Self {
            process_name: process_name.into(),
            max_lifetime_minutes,
            poll_interval: Duration::from_millis(frequency_minutes.saturating_mul(60_000)),
        }
    }
}
