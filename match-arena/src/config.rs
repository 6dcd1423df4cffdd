//! Configuration for a match runner

/// Main configuration for a MatchRunner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Ticks per second used when the handler's setup does not specify
    /// a positive tick rate
    pub default_tick_rate: u32,

    /// Grace period in seconds passed to terminate() when the match is
    /// stopped through its handle
    pub stop_grace_seconds: u64,

    /// Maximum number of inbound messages buffered between two ticks.
    /// Messages beyond this bound are dropped with a warning.
    pub max_queued_messages: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_tick_rate: 1,
            stop_grace_seconds: 0,
            max_queued_messages: 256,
        }
    }
}
