//! Tunables for table state and subscriptions.

use ticktab_column_map::StorageBacking;

/// Default bound of the update channel feeding a subscription worker.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Default name of the subscription worker thread.
pub const DEFAULT_THREAD_NAME: &str = "ticktab-subscription";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStateConfig {
    /// Container used by every column store of the table.
    pub backing: StorageBacking,
    /// Check after every update that each column holds one row per key.
    /// On by default in debug builds.
    pub verify_invariants: bool,
}

impl Default for TableStateConfig {
    fn default() -> Self {
        Self {
            backing: StorageBacking::default(),
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl TableStateConfig {
    pub fn with_backing(mut self, backing: StorageBacking) -> Self {
        self.backing = backing;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionConfig {
    /// Bound of the update channel. Senders block once this many updates
    /// are queued; 0 makes every send wait for the worker.
    pub channel_capacity: usize,
    pub thread_name: String,
    pub table: TableStateConfig,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            table: TableStateConfig::default(),
        }
    }
}
