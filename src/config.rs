//! Search budgets and engine tuning.

use std::time::Duration;

/// Default cap on the number of candidates a single search may enumerate.
pub const DEFAULT_MAX_KEYSPACE: u64 = 1 << 40;

/// Default number of candidates a worker tests between wall-clock checks.
pub const DEFAULT_BUDGET_CHECK_INTERVAL: u64 = 1_000;

/// Default upper bound on worker threads.
pub const DEFAULT_MAX_THREADS: usize = 256;

/// Caller-supplied bounds on a single search. Unset bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of oracle calls.
    pub max_attempts: Option<u64>,
    /// Maximum wall-clock time since the search started.
    pub max_duration: Option<Duration>,
}

impl SearchBudget {
    /// A budget with neither bound set.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cap the number of oracle calls (builder pattern).
    pub fn with_max_attempts(mut self, attempts: u64) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Cap wall-clock time (builder pattern).
    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.max_duration.is_none()
    }
}

/// Engine tuning parameters shared by every search run through a
/// [`crate::Searcher`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Largest keyspace accepted before any worker starts (default: 2^40).
    pub max_keyspace: u64,

    /// Candidates tested between wall-clock checks (default: 1,000).
    ///
    /// Progress is also flushed at this granularity.
    pub budget_check_interval: u64,

    /// Upper bound on pool threads (default: 256).
    ///
    /// Requested concurrency above this still partitions into that many
    /// ranges; the surplus ranges queue on the pool.
    pub max_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_keyspace: DEFAULT_MAX_KEYSPACE,
            budget_check_interval: DEFAULT_BUDGET_CHECK_INTERVAL,
            max_threads: DEFAULT_MAX_THREADS,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyspace cap (builder pattern).
    pub fn with_max_keyspace(mut self, limit: u64) -> Self {
        self.max_keyspace = limit;
        self
    }

    /// Set the budget check interval (builder pattern).
    pub fn with_budget_check_interval(mut self, interval: u64) -> Self {
        self.budget_check_interval = interval;
        self
    }

    /// Set the thread cap (builder pattern).
    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget_check_interval == 0 {
            return Err(ConfigError::ZeroBudgetCheckInterval);
        }
        if self.max_threads == 0 {
            return Err(ConfigError::ZeroMaxThreads);
        }
        Ok(())
    }
}

/// Engine configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("budget check interval must be at least 1")]
    ZeroBudgetCheckInterval,

    #[error("max threads must be at least 1")]
    ZeroMaxThreads,
}
