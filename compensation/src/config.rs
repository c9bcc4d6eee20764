use {
    crate::error::CompensationError,
    serde::{Deserialize, Serialize},
};

/// Tunables for the compensation aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationConfig {
    /// How many times a compensation step re-reads the pool after losing a
    /// conditional write before giving up with `PoolUpdateConflict`.
    pub max_update_attempts: u32,

    /// How many times a transient registry failure is retried before the
    /// liquidation is rolled back.
    pub registry_retry_attempts: u32,

    /// Delay between registry retries, in milliseconds.
    pub registry_retry_backoff_ms: u64,

    /// Pause before re-reading a pool another process has parked in
    /// `Liquidating`, in milliseconds.
    pub liquidation_wait_ms: u64,

    /// Number of recently applied request ids remembered per pool.
    /// A replayed request inside this window is answered without mutating
    /// the pool.
    pub dedupe_window: usize,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            max_update_attempts: 5,
            registry_retry_attempts: 3,
            registry_retry_backoff_ms: 200,
            liquidation_wait_ms: 100,
            dedupe_window: 1_024,
        }
    }
}

impl CompensationConfig {
    /// Config with no retry or wait delays, for tests.
    #[cfg(any(test, feature = "dev-context-only-utils"))]
    pub fn dev_default() -> Self {
        Self {
            registry_retry_backoff_ms: 0,
            liquidation_wait_ms: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CompensationError> {
        if self.max_update_attempts == 0 {
            return Err(CompensationError::InvalidConfig {
                reason: "max_update_attempts must be > 0".to_string(),
            });
        }
        if self.registry_retry_attempts == 0 {
            return Err(CompensationError::InvalidConfig {
                reason: "registry_retry_attempts must be > 0".to_string(),
            });
        }
        if self.dedupe_window == 0 {
            return Err(CompensationError::InvalidConfig {
                reason: "dedupe_window must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
