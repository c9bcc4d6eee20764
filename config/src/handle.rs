use {
    crate::{config::VerdantConfig, error::ConfigError},
    chrono::{DateTime, TimeDelta, Utc},
    log::info,
    parking_lot::RwLock,
    std::sync::Arc,
};

#[derive(Debug)]
struct Loaded {
    config: VerdantConfig,
    loaded_at: DateTime<Utc>,
}

/// Shared, refreshable view of the current [`VerdantConfig`].
///
/// Clones share the same underlying config.  Readers get a snapshot; a
/// refresh replaces the whole config at once, so no reader ever sees a mix
/// of two versions.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Loaded>>,
}

impl ConfigHandle {
    pub fn new(config: VerdantConfig, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Loaded {
                config,
                loaded_at: now,
            })),
        })
    }

    pub fn current(&self) -> VerdantConfig {
        self.inner.read().config.clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.read().config.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.inner.read().loaded_at
    }

    /// Replace the config with `next`, which must validate and carry a
    /// strictly greater version.
    pub fn refresh(&self, next: VerdantConfig, now: DateTime<Utc>) -> Result<(), ConfigError> {
        next.validate()?;
        let mut loaded = self.inner.write();
        if next.version <= loaded.config.version {
            return Err(ConfigError::VersionNotNewer {
                current: loaded.config.version,
                offered: next.version,
            });
        }
        info!(
            "config refreshed: version {} -> {}",
            loaded.config.version, next.version
        );
        *loaded = Loaded {
            config: next,
            loaded_at: now,
        };
        Ok(())
    }

    /// Mark the current config as re-checked without changing it.
    pub fn touch(&self, now: DateTime<Utc>) {
        self.inner.write().loaded_at = now;
    }

    /// True once `refresh_interval_secs` have elapsed since the last load.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        let loaded = self.inner.read();
        let interval = i64::try_from(loaded.config.refresh_interval_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        now.signed_duration_since(loaded.loaded_at) >= interval
    }
}
