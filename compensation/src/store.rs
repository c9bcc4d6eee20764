//! Pool persistence.
//!
//! One row per project, updated only through a version-checked conditional
//! write.  Application code never overwrites a pool it has not just read.

use {
    crate::{error::StoreError, pool::CompensationPool},
    dashmap::{mapref::entry::Entry, DashMap},
};

pub trait PoolStore: Send + Sync {
    /// Current pool for `project_id`; a fresh version-0 pool if the project
    /// has never been written.
    fn load(&self, project_id: &str) -> Result<CompensationPool, StoreError>;

    /// Store `pool` only if the stored version still equals
    /// `expected_version` (0 for a project with no row yet).
    fn compare_and_swap(
        &self,
        expected_version: u64,
        pool: CompensationPool,
    ) -> Result<(), StoreError>;
}

/// Process-local store.  The check and the write happen under the map's
/// per-key entry lock.
#[derive(Debug, Default)]
pub struct InMemoryPoolStore {
    pools: DashMap<String, CompensationPool>,
}

impl InMemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl PoolStore for InMemoryPoolStore {
    fn load(&self, project_id: &str) -> Result<CompensationPool, StoreError> {
        Ok(self
            .pools
            .get(project_id)
            .map(|pool| pool.clone())
            .unwrap_or_else(|| CompensationPool::new(project_id)))
    }

    fn compare_and_swap(
        &self,
        expected_version: u64,
        pool: CompensationPool,
    ) -> Result<(), StoreError> {
        match self.pools.entry(pool.project_id.clone()) {
            Entry::Occupied(mut stored) => {
                let actual = stored.get().version;
                if actual != expected_version {
                    return Err(StoreError::VersionConflict {
                        project_id: pool.project_id,
                        expected: expected_version,
                        actual,
                    });
                }
                stored.insert(pool);
            }
            Entry::Vacant(slot) => {
                if expected_version != 0 {
                    return Err(StoreError::VersionConflict {
                        project_id: pool.project_id,
                        expected: expected_version,
                        actual: 0,
                    });
                }
                slot.insert(pool);
            }
        }
        Ok(())
    }
}
