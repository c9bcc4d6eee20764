//! Micro-compensation aggregation.
//!
//! Each purchase offsets a few grams of CO2 for a project.  Grams pile up
//! in the project's pool; whenever the pool reaches a whole ton the tons are
//! signalled to the registry and removed from the pool, leaving the
//! remainder to keep accumulating.
//!
//! A compensation step is one atomic unit:
//!
//! 1. read the pool (and answer replays from the request window),
//! 2. below a ton: conditional write of the new balance, done;
//! 3. at or above a ton: conditional write that parks the pool in
//!    `Liquidating`, signal the registry, then conditional write of the
//!    remainder — or, if the registry fails, of the original balance.
//!
//! Steps for the same project are serialised inside one aggregator by a
//! per-project async lock.  A pool parked in `Liquidating` by another
//! process makes writers wait `liquidation_wait_ms` and re-read, so mass is
//! never double-counted and already-retired tons are never re-signalled.

use {
    crate::{
        config::CompensationConfig,
        error::{CompensationError, RegistryError, Result, StoreError},
        pool::{CompensationPool, CompensationStep, PendingLiquidation, PoolStatus},
        registry::{LiquidationEvent, LiquidationRegistry, RegistryReceipt},
        store::PoolStore,
    },
    dashmap::DashMap,
    log::{debug, error, info, warn},
    serde::{Deserialize, Serialize},
    std::{sync::Arc, time::Duration},
    tokio::sync::Mutex,
};

/// One micro-compensation to fold into a project's pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationRequest {
    /// Caller-chosen id, unique per compensation. Replays with the same id
    /// are answered without touching the pool.
    pub request_id: String,
    pub project_id: String,
    pub grams: u64,
    /// Buyer wallet, carried into the liquidation event.
    pub buyer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompensationStatus {
    /// Grams were added; no ton boundary was crossed.
    Accumulating,
    /// Grams were added and whole tons were retired.
    Liquidated,
    /// The request had already been applied; nothing changed.
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationOutcome {
    pub project_id: String,
    /// Un-liquidated grams after this step.
    pub pool_grams: u64,
    pub lifetime_grams: u64,
    /// Grams until the next whole ton.
    pub next_milestone_grams: u64,
    /// Tons retired by this step (0 unless `Liquidated`).
    pub tons_liquidated: u64,
    pub status: CompensationStatus,
    /// Registry reference when `Liquidated`.
    pub registry_reference: Option<String>,
}

impl CompensationOutcome {
    fn from_pool(pool: &CompensationPool, status: CompensationStatus) -> Self {
        Self {
            project_id: pool.project_id.clone(),
            pool_grams: pool.pool_grams,
            lifetime_grams: pool.lifetime_grams,
            next_milestone_grams: pool.next_milestone(),
            tons_liquidated: 0,
            status,
            registry_reference: None,
        }
    }
}

pub struct CompensationAggregator {
    store: Arc<dyn PoolStore>,
    registry: Arc<dyn LiquidationRegistry>,
    config: CompensationConfig,
    project_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CompensationAggregator {
    pub fn new(
        store: Arc<dyn PoolStore>,
        registry: Arc<dyn LiquidationRegistry>,
        config: CompensationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            registry,
            config,
            project_locks: DashMap::new(),
        })
    }

    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    /// Snapshot of a project's pool.
    pub fn pool(&self, project_id: &str) -> Result<CompensationPool> {
        Ok(self.store.load(project_id)?)
    }

    /// Fold `request.grams` into the project's pool, liquidating whole tons.
    pub async fn record_compensation(
        &self,
        request: &CompensationRequest,
    ) -> Result<CompensationOutcome> {
        if request.grams == 0 {
            return Err(CompensationError::InvalidGrams);
        }
        let lock = self.project_lock(&request.project_id);
        let _serialised = lock.lock().await;

        for attempt in 1..=self.config.max_update_attempts {
            let pool = self.store.load(&request.project_id)?;

            if pool.has_applied(&request.request_id) {
                debug!(
                    "request {} already applied to project {}",
                    request.request_id, request.project_id
                );
                return Ok(CompensationOutcome::from_pool(
                    &pool,
                    CompensationStatus::Duplicate,
                ));
            }

            if pool.status == PoolStatus::Liquidating {
                debug!(
                    "project {} is mid-liquidation (attempt {}/{})",
                    request.project_id, attempt, self.config.max_update_attempts
                );
                self.wait_for_liquidation().await;
                continue;
            }

            let Some(step) = CompensationStep::compute(pool.pool_grams, request.grams)
                .filter(|_| pool.lifetime_grams.checked_add(request.grams).is_some())
            else {
                return Err(CompensationError::Overflow {
                    project_id: request.project_id.clone(),
                    grams: request.grams,
                });
            };

            if step.tons == 0 {
                let next = pool.accumulate(
                    &step,
                    request.grams,
                    &request.request_id,
                    self.config.dedupe_window,
                );
                match self.store.compare_and_swap(pool.version, next.clone()) {
                    Ok(()) => {
                        debug!(
                            "project {}: +{} g → {} g ({} g to next ton)",
                            request.project_id,
                            request.grams,
                            next.pool_grams,
                            next.next_milestone()
                        );
                        return Ok(CompensationOutcome::from_pool(
                            &next,
                            CompensationStatus::Accumulating,
                        ));
                    }
                    Err(StoreError::VersionConflict { .. }) => {
                        debug!(
                            "lost pool write race on project {} (attempt {})",
                            request.project_id, attempt
                        );
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            let pending = PendingLiquidation {
                event: LiquidationEvent {
                    project_id: request.project_id.clone(),
                    tons: step.tons,
                    sequence: pool.next_sequence(),
                    request_id: request.request_id.clone(),
                    buyer: request.buyer.clone(),
                },
                grams: request.grams,
                remainder: step.remainder,
            };
            let reserved = pool.reserve_liquidation(pending);
            match self.store.compare_and_swap(pool.version, reserved.clone()) {
                Ok(()) => return self.liquidate(reserved).await,
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(
                        "lost liquidation reservation race on project {} (attempt {})",
                        request.project_id, attempt
                    );
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            "giving up on request {} for project {} after {} attempts",
            request.request_id, request.project_id, self.config.max_update_attempts
        );
        Err(CompensationError::PoolUpdateConflict {
            project_id: request.project_id.clone(),
            attempts: self.config.max_update_attempts,
        })
    }

    /// Finish a liquidation left pending by an interrupted step.
    ///
    /// Re-signals the pending event (the registry sees the same sequence
    /// number) and commits the remainder.  Returns `None` if the pool has
    /// nothing pending.
    pub async fn resume_pending(&self, project_id: &str) -> Result<Option<CompensationOutcome>> {
        let lock = self.project_lock(project_id);
        let _serialised = lock.lock().await;
        let pool = self.store.load(project_id)?;
        if pool.status != PoolStatus::Liquidating || pool.pending.is_none() {
            return Ok(None);
        }
        info!("resuming pending liquidation for project {project_id}");
        self.liquidate(pool).await.map(Some)
    }

    /// Signal the registry for a pool this caller has reserved, then commit
    /// or roll back.
    async fn liquidate(&self, reserved: CompensationPool) -> Result<CompensationOutcome> {
        let Some(pending) = reserved.pending.clone() else {
            return Ok(CompensationOutcome::from_pool(
                &reserved,
                CompensationStatus::Accumulating,
            ));
        };
        let event = pending.event;

        match self.signal_with_retry(&event).await {
            Ok(receipt) => {
                let Some(settled) = reserved.complete_liquidation(self.config.dedupe_window)
                else {
                    return Err(StoreError::Backend("pending liquidation vanished".to_string()).into());
                };
                if let Err(err) = self.store.compare_and_swap(reserved.version, settled.clone()) {
                    // The registry already has the event; the pool stays
                    // parked so `resume_pending` can commit it.
                    error!(
                        "project {}: {} t retired (ref {}) but pool commit failed: {}",
                        event.project_id, event.tons, receipt.reference, err
                    );
                    return Err(err.into());
                }
                info!(
                    "project {}: liquidated {} t (seq {}, ref {}), {} g carried over",
                    event.project_id,
                    event.tons,
                    event.sequence,
                    receipt.reference,
                    settled.pool_grams
                );
                Ok(CompensationOutcome {
                    tons_liquidated: event.tons,
                    registry_reference: Some(receipt.reference),
                    ..CompensationOutcome::from_pool(&settled, CompensationStatus::Liquidated)
                })
            }
            Err(registry_err) => {
                let restored = reserved.abandon_liquidation();
                if let Err(store_err) = self.store.compare_and_swap(reserved.version, restored) {
                    // Still parked; `resume_pending` re-signals the same event.
                    error!(
                        "project {}: liquidation of {} t failed ({}) and rollback failed: {}",
                        event.project_id, event.tons, registry_err, store_err
                    );
                    return Err(store_err.into());
                }
                warn!(
                    "project {}: liquidation of {} t rolled back: {}",
                    event.project_id, event.tons, registry_err
                );
                Err(match registry_err {
                    RegistryError::Unreachable(reason) => {
                        CompensationError::RegistryUnreachable(reason)
                    }
                    RegistryError::Rejected(reason) => CompensationError::LiquidationFailed {
                        project_id: event.project_id,
                        tons: event.tons,
                        reason,
                    },
                })
            }
        }
    }

    fn project_lock(&self, project_id: &str) -> Arc<Mutex<()>> {
        self.project_locks
            .entry(project_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    async fn wait_for_liquidation(&self) {
        match self.config.liquidation_wait_ms {
            0 => tokio::task::yield_now().await,
            ms => tokio::time::sleep(Duration::from_millis(ms)).await,
        }
    }

    async fn signal_with_retry(
        &self,
        event: &LiquidationEvent,
    ) -> std::result::Result<RegistryReceipt, RegistryError> {
        let attempts = self.config.registry_retry_attempts.max(1);
        let backoff = Duration::from_millis(self.config.registry_retry_backoff_ms);
        let mut attempt = 1;
        loop {
            match self.registry.signal_retirement(event).await {
                Ok(receipt) => return Ok(receipt),
                Err(RegistryError::Unreachable(reason)) if attempt < attempts => {
                    warn!(
                        "registry unreachable for {} (attempt {}/{}): {}",
                        event.idempotency_key(),
                        attempt,
                        attempts,
                        reason
                    );
                    attempt = attempt.saturating_add(1);
                    if !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}
