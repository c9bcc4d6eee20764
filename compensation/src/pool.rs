//! Per-project compensation pool state.
//!
//! ```text
//!            grams in, no ton crossed
//!          ┌──────────────────────────┐
//!          ▼                          │
//!   ┌──────────────┐  ton crossed  ┌──┴───────────┐
//!   │ Accumulating │──────────────▶│ Liquidating  │
//!   └──────────────┘               └──────┬───────┘
//!          ▲   registry ok (remainder)    │
//!          │   registry failed (restore)  │
//!          └──────────────────────────────┘
//! ```
//!
//! Every transition returns a new pool with `version + 1`; the store only
//! accepts it if the stored version still equals the one it was derived
//! from.

use {
    crate::registry::LiquidationEvent,
    serde::{Deserialize, Serialize},
    std::collections::VecDeque,
};

/// Grams of CO2 in one metric ton.
pub const GRAMS_PER_TON: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolStatus {
    #[default]
    Accumulating,
    Liquidating,
}

/// Outcome of adding `grams` to a pool holding `pool_grams`.
///
/// `compute` returns `None` when the sum does not fit in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompensationStep {
    /// `pool_grams + grams`.
    pub new_total: u64,
    /// Whole tons contained in `new_total`.
    pub tons: u64,
    /// `new_total` with the whole tons removed.
    pub remainder: u64,
}

impl CompensationStep {
    pub fn compute(pool_grams: u64, grams: u64) -> Option<Self> {
        let new_total = pool_grams.checked_add(grams)?;
        Some(Self {
            new_total,
            tons: new_total / GRAMS_PER_TON,
            remainder: new_total % GRAMS_PER_TON,
        })
    }

    /// Grams still missing before the next whole ton.
    pub fn next_milestone(&self) -> u64 {
        GRAMS_PER_TON.saturating_sub(self.remainder)
    }
}

/// A liquidation that has been reserved in the store but not yet confirmed
/// by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLiquidation {
    pub event: LiquidationEvent,
    /// Grams the request added.
    pub grams: u64,
    /// Pool balance once the event is confirmed.
    pub remainder: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationPool {
    pub project_id: String,
    /// Un-liquidated grams. Always below [`GRAMS_PER_TON`] once settled.
    pub pool_grams: u64,
    /// Every gram ever recorded. Never decreases.
    pub lifetime_grams: u64,
    /// Whole tons signalled to the registry. Never decreases.
    pub tons_liquidated: u64,
    /// Number of liquidation events committed.
    pub liquidation_count: u64,
    /// Highest event sequence ever reserved, committed or not.  Rolled-back
    /// events keep their number, so a sequence is never handed out twice.
    #[serde(default)]
    pub last_sequence: u64,
    pub status: PoolStatus,
    pub pending: Option<PendingLiquidation>,
    /// Optimistic-concurrency counter; 0 means never written.
    pub version: u64,
    /// Request ids applied most recently, oldest first.
    pub recent_requests: VecDeque<String>,
}

impl CompensationPool {
    /// An empty pool for a project that has never been compensated.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            pool_grams: 0,
            lifetime_grams: 0,
            tons_liquidated: 0,
            liquidation_count: 0,
            last_sequence: 0,
            status: PoolStatus::Accumulating,
            pending: None,
            version: 0,
            recent_requests: VecDeque::new(),
        }
    }

    pub fn has_applied(&self, request_id: &str) -> bool {
        self.recent_requests.iter().any(|id| id == request_id)
    }

    /// Grams still missing before the next whole ton.
    pub fn next_milestone(&self) -> u64 {
        GRAMS_PER_TON.saturating_sub(self.pool_grams % GRAMS_PER_TON)
    }

    /// Sequence number for the next liquidation event.
    pub fn next_sequence(&self) -> u64 {
        self.last_sequence.max(self.liquidation_count).saturating_add(1)
    }

    /// Add grams that do not complete a ton.
    pub fn accumulate(
        &self,
        step: &CompensationStep,
        grams: u64,
        request_id: &str,
        window: usize,
    ) -> Self {
        debug_assert_eq!(step.tons, 0);
        let mut next = self.bumped();
        next.pool_grams = step.new_total;
        next.lifetime_grams = self.lifetime_grams.saturating_add(grams);
        next.remember(request_id, window);
        next
    }

    /// Park the pool in `Liquidating` while the registry is signalled.
    /// Balances are untouched until [`Self::complete_liquidation`].
    pub fn reserve_liquidation(&self, pending: PendingLiquidation) -> Self {
        let mut next = self.bumped();
        next.status = PoolStatus::Liquidating;
        next.last_sequence = self.last_sequence.max(pending.event.sequence);
        next.pending = Some(pending);
        next
    }

    /// Commit the pending liquidation: retire its tons and keep the remainder.
    /// Returns `None` when nothing is pending.
    pub fn complete_liquidation(&self, window: usize) -> Option<Self> {
        let pending = self.pending.as_ref()?;
        let mut next = self.bumped();
        next.pool_grams = pending.remainder;
        next.lifetime_grams = self.lifetime_grams.saturating_add(pending.grams);
        next.tons_liquidated = self.tons_liquidated.saturating_add(pending.event.tons);
        next.liquidation_count = self.liquidation_count.saturating_add(1);
        next.status = PoolStatus::Accumulating;
        next.pending = None;
        next.remember(&pending.event.request_id, window);
        Some(next)
    }

    /// Drop the pending liquidation and return to the pre-reservation
    /// balances.  `last_sequence` is kept.
    pub fn abandon_liquidation(&self) -> Self {
        let mut next = self.bumped();
        next.status = PoolStatus::Accumulating;
        next.pending = None;
        next
    }

    fn bumped(&self) -> Self {
        let mut next = self.clone();
        next.version = self.version.saturating_add(1);
        next
    }

    fn remember(&mut self, request_id: &str, window: usize) {
        self.recent_requests.push_back(request_id.to_string());
        while self.recent_requests.len() > window {
            self.recent_requests.pop_front();
        }
    }
}
