//! Seam to the external carbon registry that records retired tons.
//!
//! The registry is a black box: a liquidation event goes in, a receipt or an
//! error comes out.  Events carry `(project_id, sequence)`, which a registry
//! can use to recognise a re-sent event after a crash between signalling and
//! committing the pool.  A sequence is never reused for a different event,
//! even after a rollback.

use {
    crate::error::RegistryError,
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

/// "Retire `tons` whole tons for `project_id`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationEvent {
    pub project_id: String,
    pub tons: u64,
    /// 1-based, strictly increasing per project.  Rolled-back events leave
    /// gaps.
    pub sequence: u64,
    /// Compensation request whose grams crossed the ton boundary.
    pub request_id: String,
    /// Wallet of the buyer whose grams crossed the ton boundary.
    pub buyer: String,
}

impl LiquidationEvent {
    /// Stable key a registry can deduplicate on.
    pub fn idempotency_key(&self) -> String {
        format!("{}:{}", self.project_id, self.sequence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryReceipt {
    /// Registry-side reference for the retirement.
    pub reference: String,
}

#[async_trait]
pub trait LiquidationRegistry: Send + Sync {
    async fn signal_retirement(
        &self,
        event: &LiquidationEvent,
    ) -> Result<RegistryReceipt, RegistryError>;
}

#[cfg(any(test, feature = "dev-context-only-utils"))]
pub use mock::MockRegistry;

#[cfg(any(test, feature = "dev-context-only-utils"))]
mod mock {
    use {super::*, parking_lot::Mutex, std::collections::VecDeque};

    /// In-process registry that records every accepted event.
    ///
    /// Failures can be queued with [`MockRegistry::fail_next`]; each queued
    /// error is returned once, in order, before calls start succeeding again.
    /// [`MockRegistry::record_then_fail_next`] queues an error returned after
    /// the event was recorded, like a timeout on the way back.
    /// Events with an already-seen idempotency key are acknowledged without
    /// being recorded twice.
    #[derive(Debug, Default)]
    pub struct MockRegistry {
        accepted: Mutex<Vec<LiquidationEvent>>,
        failures: Mutex<VecDeque<(RegistryError, bool)>>,
        calls: Mutex<u64>,
    }

    impl MockRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next(&self, error: RegistryError) {
            self.failures.lock().push_back((error, false));
        }

        pub fn record_then_fail_next(&self, error: RegistryError) {
            self.failures.lock().push_back((error, true));
        }

        pub fn events(&self) -> Vec<LiquidationEvent> {
            self.accepted.lock().clone()
        }

        pub fn total_tons(&self) -> u64 {
            self.accepted.lock().iter().map(|e| e.tons).sum()
        }

        pub fn calls(&self) -> u64 {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl LiquidationRegistry for MockRegistry {
        async fn signal_retirement(
            &self,
            event: &LiquidationEvent,
        ) -> Result<RegistryReceipt, RegistryError> {
            {
                let mut calls = self.calls.lock();
                *calls = calls.saturating_add(1);
            }
            let failure = self.failures.lock().pop_front();
            if let Some((err, false)) = failure {
                return Err(err);
            }
            let key = event.idempotency_key();
            {
                let mut accepted = self.accepted.lock();
                if !accepted.iter().any(|e| e.idempotency_key() == key) {
                    accepted.push(event.clone());
                }
            }
            match failure {
                Some((err, _)) => Err(err),
                None => Ok(RegistryReceipt {
                    reference: format!("ret-{key}"),
                }),
            }
        }
    }
}
