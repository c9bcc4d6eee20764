//! Seam to the on-chain payment provider.

use {
    crate::{
        error::SettlementError,
        ids::{TxHash, WalletAddress},
    },
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    verdant_pricing::QuoteId,
};

/// Move `amount_native` tokens from the buyer to the treasury.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub quote_id: QuoteId,
    pub from: WalletAddress,
    pub to: WalletAddress,
    pub amount_native: f64,
}

#[async_trait]
pub trait Settlement: Send + Sync {
    /// Submit the transfer and wait for it to be confirmed.
    async fn transfer(&self, request: &TransferRequest) -> Result<TxHash, SettlementError>;
}

#[cfg(any(test, feature = "dev-context-only-utils"))]
pub use mock::MockSettlement;

#[cfg(any(test, feature = "dev-context-only-utils"))]
mod mock {
    use {super::*, parking_lot::Mutex, std::collections::VecDeque};

    /// Records every transfer it is asked for. Queued failures are returned
    /// first; after that transfers succeed with sequential hashes.
    #[derive(Debug, Default)]
    pub struct MockSettlement {
        transfers: Mutex<Vec<TransferRequest>>,
        failures: Mutex<VecDeque<SettlementError>>,
    }

    impl MockSettlement {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next(&self, error: SettlementError) {
            self.failures.lock().push_back(error);
        }

        /// Every request received, including failed ones.
        pub fn transfers(&self) -> Vec<TransferRequest> {
            self.transfers.lock().clone()
        }
    }

    #[async_trait]
    impl Settlement for MockSettlement {
        async fn transfer(&self, request: &TransferRequest) -> Result<TxHash, SettlementError> {
            let mut transfers = self.transfers.lock();
            transfers.push(request.clone());
            if let Some(err) = self.failures.lock().pop_front() {
                return Err(err);
            }
            Ok(TxHash(format!("0x{:064x}", transfers.len())))
        }
    }
}
