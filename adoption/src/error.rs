use {
    crate::ids::TxHash,
    chrono::{DateTime, Utc},
    thiserror::Error,
    verdant_pricing::{PricingError, QuoteId},
};

/// Errors surfaced by the adoption ledger and checkout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdoptionError {
    #[error("invalid wallet address: {0:?}")]
    InvalidWallet(String),

    #[error("pixel id must not be empty")]
    InvalidPixel,

    #[error("quote {quote_id} expired at {expired_at}")]
    QuoteExpired {
        quote_id: QuoteId,
        expired_at: DateTime<Utc>,
    },

    /// The quote was priced under a config revision that is no longer live.
    #[error("quote priced under config version {quote_version}, current is {current_version}")]
    StaleQuote {
        quote_version: u64,
        current_version: u64,
    },

    /// The quote has already been paid for, or a payment for it is in flight.
    #[error("quote {0} already settled")]
    QuoteAlreadySettled(QuoteId),

    /// The converted amount cannot be transferred.
    #[error("cannot settle {amount} native units")]
    InvalidAmount { amount: f64 },

    /// The settlement provider refused or failed the transfer. `reason` is
    /// the provider's own message, shown to the buyer verbatim.
    #[error("settlement failed: {reason}")]
    SettlementFailed { reason: String },

    #[error("transaction {0} already recorded")]
    DuplicateTransaction(TxHash),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Errors returned by a [`crate::settlement::Settlement`] provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// The transaction was mined but reverted.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// The wallet or provider declined to send it.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("settlement provider unavailable: {0}")]
    Unavailable(String),
}

impl SettlementError {
    /// The provider's raw message.
    pub fn reason(&self) -> &str {
        match self {
            Self::Reverted(reason) | Self::Rejected(reason) | Self::Unavailable(reason) => reason,
        }
    }
}
