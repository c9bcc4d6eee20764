//! The permanent record of one paid adoption.

use {
    crate::ids::{PixelId, TxHash, WalletAddress},
    chrono::{DateTime, Months, Utc},
    serde::{Deserialize, Serialize},
    verdant_pricing::{PlanDuration, QuoteId},
};

/// Created once the payment is confirmed; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelAdoption {
    pub pixel_id: PixelId,
    pub region_id: String,
    pub buyer: WalletAddress,
    pub plan_id: String,
    /// Local-currency charge, as quoted.
    pub final_price: f64,
    /// Native-token amount actually transferred.
    pub amount_native: f64,
    pub duration: PlanDuration,
    pub adopted_at: DateTime<Utc>,
    /// `None` for perpetual adoptions.
    pub expires_at: Option<DateTime<Utc>>,
    pub tx_hash: TxHash,
    pub quote_id: QuoteId,
    pub config_version: u64,
}

impl PixelAdoption {
    pub fn is_perpetual(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Active from `adopted_at` until (excluding) `expires_at`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now >= self.adopted_at && self.expires_at.is_none_or(|end| now < end)
    }
}

/// End of an adoption starting at `start`, counted in calendar months
/// (Jan 31 + 1 month = Feb 28/29).  Saturates at the latest representable
/// instant.
pub fn expiration(start: DateTime<Utc>, duration: PlanDuration) -> Option<DateTime<Utc>> {
    match duration {
        PlanDuration::Perpetual => None,
        PlanDuration::Months(months) => Some(
            start
                .checked_add_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        ),
    }
}
