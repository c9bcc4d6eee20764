use serde::{Deserialize, Serialize};

/// Tunables for turning plan prices into settlement quotes.
///
/// The tier thresholds and plan discounts are product rules and live as
/// constants next to the code that applies them.  What varies per
/// deployment is collected here and handed to the pricing entry points at
/// construction time instead of being fetched ad hoc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Wallet that receives every adoption payment.
    pub treasury_wallet: String,

    /// Share of each charge kept by the platform, in percent (0–100).
    /// Informational: the full charge is settled to the treasury and the
    /// split is reported on the quote.
    pub platform_fee_pct: f64,

    /// How long a quote stays valid for checkout, in seconds.
    pub quote_ttl_secs: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            treasury_wallet: "0x0000000000000000000000000000000000000000".to_string(),
            platform_fee_pct: 5.0,
            quote_ttl_secs: 900, // 15 minutes
        }
    }
}
