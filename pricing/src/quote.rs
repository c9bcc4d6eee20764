//! Price quotes: the charge computed once for display and reused verbatim
//! for settlement.

use {
    crate::{
        calculator::{self, calculate_plan_price, split_platform_fee},
        config::PricingConfig,
        error::PricingError,
        plan::AdoptionPlan,
        tier::{self, Tier},
    },
    chrono::{DateTime, TimeDelta, Utc},
    log::debug,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// A conservation region pixels can be adopted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub country: String,
    pub biome_key: String,
    /// Yearly price per m².
    pub m2_price: f64,
}

impl Region {
    pub fn tier(&self) -> Tier {
        tier::classify(self.m2_price)
    }
}

/// Opaque identifier of a quote, unique per issued quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(String);

impl QuoteId {
    fn random() -> Self {
        Self(format!("q_{:016x}", rand::random::<u64>()))
    }

    /// Rehydrate an id read back from storage.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the buyer is shown before paying, frozen at quote time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub id: QuoteId,
    pub region_id: String,
    pub plan: AdoptionPlan,
    pub tier: Tier,
    pub base_price_per_year: f64,
    /// Final charge, rounded to two decimals.
    pub final_price: f64,
    /// Platform share of `final_price`.
    pub platform_fee: f64,
    /// `final_price - platform_fee`.
    pub net_to_project: f64,
    pub travel_benefit: bool,
    /// Configuration version the quote was priced under.
    pub config_version: u64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Price `plan` for `region` and freeze the result.
    pub fn issue(
        config: &PricingConfig,
        config_version: u64,
        region: &Region,
        plan: &AdoptionPlan,
        now: DateTime<Utc>,
    ) -> Result<Self, PricingError> {
        let final_price = calculate_plan_price(region.m2_price, plan)?;
        let (platform_fee, net_to_project) =
            split_platform_fee(final_price, config.platform_fee_pct);
        let expires_at = i64::try_from(config.quote_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let quote = Self {
            id: QuoteId::random(),
            region_id: region.id.clone(),
            plan: plan.clone(),
            tier: region.tier(),
            base_price_per_year: region.m2_price,
            final_price,
            platform_fee,
            net_to_project,
            travel_benefit: calculator::travel_benefit_unlocked(final_price),
            config_version,
            issued_at: now,
            expires_at,
        };
        debug!(
            "issued quote {} for region {} on {}: {:.2} (tier {})",
            quote.id, quote.region_id, quote.plan.id, quote.final_price, quote.tier
        );
        Ok(quote)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
