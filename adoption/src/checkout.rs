//! Quote-then-pay flow.
//!
//! The price shown to the buyer is computed once, frozen in a
//! [`PriceQuote`] together with the exchange rates of that moment, and the
//! very same numbers are charged at checkout.  Nothing is re-priced between
//! display and payment.

use {
    crate::{
        error::AdoptionError,
        ids::{PixelId, WalletAddress},
        ledger::AdoptionLedger,
        record::{expiration, PixelAdoption},
        settlement::{Settlement, TransferRequest},
    },
    chrono::{DateTime, Utc},
    log::{error, info, warn},
    parking_lot::Mutex,
    serde::Serialize,
    std::{collections::HashMap, sync::Arc},
    verdant_config::ConfigHandle,
    verdant_price_oracle::{PriceOracle, RateSnapshot},
    verdant_pricing::{AdoptionPlan, PriceQuote, QuoteId, Region},
};

/// A quote plus the rates it will be settled at.
///
/// Only [`CheckoutService::quote`] builds one, so the native amount always
/// matches the quote it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutQuote {
    quote: PriceQuote,
    rates: RateSnapshot,
    amount_native: f64,
}

impl CheckoutQuote {
    pub fn quote(&self) -> &PriceQuote {
        &self.quote
    }

    pub fn rates(&self) -> &RateSnapshot {
        &self.rates
    }

    /// `quote.final_price` in native-token units at `rates`.  This is the
    /// amount checkout submits.
    pub fn amount_native(&self) -> f64 {
        self.amount_native
    }
}

pub struct CheckoutService {
    config: ConfigHandle,
    oracle: Arc<PriceOracle>,
    settlement: Arc<dyn Settlement>,
    ledger: Arc<dyn AdoptionLedger>,
    /// Quotes with a settled or in-flight payment, with their expiry.
    /// Expired entries are swept on the next claim.
    claimed: Mutex<HashMap<QuoteId, DateTime<Utc>>>,
}

impl CheckoutService {
    pub fn new(
        config: ConfigHandle,
        oracle: Arc<PriceOracle>,
        settlement: Arc<dyn Settlement>,
        ledger: Arc<dyn AdoptionLedger>,
    ) -> Self {
        Self {
            config,
            oracle,
            settlement,
            ledger,
            claimed: Mutex::new(HashMap::new()),
        }
    }

    /// Price `plan` for `region` under the current config and capture the
    /// exchange rates to settle it at.
    pub async fn quote(
        &self,
        region: &Region,
        plan: &AdoptionPlan,
        now: DateTime<Utc>,
    ) -> Result<CheckoutQuote, AdoptionError> {
        let config = self.config.current();
        let quote = PriceQuote::issue(&config.pricing, config.version, region, plan, now)?;
        let rates = self.oracle.snapshot().await;
        if rates.is_degraded() {
            warn!("quote {} priced with fallback exchange rates", quote.id);
        }
        let amount_native = rates.local_to_native(quote.final_price);
        Ok(CheckoutQuote {
            quote,
            rates,
            amount_native,
        })
    }

    /// Settle `quoted` for `buyer` and record the adoption of `pixel`.
    ///
    /// A quote is settled at most once.  If the transfer fails, nothing is
    /// recorded and the quote may be retried.
    pub async fn checkout(
        &self,
        quoted: &CheckoutQuote,
        pixel: PixelId,
        buyer: WalletAddress,
        now: DateTime<Utc>,
    ) -> Result<PixelAdoption, AdoptionError> {
        let quote = &quoted.quote;
        if quote.is_expired(now) {
            return Err(AdoptionError::QuoteExpired {
                quote_id: quote.id.clone(),
                expired_at: quote.expires_at,
            });
        }
        let config = self.config.current();
        if quote.config_version != config.version {
            return Err(AdoptionError::StaleQuote {
                quote_version: quote.config_version,
                current_version: config.version,
            });
        }
        let treasury = WalletAddress::parse(&config.pricing.treasury_wallet)?;
        let amount_native = quoted.amount_native;
        if !amount_native.is_finite() || amount_native < 0.0 {
            return Err(AdoptionError::InvalidAmount {
                amount: amount_native,
            });
        }

        if !self.claim(quote, now) {
            return Err(AdoptionError::QuoteAlreadySettled(quote.id.clone()));
        }

        let request = TransferRequest {
            quote_id: quote.id.clone(),
            from: buyer.clone(),
            to: treasury,
            amount_native,
        };
        let tx_hash = match self.settlement.transfer(&request).await {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                self.claimed.lock().remove(&quote.id);
                warn!("settlement of quote {} failed: {}", quote.id, err);
                return Err(AdoptionError::SettlementFailed {
                    reason: err.reason().to_string(),
                });
            }
        };

        let adoption = PixelAdoption {
            pixel_id: pixel,
            region_id: quote.region_id.clone(),
            buyer,
            plan_id: quote.plan.id.clone(),
            final_price: quote.final_price,
            amount_native,
            duration: quote.plan.duration,
            adopted_at: now,
            expires_at: expiration(now, quote.plan.duration),
            tx_hash,
            quote_id: quote.id.clone(),
            config_version: quote.config_version,
        };
        if let Err(err) = self.ledger.append(adoption.clone()) {
            // Paid but not recorded; the claim stays so the quote cannot be
            // charged again.
            error!(
                "quote {} settled in {} but ledger append failed: {}",
                quote.id, adoption.tx_hash, err
            );
            return Err(err);
        }
        info!(
            "pixel {} adopted by {} on {} ({:.2} local, {} native, tx {})",
            adoption.pixel_id,
            adoption.buyer,
            adoption.plan_id,
            adoption.final_price,
            adoption.amount_native,
            adoption.tx_hash
        );
        Ok(adoption)
    }

    /// Whether a live quote has a settled or in-flight payment.
    pub fn is_settled(&self, quote_id: &QuoteId) -> bool {
        self.claimed.lock().contains_key(quote_id)
    }

    /// Number of quotes currently held as claimed.
    pub fn claimed_count(&self) -> usize {
        self.claimed.lock().len()
    }

    /// Claim `quote` for settlement, dropping claims on quotes that have
    /// expired.  An expired quote is refused before it is claimed, so its id
    /// is no longer needed for deduplication.
    fn claim(&self, quote: &PriceQuote, now: DateTime<Utc>) -> bool {
        let mut claimed = self.claimed.lock();
        claimed.retain(|_, expires_at| now < *expires_at);
        if claimed.contains_key(&quote.id) {
            return false;
        }
        claimed.insert(quote.id.clone(), quote.expires_at);
        true
    }
}
