//! Intake for the CO2 payment provider's callback.
//!
//! The provider posts one JSON document per settled micro-payment:
//!
//! ```json
//! {
//!   "event_id": "evt_81f2",
//!   "project_id": "mangrove-07",
//!   "grams_co2": 1250,
//!   "buyer_wallet": "0x…"
//! }
//! ```
//!
//! Older payloads report `kg_co2` (decimal kilograms) instead of
//! `grams_co2`.  The provider's `event_id` becomes the request id, so a
//! webhook delivered twice is applied once.

use {
    crate::{aggregator::CompensationRequest, error::CompensationError},
    serde::Deserialize,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompensationWebhook {
    pub event_id: String,
    pub project_id: String,
    #[serde(default)]
    pub grams_co2: Option<u64>,
    #[serde(default)]
    pub kg_co2: Option<f64>,
    pub buyer_wallet: String,
}

impl CompensationWebhook {
    pub fn parse(body: &[u8]) -> Result<Self, CompensationError> {
        serde_json::from_slice(body).map_err(|e| CompensationError::InvalidWebhook(e.to_string()))
    }

    /// Grams carried by the payload, preferring the integer field.
    pub fn grams(&self) -> Result<u64, CompensationError> {
        if let Some(grams) = self.grams_co2 {
            return Ok(grams);
        }
        let kg = self.kg_co2.ok_or_else(|| {
            CompensationError::InvalidWebhook("neither grams_co2 nor kg_co2 present".to_string())
        })?;
        if !kg.is_finite() || kg < 0.0 {
            return Err(CompensationError::InvalidWebhook(format!(
                "kg_co2 must be a non-negative number, got {kg}"
            )));
        }
        let grams = (kg * 1_000.0).round();
        if grams > u64::MAX as f64 {
            return Err(CompensationError::InvalidWebhook(format!(
                "kg_co2 out of range: {kg}"
            )));
        }
        Ok(grams as u64)
    }

    pub fn into_request(self) -> Result<CompensationRequest, CompensationError> {
        if self.event_id.trim().is_empty() {
            return Err(CompensationError::InvalidWebhook("empty event_id".to_string()));
        }
        if self.project_id.trim().is_empty() {
            return Err(CompensationError::InvalidWebhook("empty project_id".to_string()));
        }
        let grams = self.grams()?;
        if grams == 0 {
            return Err(CompensationError::InvalidGrams);
        }
        Ok(CompensationRequest {
            request_id: self.event_id,
            project_id: self.project_id,
            grams,
            buyer: self.buyer_wallet,
        })
    }
}
