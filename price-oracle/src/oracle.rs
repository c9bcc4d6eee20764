//! Exchange-rate snapshots with fixed fallbacks.
//!
//! The oracle never fails: each rate is fetched independently and a failed
//! or unusable fetch is replaced by its configured fallback, with a
//! warning.  Callers can tell from the snapshot which rates were live.

use {
    crate::{
        config::OracleConfig,
        error::{OracleError, Result},
        source::{HttpRateSource, RateSource},
    },
    log::{debug, warn},
    serde::{Deserialize, Serialize},
    std::{sync::Arc, time::Duration},
};

/// The two rates needed to turn a local-currency price into native tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// USD per native token.
    pub native_usd: f64,
    /// Local-currency units per USD.
    pub usd_local: f64,
    pub native_from_fallback: bool,
    pub usd_local_from_fallback: bool,
}

impl RateSnapshot {
    /// Snapshot built from known rates, e.g. ones captured alongside a quote.
    pub fn fixed(native_usd: f64, usd_local: f64) -> Self {
        Self {
            native_usd,
            usd_local,
            native_from_fallback: false,
            usd_local_from_fallback: false,
        }
    }

    pub fn local_to_usd(&self, amount: f64) -> f64 {
        amount / self.usd_local
    }

    /// Native-token units worth `amount` in local currency.
    pub fn local_to_native(&self, amount: f64) -> f64 {
        self.local_to_usd(amount) / self.native_usd
    }

    /// True if either rate is a fallback.
    pub fn is_degraded(&self) -> bool {
        self.native_from_fallback || self.usd_local_from_fallback
    }
}

pub struct PriceOracle {
    native_usd: Arc<dyn RateSource>,
    usd_local: Arc<dyn RateSource>,
    fallback_native_usd: f64,
    fallback_usd_local: f64,
}

impl PriceOracle {
    pub fn new(
        native_usd: Arc<dyn RateSource>,
        usd_local: Arc<dyn RateSource>,
        fallback_native_usd: f64,
        fallback_usd_local: f64,
    ) -> Result<Self> {
        for (field, value) in [
            ("fallback_native_usd", fallback_native_usd),
            ("fallback_usd_local", fallback_usd_local),
        ] {
            if !is_usable(value) {
                return Err(OracleError::InvalidConfig {
                    reason: format!("{field} must be positive, got {value}"),
                });
            }
        }
        Ok(Self {
            native_usd,
            usd_local,
            fallback_native_usd,
            fallback_usd_local,
        })
    }

    /// Oracle backed by the two HTTP endpoints in `config`.
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let native = HttpRateSource::new(
            "native_usd",
            &config.native_usd_url,
            &config.native_usd_path,
            timeout,
        )?;
        let local = HttpRateSource::new(
            "usd_local",
            &config.usd_local_url,
            &config.usd_local_path,
            timeout,
        )?;
        Self::new(
            Arc::new(native),
            Arc::new(local),
            config.fallback_native_usd,
            config.fallback_usd_local,
        )
    }

    /// Fetch both rates concurrently, substituting fallbacks as needed.
    pub async fn snapshot(&self) -> RateSnapshot {
        let (native, local) = tokio::join!(
            fetch_or_fallback(self.native_usd.as_ref(), self.fallback_native_usd),
            fetch_or_fallback(self.usd_local.as_ref(), self.fallback_usd_local),
        );
        let snapshot = RateSnapshot {
            native_usd: native.0,
            usd_local: local.0,
            native_from_fallback: native.1,
            usd_local_from_fallback: local.1,
        };
        debug!("rate snapshot: {snapshot:?}");
        snapshot
    }
}

fn is_usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// `(rate, used_fallback)`.
async fn fetch_or_fallback(source: &dyn RateSource, fallback: f64) -> (f64, bool) {
    let err = match source.fetch_rate().await {
        Ok(rate) if is_usable(rate) => return (rate, false),
        Ok(value) => OracleError::InvalidRate {
            source_name: source.name().to_string(),
            value,
        },
        Err(err) => err,
    };
    warn!("{err}; using fallback rate {fallback}");
    (fallback, true)
}
