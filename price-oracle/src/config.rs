use {
    crate::error::OracleError,
    serde::{Deserialize, Serialize},
    url::Url,
};

/// Where the two exchange rates come from and what to use when they can't
/// be fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Endpoint quoting USD per native token.
    pub native_usd_url: String,
    /// Dot-separated path to the rate inside the endpoint's JSON body.
    pub native_usd_path: String,

    /// Endpoint quoting local-currency units per USD.
    pub usd_local_url: String,
    pub usd_local_path: String,

    /// USD per native token used when the native endpoint fails.
    pub fallback_native_usd: f64,
    /// Local units per USD used when the local endpoint fails.
    pub fallback_usd_local: f64,

    /// Per-request timeout, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            native_usd_url:
                "https://api.coingecko.com/api/v3/simple/price?ids=matic-network&vs_currencies=usd"
                    .to_string(),
            native_usd_path: "matic-network.usd".to_string(),
            usd_local_url: "https://open.er-api.com/v6/latest/USD".to_string(),
            usd_local_path: "rates.MXN".to_string(),
            fallback_native_usd: 0.5,
            fallback_usd_local: 20.0,
            timeout_ms: 5_000,
        }
    }
}

impl OracleConfig {
    pub fn validate(&self) -> Result<(), OracleError> {
        for (field, raw) in [
            ("native_usd_url", &self.native_usd_url),
            ("usd_local_url", &self.usd_local_url),
        ] {
            parse_endpoint(field, raw)?;
        }
        for (field, path) in [
            ("native_usd_path", &self.native_usd_path),
            ("usd_local_path", &self.usd_local_path),
        ] {
            if path.split('.').any(str::is_empty) {
                return Err(invalid(format!("{field} has an empty segment: {path:?}")));
            }
        }
        for (field, value) in [
            ("fallback_native_usd", self.fallback_native_usd),
            ("fallback_usd_local", self.fallback_usd_local),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{field} must be positive, got {value}")));
            }
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Parse `raw` as an http(s) endpoint.
pub(crate) fn parse_endpoint(field: &str, raw: &str) -> Result<Url, OracleError> {
    let url = Url::parse(raw).map_err(|e| invalid(format!("{field}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("{field}: unsupported scheme {other:?}"))),
    }
}

fn invalid(reason: String) -> OracleError {
    OracleError::InvalidConfig { reason }
}
