//! Rate sources.
//!
//! A source answers one question ("how many B per A right now?") with a
//! single positive number.  The oracle decides what to do when it can't.

use {
    crate::{
        config::parse_endpoint,
        error::{OracleError, Result},
    },
    async_trait::async_trait,
    log::debug,
    reqwest::Client,
    serde_json::Value,
    std::time::Duration,
    url::Url,
};

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short label used in logs and errors.
    fn name(&self) -> &str;

    async fn fetch_rate(&self) -> Result<f64>;
}

/// Public REST endpoint returning JSON with the rate at a fixed path,
/// e.g. `rates.MXN` in `{"rates": {"MXN": 17.2}}`.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    name: String,
    url: Url,
    path: Vec<String>,
    client: Client,
}

impl HttpRateSource {
    pub fn new(name: impl Into<String>, url: &str, path: &str, timeout: Duration) -> Result<Self> {
        let name = name.into();
        let url = parse_endpoint(&name, url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::InvalidConfig {
                reason: format!("{name}: cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            name,
            url,
            path: path.split('.').map(str::to_string).collect(),
            client,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rate(&self) -> Result<f64> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| OracleError::Transport {
                source_name: self.name.clone(),
                reason: e.to_string(),
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(OracleError::Status {
                source_name: self.name.clone(),
                status: status.as_u16(),
            });
        }
        let body = resp.json::<Value>().await.map_err(|e| OracleError::Decode {
            source_name: self.name.clone(),
            reason: e.to_string(),
        })?;
        let rate = extract_rate(&body, &self.path).map_err(|reason| OracleError::Decode {
            source_name: self.name.clone(),
            reason,
        })?;
        debug!("{}: fetched rate {}", self.name, rate);
        Ok(rate)
    }
}

/// Follow `path` through nested objects and read the number at the end.
/// Numeric strings (`"17.25"`) are accepted since some providers quote them.
pub fn extract_rate(body: &Value, path: &[String]) -> std::result::Result<f64, String> {
    let mut node = body;
    for key in path {
        node = node
            .get(key.as_str())
            .ok_or_else(|| format!("missing field {key:?} on path {}", path.join(".")))?;
    }
    match node {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{n} is not representable as f64")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("{s:?} is not a number: {e}")),
        other => Err(format!("expected a number at {}, found {other}", path.join("."))),
    }
}

#[cfg(any(test, feature = "dev-context-only-utils"))]
pub use mock::MockRateSource;

#[cfg(any(test, feature = "dev-context-only-utils"))]
mod mock {
    use {super::*, parking_lot::Mutex, std::collections::VecDeque};

    /// Scripted source. Queued responses are returned first, in order; after
    /// that every call returns the steady response.
    #[derive(Debug)]
    pub struct MockRateSource {
        name: String,
        queued: Mutex<VecDeque<Result<f64>>>,
        steady: Result<f64>,
        calls: Mutex<u64>,
    }

    impl MockRateSource {
        pub fn ok(name: &str, rate: f64) -> Self {
            Self::with(name, Ok(rate))
        }

        pub fn failing(name: &str) -> Self {
            Self::with(
                name,
                Err(OracleError::Transport {
                    source_name: name.to_string(),
                    reason: "connection refused".to_string(),
                }),
            )
        }

        fn with(name: &str, steady: Result<f64>) -> Self {
            Self {
                name: name.to_string(),
                queued: Mutex::new(VecDeque::new()),
                steady,
                calls: Mutex::new(0),
            }
        }

        pub fn push(&self, response: Result<f64>) {
            self.queued.lock().push_back(response);
        }

        pub fn calls(&self) -> u64 {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl RateSource for MockRateSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch_rate(&self) -> Result<f64> {
            {
                let mut calls = self.calls.lock();
                *calls = calls.saturating_add(1);
            }
            self.queued
                .lock()
                .pop_front()
                .unwrap_or_else(|| self.steady.clone())
        }
    }
}
