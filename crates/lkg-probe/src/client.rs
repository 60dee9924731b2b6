//! HTTP side of the probe

use crate::report::{ProbeOutcome, ProbeReport, ProbeResult};
use lkg_core::config::ProbeSettings;
use lkg_core::error::NetworkError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::Instant;

/// Resolved probe settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Endpoints, probed in order
    pub urls: Vec<String>,
    /// Deadline for establishing the connection
    pub connect_timeout: Duration,
    /// Deadline for the whole request
    pub timeout: Duration,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`
    pub use_system_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::from(&ProbeSettings::default())
    }
}

impl From<&ProbeSettings> for ProbeConfig {
    fn from(settings: &ProbeSettings) -> Self {
        Self {
            urls: settings.urls.clone(),
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs),
            timeout: Duration::from_secs(settings.timeout_secs),
            user_agent: settings.user_agent.clone(),
            use_system_proxy: true,
        }
    }
}

impl ProbeConfig {
    /// Probe `urls` instead of the defaults
    #[must_use]
    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Connect directly, ignoring proxy environment variables
    #[must_use]
    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

/// Map a reqwest failure onto the probe's error kinds
#[must_use]
pub fn classify(err: &reqwest::Error) -> NetworkError {
    let message = err.to_string();
    if err.is_timeout() {
        let phase = if err.is_connect() { "connect" } else { "read" };
        NetworkError::Timeout {
            message: format!("{phase}: {message}"),
        }
    } else if err.is_connect() {
        NetworkError::Connection { message }
    } else {
        NetworkError::Other { message }
    }
}

/// Sequential GET prober
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    config: ProbeConfig,
}

impl Prober {
    /// Build the HTTP client
    ///
    /// # Errors
    /// `NetworkError::Other` if the client cannot be constructed
    pub fn new(config: ProbeConfig) -> Result<Self, NetworkError> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|e| NetworkError::Other {
            message: format!("cannot build HTTP client: {e}"),
        })?;
        Ok(Self { client, config })
    }

    /// Settings in use
    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// GET one URL; never retried
    pub async fn probe_url(&self, url: &str) -> ProbeResult {
        let started = Instant::now();
        let outcome = match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => ProbeOutcome::Reachable {
                status: response.status().as_u16(),
            },
            Ok(response) => ProbeOutcome::Unexpected {
                status: response.status().as_u16(),
            },
            Err(e) => ProbeOutcome::Failed { error: classify(&e) },
        };
        let elapsed = started.elapsed();

        match &outcome {
            ProbeOutcome::Failed { error } => {
                tracing::warn!(url, elapsed = ?elapsed, %error, "probe failed");
            }
            ProbeOutcome::Reachable { status } | ProbeOutcome::Unexpected { status } => {
                tracing::info!(url, status, elapsed = ?elapsed, "probe response");
            }
        }

        ProbeResult {
            url: url.to_string(),
            outcome,
            elapsed,
        }
    }

    /// Probe every configured URL in order
    pub async fn run(&self) -> ProbeReport {
        let mut results = Vec::with_capacity(self.config.urls.len());
        for url in &self.config.urls {
            results.push(self.probe_url(url).await);
        }
        ProbeReport { results }
    }
}

/// Probe every URL in `config`
///
/// Individual request failures are recorded in the report, not returned.
///
/// # Errors
/// `NetworkError::Other` only if the HTTP client cannot be built
pub async fn probe(config: ProbeConfig) -> Result<ProbeReport, NetworkError> {
    let prober = Prober::new(config)?;
    tracing::info!(urls = prober.config().urls.len(), "probing connectivity");
    Ok(prober.run().await)
}
