//! This module provides the main entry point for talking to the HidroWebService.
//! A [`Hidroweb`] client owns the token guard and the range fetcher; the
//! per-endpoint clients borrow it.

use crate::auth::credentials::{CredentialSource, Credentials, EnvCredentials, StaticCredentials};
use crate::auth::token_guard::{AuthToken, TokenGuard};
use crate::clients::inventory_client::InventoryClient;
use crate::clients::series_client::SeriesClient;
use crate::clients::telemetry_client::TelemetryClient;
use crate::config::{headers, paths, ClientConfig};
use crate::error::HidrowebError;
use crate::fetch::range_fetcher::RangeFetcher;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};
use log::info;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The main client for the HidroWebService.
///
/// Authentication is handled for you: the first call exchanges the
/// credentials for a bearer token, later calls reuse it until it expires.
///
/// # Examples
///
/// ```no_run
/// # use hidroweb::{Credentials, Hidroweb, HidrowebError};
/// # use chrono::NaiveDate;
/// # async fn run() -> Result<(), HidrowebError> {
/// let client = Hidroweb::new(Credentials::new("my-login", "my-password"));
///
/// let station = client.inventory().station(2243004).await?;
/// println!("{} ({:?})", station.station_name, station.station_type);
///
/// let rainfall = client
///     .series()
///     .rainfall(2243004)
///     .start(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2021, 12, 31).unwrap())
///     .call()
///     .await?;
/// println!("{} months of rainfall", rainfall.len());
/// # Ok(())
/// # }
/// ```
pub struct Hidroweb {
    config: ClientConfig,
    guard: TokenGuard,
    fetcher: RangeFetcher,
}

impl Hidroweb {
    /// Creates a client with fixed credentials and the default [`ClientConfig`].
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(StaticCredentials(credentials), ClientConfig::default())
    }

    /// Creates a client reading `HIDROWEB_LOGIN` / `HIDROWEB_PASSWORD`
    /// (a `.env` file is honoured).
    ///
    /// # Errors
    ///
    /// Returns [`HidrowebError::Auth`] with `CredentialsNotFound` when either
    /// variable is missing, so misconfiguration surfaces before the first call.
    pub fn from_env() -> Result<Self, HidrowebError> {
        Self::from_env_source(EnvCredentials::default(), ClientConfig::default())
    }

    fn from_env_source(source: EnvCredentials, config: ClientConfig) -> Result<Self, HidrowebError> {
        source.credentials()?;
        Ok(Self::with_config(source, config))
    }

    /// Creates a client over the production HTTP transport.
    pub fn with_config(source: impl CredentialSource + 'static, config: ClientConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout));
        Self::with_transport(transport, Arc::new(source), config)
    }

    /// Creates a client over any [`Transport`], e.g. an in-memory fake.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        source: Arc<dyn CredentialSource>,
        config: ClientConfig,
    ) -> Self {
        info!(
            "Creating HidroWebService client for {} (at most {} concurrent requests)",
            config.base_url, config.max_concurrent_requests
        );
        let guard = TokenGuard::new(
            source,
            transport.clone(),
            config.endpoint(paths::IDENTITY),
            config.token_lifetime,
        );
        let fetcher = RangeFetcher::new(
            transport,
            config.max_concurrent_requests,
            config.call_timeout,
        );
        Self {
            config,
            guard,
            fetcher,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The guard holding the current bearer token.
    pub fn token_guard(&self) -> &TokenGuard {
        &self.guard
    }

    /// Station inventory lookups.
    pub fn inventory(&self) -> InventoryClient<'_> {
        InventoryClient::new(self)
    }

    /// Historical (consisted and raw) daily series, one row per station-month.
    pub fn series(&self) -> SeriesClient<'_> {
        SeriesClient::new(self)
    }

    /// Telemetry readings, at most ten days per call.
    pub fn telemetry(&self) -> TelemetryClient<'_> {
        TelemetryClient::new(self)
    }

    /// A GET on `path` carrying the bearer token.
    pub(crate) fn authorized(&self, token: &AuthToken, path: &str) -> HttpRequest {
        HttpRequest::get(self.config.endpoint(path)).header(headers::AUTHORIZATION, token.bearer())
    }

    /// Runs the sub-requests built by `build` and returns every raw item, in order.
    pub(crate) async fn fetch<F>(
        &self,
        cancel: Option<&CancellationToken>,
        build: F,
    ) -> Result<Vec<Value>, HidrowebError>
    where
        F: FnOnce(&AuthToken) -> Vec<HttpRequest>,
    {
        self.fetcher.fetch(&self.guard, cancel, build).await
    }
}
