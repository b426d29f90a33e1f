//! Client configuration and the fixed names of the HidroWebService contract.

use bon::Builder;
use chrono::TimeDelta;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.ana.gov.br/hidrowebservice/EstacoesTelemetricas";

pub const LOGIN_ENV_VAR: &str = "HIDROWEB_LOGIN";
pub const PASSWORD_ENV_VAR: &str = "HIDROWEB_PASSWORD";

/// The service does not report token lifetimes; this is the client-side assumption.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

/// Longest telemetry window, in days between start and end, the service accepts.
pub const TELEMETRY_MAX_SPAN_DAYS: i64 = 10;

pub(crate) mod paths {
    pub const IDENTITY: &str = "OAUth/v1";
    pub const INVENTORY: &str = "HidroInventarioEstacoes/v1";
    pub const SERIES_PREFIX: &str = "HidroSerie";
    pub const TELEMETRY_PREFIX: &str = "HidroinfoanaSerieTelemetrica";
}

pub(crate) mod headers {
    pub const LOGIN: &str = "Identificador";
    pub const PASSWORD: &str = "Senha";
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "Authorization";
}

pub(crate) mod params {
    pub const STATION: &str = "Código da Estação";
    pub const STATE: &str = "Unidade Federativa";
    pub const BASIN: &str = "Código da Bacia";
    pub const DATE_FILTER: &str = "Tipo Filtro Data";
    pub const START_DATE: &str = "Data Inicial (yyyy-MM-dd)";
    pub const END_DATE: &str = "Data Final (yyyy-MM-dd)";
    pub const SEARCH_DATE: &str = "Data de Busca (yyyy-MM-dd)";
    pub const SEARCH_INTERVAL: &str = "Range Intervalo de busca";
}

/// Settings shared by every call a [`crate::Hidroweb`] client makes.
///
/// ```
/// use hidroweb::ClientConfig;
/// use chrono::TimeDelta;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .token_lifetime(TimeDelta::minutes(20))
///     .call_timeout(Duration::from_secs(120))
///     .max_concurrent_requests(4)
///     .build();
/// assert_eq!(config.max_concurrent_requests, 4);
/// assert_eq!(config.endpoint("OAUth/v1"), "https://www.ana.gov.br/hidrowebservice/EstacoesTelemetricas/OAUth/v1");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Root of the `EstacoesTelemetricas` endpoints, without trailing slash.
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,

    /// How long a freshly issued token is trusted.
    #[builder(default = TimeDelta::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES))]
    pub token_lifetime: TimeDelta,

    /// Timeout applied to each individual HTTP request.
    #[builder(default = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))]
    pub request_timeout: Duration,

    /// Upper bound for a whole logical call (all of its sub-requests). `None` disables it.
    pub call_timeout: Option<Duration>,

    /// How many sub-requests of one call may be in flight at once.
    #[builder(default = DEFAULT_MAX_CONCURRENT_REQUESTS)]
    pub max_concurrent_requests: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::builder().build()
    }
}

impl ClientConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
