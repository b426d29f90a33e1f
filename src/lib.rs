mod auth;
mod clients;
mod config;
mod error;
mod fetch;
mod frames;
mod hidroweb;
mod transport;
mod types;

#[cfg(test)]
mod test_support;

pub use error::{ErrorCategory, HidrowebError};
pub use hidroweb::*;

pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TOKEN_LIFETIME_MINUTES, LOGIN_ENV_VAR, PASSWORD_ENV_VAR, TELEMETRY_MAX_SPAN_DAYS,
};

pub use auth::credentials::{CredentialSource, Credentials, EnvCredentials, StaticCredentials};
pub use auth::error::AuthError;
pub use auth::token_guard::{AuthToken, TokenGuard};

pub use transport::error::TransportError;
pub use transport::{HttpRequest, ReqwestTransport, Transport};

pub use fetch::envelope::ApiEnvelope;
pub use fetch::range::DateRange;

pub use clients::inventory_client::*;
pub use clients::series_client::*;
pub use clients::telemetry_client::*;

pub use types::inventory::*;
pub use types::parameters::*;
pub use types::region::*;
pub use types::series::*;
pub use types::telemetry::*;

pub use frames::series_frame::*;
pub use frames::telemetry_frame::*;
