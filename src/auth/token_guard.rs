//! Bearer token cache for the HidroWebService.
//!
//! The identity endpoint hands out a token without telling how long it stays
//! valid, so the guard stamps each token with `issued_at + lifetime` and
//! re-authenticates once that moment has passed.

use crate::auth::credentials::CredentialSource;
use crate::auth::error::AuthError;
use crate::config::{headers, DEFAULT_TOKEN_LIFETIME_MINUTES};
use crate::error::HidrowebError;
use crate::transport::error::TransportError;
use crate::transport::{HttpRequest, Transport};
use chrono::{DateTime, TimeDelta, Utc};
use log::{info, warn};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A bearer token together with the moment the client stops trusting it.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    value: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            issued_at,
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lends a valid [`AuthToken`] to every request that needs one.
///
/// The cached token sits behind an async mutex that stays locked for the
/// whole identity exchange: callers arriving while a refresh is in flight wait
/// for it and reuse its result instead of authenticating again. A failed
/// exchange leaves the cache empty, so the next [`TokenGuard::acquire`] tries
/// again.
pub struct TokenGuard {
    source: Arc<dyn CredentialSource>,
    transport: Arc<dyn Transport>,
    identity_url: String,
    lifetime: TimeDelta,
    cached: Mutex<Option<AuthToken>>,
}

impl fmt::Debug for TokenGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGuard")
            .field("identity_url", &self.identity_url)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenGuard {
    pub fn new(
        source: Arc<dyn CredentialSource>,
        transport: Arc<dyn Transport>,
        identity_url: impl Into<String>,
        lifetime: TimeDelta,
    ) -> Self {
        // A token must outlive the moment it is issued.
        let lifetime = if lifetime > TimeDelta::zero() {
            lifetime
        } else {
            warn!(
                "Token lifetime {} is not positive, using {} minutes",
                lifetime, DEFAULT_TOKEN_LIFETIME_MINUTES
            );
            TimeDelta::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES)
        };
        Self {
            source,
            transport,
            identity_url: identity_url.into(),
            lifetime,
            cached: Mutex::new(None),
        }
    }

    pub fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    /// Returns a token that has not expired, authenticating first when the
    /// cache is empty or stale.
    pub async fn acquire(&self) -> Result<AuthToken, HidrowebError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if !token.is_expired_at(now) {
                return Ok(token.clone());
            }
            info!("Token expired at {}, refreshing", token.expires_at);
        }

        *cached = None;
        let token = self.exchange().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Replaces the cached token, e.g. with one persisted by the caller.
    pub async fn seed(&self, value: impl Into<String>, expires_at: DateTime<Utc>) {
        let token = AuthToken::new(value, Utc::now(), expires_at);
        *self.cached.lock().await = Some(token);
    }

    /// Drops the cached token so the next `acquire` authenticates.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    pub async fn cached(&self) -> Option<AuthToken> {
        self.cached.lock().await.clone()
    }

    async fn exchange(&self) -> Result<AuthToken, HidrowebError> {
        let credentials = self.source.credentials()?;
        let request = HttpRequest::get(&self.identity_url)
            .header(headers::ACCEPT, "*/*")
            .header(headers::LOGIN, credentials.login())
            .header(headers::PASSWORD, credentials.password());

        info!("Authenticating against {}", self.identity_url);
        let body = self
            .transport
            .get(&request)
            .await
            .map_err(|e| match e {
                TransportError::HttpStatus { status, .. } => {
                    warn!("Identity exchange rejected with status {}", status);
                    HidrowebError::from(AuthError::AuthenticationFailed {
                        reason: format!("identity endpoint answered {status}"),
                    })
                }
                other => HidrowebError::from(other),
            })?;

        let value = Self::token_from_body(&body)?;
        let issued_at = Utc::now();
        Ok(AuthToken::new(value, issued_at, issued_at + self.lifetime))
    }

    fn token_from_body(body: &Value) -> Result<String, AuthError> {
        match body.pointer("/items/tokenautenticacao").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("response carries no token");
                Err(AuthError::AuthenticationFailed {
                    reason: message.to_string(),
                })
            }
        }
    }
}
