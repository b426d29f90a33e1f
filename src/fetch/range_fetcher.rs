//! Fan-out / fan-in of the sub-requests that make up one logical call.

use crate::auth::token_guard::{AuthToken, TokenGuard};
use crate::error::HidrowebError;
use crate::fetch::envelope::ApiEnvelope;
use crate::transport::{HttpRequest, Transport};
use futures_util::{stream, StreamExt, TryStreamExt};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs the sub-requests of a call with bounded concurrency and concatenates
/// their `items` in the order the requests were built.
///
/// The token is acquired once per call and shared by every sub-request. The
/// first failing sub-request fails the whole call; nothing partial is returned.
#[derive(Clone)]
pub struct RangeFetcher {
    transport: Arc<dyn Transport>,
    max_concurrent_requests: usize,
    call_timeout: Option<Duration>,
}

impl RangeFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        max_concurrent_requests: usize,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            max_concurrent_requests: max_concurrent_requests.max(1),
            call_timeout,
        }
    }

    /// Acquires a token, builds the sub-requests with it and collects every item.
    pub async fn fetch<F>(
        &self,
        guard: &TokenGuard,
        cancel: Option<&CancellationToken>,
        build: F,
    ) -> Result<Vec<Value>, HidrowebError>
    where
        F: FnOnce(&AuthToken) -> Vec<HttpRequest>,
    {
        let call = async {
            let token = guard.acquire().await?;
            let requests = build(&token);
            self.fetch_all(&requests).await
        };
        self.bounded(call, cancel).await
    }

    async fn fetch_all(&self, requests: &[HttpRequest]) -> Result<Vec<Value>, HidrowebError> {
        info!(
            "Issuing {} sub-request(s), at most {} at a time",
            requests.len(),
            self.max_concurrent_requests
        );
        let transport = &self.transport;
        let bodies: Vec<Value> = stream::iter(requests)
            .map(|request| transport.get(request))
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await?;

        let mut items = Vec::new();
        for (request, body) in requests.iter().zip(bodies) {
            let chunk = ApiEnvelope::from_body(&request.url, body)?.into_items();
            debug!("{} item(s) from {:?}", chunk.len(), request.query);
            items.extend(chunk);
        }
        Ok(items)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, HidrowebError>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, HidrowebError> {
        let timed = async {
            match self.call_timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .map_err(|_| HidrowebError::Timeout { limit })?,
                None => call.await,
            }
        };
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(HidrowebError::Cancelled),
                result = timed => result,
            },
            None => timed.await,
        }
    }
}

/// Fails with [`HidrowebError::NotFound`] when nothing was aggregated.
pub fn ensure_not_empty(
    items: Vec<Value>,
    what: &'static str,
    station: Option<u64>,
) -> Result<Vec<Value>, HidrowebError> {
    if items.is_empty() {
        return Err(HidrowebError::NotFound { what, station });
    }
    Ok(items)
}

/// Maps every raw item onto `T`; the first mismatch fails the whole batch.
pub fn validate<T: DeserializeOwned>(
    items: Vec<Value>,
    record: &'static str,
) -> Result<Vec<T>, HidrowebError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| HidrowebError::SchemaValidation {
                record,
                index,
                source,
            })
        })
        .collect()
}
