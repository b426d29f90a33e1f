//! The HTTP seam of the crate.
//!
//! Every call the client makes goes through a [`Transport`], which turns an
//! [`HttpRequest`] (URL, headers and query pairs, named exactly as the
//! HidroWebService expects them) into the decoded JSON body. The production
//! implementation is [`ReqwestTransport`]; tests inject in-memory transports.

pub mod error;

use crate::transport::error::TransportError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Header names whose values are credentials and must never be logged.
const SECRET_HEADERS: [&str; 2] = ["Senha", "Authorization"];

/// A single GET request against the web service.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL of the endpoint, without query string.
    pub url: String,
    /// Header name/value pairs, sent verbatim.
    pub headers: Vec<(&'static str, String)>,
    /// Query parameter name/value pairs, URL-encoded by the transport.
    pub query: Vec<(&'static str, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Adds the query pair only when `value` is `Some`.
    pub fn maybe_query<T: ToString>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if SECRET_HEADERS.contains(name) {
                    (*name, "<redacted>")
                } else {
                    (*name, value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("query", &self.query)
            .finish()
    }
}

/// Performs GET requests and returns the decoded JSON body.
///
/// Implementations must treat any non-success HTTP status as an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &HttpRequest) -> Result<Value, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    request_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(request_timeout: Duration) -> Self {
        Self::with_client(Client::new(), request_timeout)
    }

    pub fn with_client(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<Value, TransportError> {
        debug!("GET {} {:?}", request.url, request.query);

        let mut builder = self
            .client
            .get(&request.url)
            .query(&request.query)
            .timeout(self.request_timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: request.url.clone(),
                    limit: self.request_timeout,
                }
            } else {
                TransportError::NetworkRequest(request.url.clone(), e)
            }
        })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", request.url, e);
                return Err(match e.status() {
                    Some(status) => TransportError::HttpStatus {
                        url: request.url.clone(),
                        status,
                    },
                    None => TransportError::NetworkRequest(request.url.clone(), e),
                });
            }
        };

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(request.url.clone(), e))
    }
}
