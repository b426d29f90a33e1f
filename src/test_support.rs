//! In-memory transport used by the unit tests.

use crate::config::paths;
use crate::transport::error::TransportError;
use crate::transport::{HttpRequest, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&HttpRequest) -> Result<Value, TransportError> + Send + Sync>;
type Delay = Box<dyn Fn(&HttpRequest) -> Duration + Send + Sync>;

pub(crate) fn envelope(items: Value) -> Value {
    json!({"status": "OK", "code": 200, "message": "Sucesso", "items": items})
}

/// Records every request and answers identity exchanges with a fresh token.
/// Data requests are answered by the responder (empty `items` by default).
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    issued: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    identity_status: Option<u16>,
    identity_body: Option<Value>,
    delay: Option<Delay>,
    responder: Responder,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            issued: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            identity_status: None,
            identity_body: None,
            delay: None,
            responder: Box::new(|_| Ok(envelope(json!([])))),
        }
    }

    pub(crate) fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        self.responder = Box::new(responder);
        self
    }

    pub(crate) fn with_identity_status(mut self, status: u16) -> Self {
        self.identity_status = Some(status);
        self
    }

    pub(crate) fn with_identity_body(mut self, body: Value) -> Self {
        self.identity_body = Some(body);
        self
    }

    pub(crate) fn with_delay(self, delay: Duration) -> Self {
        self.with_delay_by(move |_| delay)
    }

    /// Delays each request by an amount picked from the request itself.
    pub(crate) fn with_delay_by<F>(mut self, delay: F) -> Self
    where
        F: Fn(&HttpRequest) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn data_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| !Self::is_identity(r))
            .collect()
    }

    pub(crate) fn identity_calls(&self) -> usize {
        self.requests().iter().filter(|r| Self::is_identity(r)).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn is_identity(request: &HttpRequest) -> bool {
        request.url.ends_with(paths::IDENTITY)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, request: &HttpRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(request)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if Self::is_identity(request) {
            if let Some(status) = self.identity_status {
                return Err(TransportError::HttpStatus {
                    url: request.url.clone(),
                    status: reqwest::StatusCode::from_u16(status).unwrap(),
                });
            }
            if let Some(body) = &self.identity_body {
                return Ok(body.clone());
            }
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(envelope(json!({ "tokenautenticacao": format!("token-{n}") })));
        }
        (self.responder)(request)
    }
}
