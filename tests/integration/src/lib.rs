//! Integration tests for the dynakit client.
//!
//! The client is driven end to end against [`FakeTransport`], which replays
//! scripted store responses and records every request body it receives. No
//! server is needed:
//! ```text
//! cargo test -p dynakit-integration
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Once};

use bytes::Bytes;
use dynakit_core::{Client, ClientConfig, Transport, TransportError};
use dynakit_model::{Operation, ServiceError, ServiceErrorCode};
use parking_lot::Mutex;

static INIT: Once = Once::new();

/// Initialize tracing (once). `RUST_LOG` wins over the configured level.
pub fn init_tracing() {
    INIT.call_once(|| {
        let level = ClientConfig::from_env().log_level;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
            )
            .with_test_writer()
            .init();
    });
}

/// A request seen by the fake transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Operation the client submitted.
    pub operation: Operation,
    /// Parsed request body.
    pub body: serde_json::Value,
}

/// Transport that answers from a script.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<Bytes, ServiceError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    /// An empty script.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful response body.
    pub fn respond(&self, body: serde_json::Value) -> &Self {
        self.responses
            .lock()
            .push_back(Ok(Bytes::from(body.to_string())));
        self
    }

    /// Queue an error response.
    pub fn fail(&self, code: ServiceErrorCode, message: &str) -> &Self {
        self.responses
            .lock()
            .push_back(Err(ServiceError::new(code, message)));
        self
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn submit(&self, operation: Operation, body: Bytes) -> Result<Bytes, TransportError> {
        let parsed = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        tracing::debug!(%operation, body = %parsed, "fake transport received request");
        self.requests.lock().push(RecordedRequest {
            operation,
            body: parsed,
        });

        let response = self.responses.lock().pop_front().unwrap_or_else(|| {
            Err(ServiceError::new(
                ServiceErrorCode::Other("ScriptExhausted".to_owned()),
                format!("no scripted response for {operation}"),
            ))
        });
        response.map_err(TransportError::from)
    }
}

/// Create a client over `transport` with no page delay configured.
#[must_use]
pub fn client(transport: &Arc<FakeTransport>) -> Client {
    init_tracing();
    Client::with_shared_transport(ClientConfig::default(), transport.clone())
}

mod test_codec;
mod test_items;
mod test_lifecycle;
mod test_pagination;
mod test_streams;
