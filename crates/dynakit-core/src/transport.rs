//! The transport seam.
//!
//! A [`Transport`] moves one serialized request body to the store and returns
//! the raw response body. Signing, HTTP, retries and backoff all live behind
//! it; the client only serializes inputs and deserializes outputs.

use bytes::Bytes;
use thiserror::Error;

use dynakit_model::{Operation, ServiceError};

/// Sends request bodies to the store.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Submit `body` as the given operation and return the response body.
    ///
    /// Error responses from the store should be reported as
    /// [`TransportError::Service`], typically via [`ServiceError::from_body`].
    async fn submit(&self, operation: Operation, body: Bytes) -> Result<Bytes, TransportError>;
}

/// Failure reported by a transport, or while (de)serializing around it.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The store answered with an error envelope.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The response body did not match the expected output shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    /// The request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    /// Anything else: connection errors, timeouts, signing failures.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wrap an arbitrary error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }

    /// The store's error, if the failure came from the store.
    #[must_use]
    pub fn service(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}
