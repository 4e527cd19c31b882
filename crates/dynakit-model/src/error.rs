//! Store error envelope.
//!
//! Failed requests carry a JSON body of the form
//! `{"__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException", "message": "..."}`.
//! The part after `#` is the error code.

use std::fmt;

use serde::Deserialize;

/// Well-known store error codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ServiceErrorCode {
    /// Table already exists or is being modified.
    ResourceInUseException,
    /// Table or stream not found.
    ResourceNotFoundException,
    /// Condition check failed.
    ConditionalCheckFailedException,
    /// Item collection size limit exceeded.
    ItemCollectionSizeLimitExceededException,
    /// Provisioned throughput exceeded.
    ProvisionedThroughputExceededException,
    /// Too many table operations in flight.
    LimitExceededException,
    /// Request limit exceeded.
    RequestLimitExceeded,
    /// Validation error.
    #[default]
    ValidationException,
    /// Serialization error.
    SerializationException,
    /// Internal server error.
    InternalServerError,
    /// Shard iterator expired.
    ExpiredIteratorException,
    /// Stream records were trimmed past the requested position.
    TrimmedDataAccessException,
    /// Access denied.
    AccessDeniedException,
    /// Unknown client or operation.
    UnrecognizedClientException,
    /// A code this crate does not know about.
    Other(String),
}

impl ServiceErrorCode {
    /// Parse a `__type` value. Anything before the last `#` is ignored.
    #[must_use]
    pub fn from_type(error_type: &str) -> Self {
        let code = error_type.rsplit('#').next().unwrap_or(error_type);
        match code {
            "ResourceInUseException" => Self::ResourceInUseException,
            "ResourceNotFoundException" => Self::ResourceNotFoundException,
            "ConditionalCheckFailedException" => Self::ConditionalCheckFailedException,
            "ItemCollectionSizeLimitExceededException" => {
                Self::ItemCollectionSizeLimitExceededException
            }
            "ProvisionedThroughputExceededException" => {
                Self::ProvisionedThroughputExceededException
            }
            "LimitExceededException" => Self::LimitExceededException,
            "RequestLimitExceeded" => Self::RequestLimitExceeded,
            "ValidationException" => Self::ValidationException,
            "SerializationException" => Self::SerializationException,
            "InternalServerError" => Self::InternalServerError,
            "ExpiredIteratorException" => Self::ExpiredIteratorException,
            "TrimmedDataAccessException" => Self::TrimmedDataAccessException,
            "AccessDeniedException" => Self::AccessDeniedException,
            "UnrecognizedClientException" => Self::UnrecognizedClientException,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ResourceInUseException => "ResourceInUseException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::ItemCollectionSizeLimitExceededException => {
                "ItemCollectionSizeLimitExceededException"
            }
            Self::ProvisionedThroughputExceededException => {
                "ProvisionedThroughputExceededException"
            }
            Self::LimitExceededException => "LimitExceededException",
            Self::RequestLimitExceeded => "RequestLimitExceeded",
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
            Self::ExpiredIteratorException => "ExpiredIteratorException",
            Self::TrimmedDataAccessException => "TrimmedDataAccessException",
            Self::AccessDeniedException => "AccessDeniedException",
            Self::UnrecognizedClientException => "UnrecognizedClientException",
            Self::Other(code) => code,
        }
    }

    /// Whether the store reports the condition as transient.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceededException
                | Self::RequestLimitExceeded
                | Self::LimitExceededException
        )
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// The error code.
    pub code: ServiceErrorCode,
    /// A human-readable error message.
    pub message: String,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "__type", default)]
    error_type: String,
    // the store is inconsistent about the casing of this field
    #[serde(alias = "Message", default)]
    message: String,
}

impl ServiceError {
    /// Create a new error with a custom message.
    #[must_use]
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Table or resource not found.
    #[must_use]
    pub fn resource_not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::ResourceNotFoundException, message)
    }

    /// Parse an error response body. Returns `None` when the body is not an
    /// error envelope.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let envelope: Envelope = serde_json::from_slice(body).ok()?;
        if envelope.error_type.is_empty() {
            return None;
        }
        Some(Self {
            code: ServiceErrorCode::from_type(&envelope.error_type),
            message: envelope.message,
        })
    }

    /// Whether this is the store's "resource not found" error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == ServiceErrorCode::ResourceNotFoundException
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_qualified_error_type() {
        let body = br#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceNotFoundException","message":"Requested resource not found"}"#;
        let err = ServiceError::from_body(body).unwrap();
        assert!(err.is_not_found());
        assert_eq!(err.message, "Requested resource not found");
    }

    #[test]
    fn test_should_accept_capitalized_message() {
        let body = br#"{"__type":"com.amazon.coral.validate#ValidationException","Message":"bad"}"#;
        let err = ServiceError::from_body(body).unwrap();
        assert_eq!(err.code, ServiceErrorCode::ValidationException);
        assert_eq!(err.message, "bad");
    }

    #[test]
    fn test_should_keep_unknown_codes() {
        let err = ServiceError::from_body(br#"{"__type":"x#SomethingNew"}"#).unwrap();
        assert_eq!(err.code, ServiceErrorCode::Other("SomethingNew".to_owned()));
        assert_eq!(err.to_string(), "ServiceError(SomethingNew): ");
    }

    #[test]
    fn test_should_reject_non_error_bodies() {
        assert!(ServiceError::from_body(br#"{"TableNames":[]}"#).is_none());
        assert!(ServiceError::from_body(b"not json").is_none());
    }

    #[test]
    fn test_should_flag_throttling_codes() {
        assert!(ServiceErrorCode::RequestLimitExceeded.is_throttling());
        assert!(!ServiceErrorCode::ValidationException.is_throttling());
    }
}
