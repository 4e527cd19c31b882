//! Error types for client operations.

use thiserror::Error;

use crate::pagination::CountTotals;
use crate::transport::TransportError;

/// Errors returned by encoding, request assembly and execution.
#[derive(Debug, Error)]
pub enum Error {
    /// A wire value had zero tags, several tags, an unknown tag or an
    /// unparseable payload.
    #[error("malformed attribute value: {0}")]
    MalformedAttributeValue(String),
    /// A native value cannot be represented as the requested wire type.
    #[error("cannot encode {kind} value as {target}")]
    UnsupportedValueKind {
        /// Kind of the offending value.
        kind: &'static str,
        /// Wire type that was asked for.
        target: String,
    },
    /// Operator arity or operand types do not match.
    #[error("invalid condition operands: {0}")]
    InvalidConditionOperands(String),
    /// A key attribute is missing from the schema or from the request.
    #[error("missing key definition: {0}")]
    MissingKeyDefinition(String),
    /// More than two key attributes were declared.
    #[error("too many keys: a table has at most 2 key attributes, got {0}")]
    TooManyKeys(usize),
    /// The store reported that the table or stream does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The transport or the store failed.
    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn unsupported(kind: &'static str, target: impl Into<String>) -> Self {
        Self::UnsupportedValueKind {
            kind,
            target: target.into(),
        }
    }

    /// Map the store's "resource not found" onto [`Error::NotFound`].
    #[must_use]
    pub(crate) fn not_found_as(self, resource: &str) -> Self {
        match &self {
            Self::TransportFailure(err) if err.service().is_some_and(|e| e.is_not_found()) => {
                Self::NotFound(resource.to_owned())
            }
            _ => self,
        }
    }

    /// Whether this is [`Error::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The count loop stopped early. Carries what was summed before the failure.
#[derive(Debug, Error)]
#[error("count stopped after {} requests: {source}", .totals.requests)]
pub struct CountError {
    /// Totals accumulated over the pages that succeeded.
    pub totals: CountTotals,
    /// Why the loop stopped.
    #[source]
    pub source: Error,
}
