use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating user-supplied trade data
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Invalid fees: {0}")]
    InvalidFees(String),

    #[error("Invalid dates: {0}")]
    InvalidDates(String),

    #[error("Value must be finite")]
    MustBeFinite,
}

/// Failures reported by the persistence gateway.
///
/// Variants are kept distinct so callers can tell a missing row apart from
/// a failed write or an unreachable store. Nothing here is retried.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GatewayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed row: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Whether the failure is likely transient (pool exhausted, connection dropped)
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Unavailable(_))
    }
}

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::InvalidRequest(error.to_string())
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::NotFound(msg) => ApiError::NotFound(msg),
            GatewayError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            GatewayError::WriteFailed(_) | GatewayError::Malformed(_) => {
                ApiError::InternalServerError(error.to_string())
            }
        }
    }
}
