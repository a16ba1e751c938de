pub mod analytics_handler;
pub mod trade_handler;

use crate::application::services::analytics_service::AnalyticsError;
use crate::application::services::trade_service::TradeError;
use crate::application::state::AppState;
use crate::domain::errors::{ApiError, GatewayError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error body shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg, None),
            ApiError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded".to_string(),
                None,
            ),
            ApiError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(msg),
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
                Some(msg),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error,
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Gateway failures keep the workflow context in the message
fn gateway_failure(context: String, error: &GatewayError) -> ApiError {
    if error.is_transient() {
        ApiError::ServiceUnavailable(context)
    } else {
        ApiError::InternalServerError(context)
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(error: AnalyticsError) -> Self {
        let message = error.to_string();
        match error {
            AnalyticsError::InvalidInput(e) => e.into(),
            AnalyticsError::NoTrades(_) | AnalyticsError::NotComputed(_) => {
                ApiError::NotFound(message)
            }
            AnalyticsError::FetchFailed(e) | AnalyticsError::StoreFailed(e) => {
                gateway_failure(message, &e)
            }
        }
    }
}

/// Body rejections keep axum's 413 for oversized payloads; everything else is a 400
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::InvalidRequest(rejection.body_text())
        }
    }
}

impl From<TradeError> for ApiError {
    fn from(error: TradeError) -> Self {
        match error {
            TradeError::Invalid(e) => e.into(),
            TradeError::Gateway(e) => e.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub store_healthy: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        store_healthy: state.store.is_healthy().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;

    #[test]
    fn test_no_trades_maps_to_not_found() {
        let api: ApiError = AnalyticsError::NoTrades("alice".to_string()).into();
        assert!(matches!(api, ApiError::NotFound(msg) if msg.contains("alice")));
    }

    #[test]
    fn test_blank_user_maps_to_bad_request() {
        let api: ApiError = AnalyticsError::InvalidInput(ValidationError::InvalidUserId("blank".to_string())).into();
        assert_eq!(api.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_gateway_failures_split_on_transience() {
        let unavailable: ApiError =
            AnalyticsError::FetchFailed(GatewayError::Unavailable("pool timed out".to_string()))
                .into();
        assert_eq!(
            unavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let write: ApiError =
            AnalyticsError::StoreFailed(GatewayError::WriteFailed("disk full".to_string())).into();
        match write {
            ApiError::InternalServerError(details) => {
                assert_eq!(details, "Failed to store analytics: Write failed: disk full");
            }
            other => panic!("unexpected mapping: {:?}", other),
        }

        let malformed: ApiError =
            AnalyticsError::FetchFailed(GatewayError::Malformed("bad position 'flat'".to_string()))
                .into();
        match malformed {
            ApiError::InternalServerError(ref details) => {
                assert_eq!(
                    details,
                    "Failed to fetch trades: Malformed row: bad position 'flat'"
                );
            }
            ref other => panic!("unexpected mapping: {:?}", other),
        }
        assert_eq!(
            malformed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_middleware_errors_use_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("Missing Authorization header".to_string())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::RateLimitExceeded.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
