use crate::domain::errors::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Set of bearer tokens accepted by the API
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn new<I: IntoIterator<Item = String>>(keys: I) -> Self {
        let keys: HashSet<String> = keys.into_iter().collect();
        if keys.is_empty() {
            tracing::warn!("No API keys configured: authentication is disabled");
        } else {
            tracing::info!("✓ API authentication initialized with {} valid key(s)", keys.len());
        }
        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Middleware to require a valid `Authorization: Bearer <key>` header.
///
/// Passes everything through when no keys are configured.
pub async fn require_auth(
    State(keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !keys.is_enabled() {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(auth) => match auth.strip_prefix("Bearer ") {
            Some(key) if keys.is_valid(key) => Ok(next.run(request).await),
            Some(_) => {
                tracing::warn!("Invalid API key attempted");
                Err(ApiError::Unauthorized("Invalid API key".to_string()))
            }
            None => {
                tracing::warn!("Invalid Authorization header format (expected Bearer token)");
                Err(ApiError::Unauthorized(
                    "Expected Authorization: Bearer <key>".to_string(),
                ))
            }
        },
        None => {
            tracing::warn!("Missing Authorization header");
            Err(ApiError::Unauthorized(
                "Missing Authorization header".to_string(),
            ))
        }
    }
}
