use crate::domain::errors::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Global rate limiter
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a limiter allowing `requests_per_minute`; zero is treated as one
pub fn create_rate_limiter(requests_per_minute: u32) -> GlobalRateLimiter {
    let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Middleware to apply rate limiting
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match limiter.check() {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!("Rate limit exceeded");
            Err(ApiError::RateLimitExceeded)
        }
    }
}
