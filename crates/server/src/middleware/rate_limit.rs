//! Global request throttle for the AVS actions

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};

use crate::error::AppError;

/// Rate limiter shared by every request
pub type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Limiter allowing `requests_per_second`, with a burst of the same size.
/// Zero is treated as one.
pub fn create_rate_limiter(requests_per_second: u32) -> SharedRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Whole seconds to advertise in `Retry-After`, at least one
fn retry_after_secs(wait: Duration) -> u64 {
    wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
}

pub async fn rate_limit_middleware(request: Request<Body>, next: Next) -> Response {
    let Some(limiter) = request.extensions().get::<SharedRateLimiter>().cloned() else {
        return next.run(request).await;
    };

    if let Err(not_until) = limiter.check() {
        let wait = not_until.wait_time_from(DefaultClock::default().now());
        let secs = retry_after_secs(wait).max(1);
        tracing::warn!(path = %request.uri().path(), retry_after = secs, "Rate limit exceeded");

        let mut response =
            AppError::RateLimited("Rate limit exceeded. Please try again later.".to_string())
                .into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        return response;
    }

    next.run(request).await
}
