//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use axum::response::IntoResponse;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::error::AppError;

/// Token bucket parameters for one group of routes.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// Seconds to replenish one request.
    pub per_second: u64,
    pub burst: u32,
}

/// Registration and confirmation: 1 request per 2 seconds, burst 10.
pub const PUBLIC: RateLimit = RateLimit {
    per_second: 2,
    burst: 10,
};

/// Login: 1 request per 4 seconds, burst 5.
pub const LOGIN: RateLimit = RateLimit {
    per_second: 4,
    burst: 5,
};

/// Applies a per-client-IP rate limit to every route of `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests` with
/// `{ "Status": false, "Error": "Too many requests" }` and a `Retry-After`
/// header.
///
/// # Key Extraction
///
/// - `behind_proxy = false` - socket peer address (requires connect info)
/// - `behind_proxy = true` - `X-Forwarded-For` / `X-Real-IP` / `Forwarded`
///   headers, falling back to the peer address
///
/// # Panics
///
/// Panics if `limit` has a zero period or burst.
///
/// # Example
///
/// ```rust,ignore
/// let login = rate_limit::apply(api::routes::login_routes(), rate_limit::LOGIN, false);
/// ```
pub fn apply<S>(router: Router<S>, limit: RateLimit, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(layer(SmartIpKeyExtractor, limit))
    } else {
        router.layer(layer(PeerIpKeyExtractor, limit))
    }
}

fn layer<K>(
    key_extractor: K,
    limit: RateLimit,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(limit.per_second)
            .burst_size(limit.burst)
            .finish()
            .expect("rate limit period and burst must be non-zero"),
    );

    GovernorLayer::new(governor_conf).error_handler(|e| AppError::from(e).into_response())
}
