//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Per-IP limits on the prediction routes using tower_governor. GCRA needs
//! no background task; each key only stores its theoretical arrival time.

use governor::middleware::StateInformationMiddleware;
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config emitting X-RateLimit-* headers
pub type PredictionGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Seconds to replenish one request
    pub per_second: u64,
    /// Requests that can be made immediately
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Predictions are cheap; allow a page's worth of bursts per client
        Self {
            per_second: 1,
            burst_size: 20,
        }
    }
}

/// Build a governor config for the prediction routes.
///
/// Keys on the peer IP, so the server must be run with
/// `into_make_service_with_connect_info::<SocketAddr>()`. `None` if either
/// quota value is zero.
pub fn create_governor_config(config: &RateLimitConfig) -> Option<Arc<PredictionGovernorConfig>> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.per_second, 1);
        assert_eq!(config.burst_size, 20);
        assert!(create_governor_config(&config).is_some());
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        let config = RateLimitConfig {
            per_second: 1,
            burst_size: 0,
        };
        assert!(create_governor_config(&config).is_none());
    }
}
