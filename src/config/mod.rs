//! Configuration for the planner process
//!
//! All knobs live in [`PlannerConfig`]; the defaults are the production
//! settings and the CLI only overrides the interesting ones (endpoint, TTL).

use std::time::Duration;

/// Production endpoint of the game-data GraphQL API
pub const TARKOV_API_URL: &str = "https://api.tarkov.dev/graphql";

/// Planner configuration
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Upstream GraphQL endpoint URL
    pub endpoint: String,

    /// Maximum age at which a cached payload is still served
    pub cache_ttl: Duration,

    /// Overall bound on a single upstream exchange
    pub request_timeout: Duration,

    /// Tighter bound on connection establishment
    pub connect_timeout: Duration,

    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            endpoint: TARKOV_API_URL.to_string(),
            cache_ttl: Duration::from_secs(300), // 5 minutes
            request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(20),
            user_agent: "TarkovRaidPlanner/2.1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.endpoint, TARKOV_API_URL);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.connect_timeout < config.request_timeout);
    }
}
