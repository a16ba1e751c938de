use std::net::SocketAddr;

/// Runtime configuration for the journal server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    /// Accepted bearer tokens; empty disables authentication
    pub api_keys: Vec<String>,
    pub rate_limit_per_minute: u32,
    /// Users need at least this many trades to appear on the leaderboard
    pub leaderboard_min_trades: u32,
    pub leaderboard_default_limit: usize,
    pub max_body_bytes: usize,
}

/// Minimum accepted API key length (256 bits of base64)
pub const MIN_API_KEY_LENGTH: usize = 32;

/// Hard cap on leaderboard page size
pub const LEADERBOARD_MAX_LIMIT: usize = 100;

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_keys: Vec::new(),
            rate_limit_per_minute: 100,
            leaderboard_min_trades: 5,
            leaderboard_default_limit: 25,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ServerConfig {
        let mut config = ServerConfig::default();

        if let Ok(addr) = std::env::var("BIND_ADDRESS") {
            match addr.parse::<SocketAddr>() {
                Ok(value) => config.bind_address = value,
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse BIND_ADDRESS '{}': {}, using default: {}",
                        addr,
                        e,
                        config.bind_address
                    );
                }
            }
        }

        if let Ok(keys) = std::env::var("API_KEYS") {
            config.api_keys = parse_api_keys(&keys);
        }

        if let Ok(rate) = std::env::var("RATE_LIMIT_PER_MINUTE") {
            match rate.parse::<u32>() {
                Ok(value) if (1..=10_000).contains(&value) => {
                    config.rate_limit_per_minute = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid RATE_LIMIT_PER_MINUTE value: {} (must be between 1 and 10000), using default: {}",
                        value,
                        config.rate_limit_per_minute
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse RATE_LIMIT_PER_MINUTE '{}': {}, using default: {}",
                        rate,
                        e,
                        config.rate_limit_per_minute
                    );
                }
            }
        }

        if let Ok(min_trades) = std::env::var("LEADERBOARD_MIN_TRADES") {
            if let Ok(value) = min_trades.parse::<u32>() {
                if value <= 1000 {
                    config.leaderboard_min_trades = value;
                }
            }
        }

        if let Ok(limit) = std::env::var("LEADERBOARD_DEFAULT_LIMIT") {
            if let Ok(value) = limit.parse::<usize>() {
                if (1..=LEADERBOARD_MAX_LIMIT).contains(&value) {
                    config.leaderboard_default_limit = value;
                }
            }
        }

        if let Ok(max_body) = std::env::var("MAX_BODY_BYTES") {
            if let Ok(value) = max_body.parse::<usize>() {
                if (1024..=10 * 1024 * 1024).contains(&value) {
                    config.max_body_bytes = value;
                }
            }
        }

        config
    }

    /// Clamp a requested leaderboard size into 1..=100, falling back to the default
    pub fn leaderboard_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.leaderboard_default_limit)
            .clamp(1, LEADERBOARD_MAX_LIMIT)
    }
}

/// Split a comma-separated key list, dropping blanks and keys that are too short
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .filter(|key| {
            if key.len() < MIN_API_KEY_LENGTH {
                tracing::error!(
                    "Ignoring API key that is too weak (length: {}, minimum: {})",
                    key.len(),
                    MIN_API_KEY_LENGTH
                );
                false
            } else {
                true
            }
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address.port(), 3000);
        assert!(config.api_keys.is_empty());
        assert_eq!(config.rate_limit_per_minute, 100);
        assert_eq!(config.leaderboard_min_trades, 5);
    }

    #[test]
    fn test_parse_api_keys_filters_weak_and_blank() {
        let strong = "k".repeat(MIN_API_KEY_LENGTH);
        let raw = format!(" {} , short, ,{}x", strong, strong);
        let keys = parse_api_keys(&raw);
        assert_eq!(keys, vec![strong.clone(), format!("{}x", strong)]);
    }

    #[test]
    fn test_leaderboard_limit_clamped() {
        let config = ServerConfig::default();
        assert_eq!(config.leaderboard_limit(None), 25);
        assert_eq!(config.leaderboard_limit(Some(0)), 1);
        assert_eq!(config.leaderboard_limit(Some(500)), 100);
        assert_eq!(config.leaderboard_limit(Some(10)), 10);
    }
}
