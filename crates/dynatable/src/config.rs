use std::{env, time::Duration};

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit table name. When set it overrides the registry-derived name,
    /// which is useful against pre-provisioned tables.
    pub table_name: Option<String>,
    /// Custom endpoint URL, e.g. a DynamoDB Local instance.
    pub endpoint_url: Option<String>,
    /// Item attribute holding the time-to-live epoch (default: "ttl")
    pub ttl_attribute: String,
    /// Seconds between table-state polls (default: 2)
    pub wait_poll_seconds: u64,
    /// Maximum table-state polls before giving up (default: 60)
    pub wait_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNATABLE_TABLE_NAME` - Explicit table name (default: unset, derived from registry)
    /// - `AWS_ENDPOINT_URL` - Custom endpoint, e.g. DynamoDB Local (default: unset)
    /// - `DYNATABLE_TTL_ATTRIBUTE` - TTL attribute name (default: "ttl")
    /// - `DYNATABLE_WAIT_POLL_SECONDS` - Seconds between table-state polls (default: 2)
    /// - `DYNATABLE_WAIT_MAX_ATTEMPTS` - Maximum table-state polls (default: 60)
    pub fn from_env() -> Self {
        Self {
            table_name: env::var("DYNATABLE_TABLE_NAME").ok(),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),
            ttl_attribute: env::var("DYNATABLE_TTL_ATTRIBUTE").unwrap_or_else(|_| "ttl".to_string()),
            wait_poll_seconds: env::var("DYNATABLE_WAIT_POLL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            wait_max_attempts: env::var("DYNATABLE_WAIT_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Get the poll interval as a Duration.
    pub fn wait_poll_interval(&self) -> Duration {
        Duration::from_secs(self.wait_poll_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_poll_interval_conversion() {
        let config = Config {
            table_name: None,
            endpoint_url: None,
            ttl_attribute: "ttl".to_string(),
            wait_poll_seconds: 5,
            wait_max_attempts: 10,
        };

        assert_eq!(config.wait_poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("DYNATABLE_TABLE_NAME");
        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("DYNATABLE_TTL_ATTRIBUTE");
        env::remove_var("DYNATABLE_WAIT_POLL_SECONDS");
        env::remove_var("DYNATABLE_WAIT_MAX_ATTEMPTS");

        let config = Config::from_env();

        assert_eq!(config.table_name, None);
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.ttl_attribute, "ttl");
        assert_eq!(config.wait_poll_seconds, 2);
        assert_eq!(config.wait_max_attempts, 60);
    }
}
