//! Lazy, once-initialized DynamoDB client.
//!
//! The client is not constructed until first use and is then shared,
//! effectively read-only, for the lifetime of the owning [`Connection`].
//! `tokio::sync::OnceCell` guards the first-access race: two concurrent
//! callers observe a single initialization.

use aws_sdk_dynamodb::Client;
use tokio::sync::OnceCell;

use crate::config::Config;

/// Lazily established DynamoDB session handle.
#[derive(Debug)]
pub struct Connection {
    endpoint_url: Option<String>,
    client: OnceCell<Client>,
}

impl Connection {
    /// Create an unconnected handle. No network I/O happens here.
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint_url: config.endpoint_url.clone(),
            client: OnceCell::new(),
        }
    }

    /// Get the shared client, establishing it on first access.
    ///
    /// Uses the AWS SDK default credential/region chain, honoring a custom
    /// endpoint when configured. No explicit teardown is required.
    pub async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
                if let Some(endpoint) = &self.endpoint_url {
                    loader = loader.endpoint_url(endpoint.as_str());
                }
                let config = loader.load().await;
                tracing::debug!("dynamodb client initialized");
                Client::new(&config)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_does_not_connect() {
        let config = Config {
            table_name: None,
            endpoint_url: Some("http://localhost:8000".to_string()),
            ttl_attribute: "ttl".to_string(),
            wait_poll_seconds: 2,
            wait_max_attempts: 60,
        };
        let connection = Connection::new(&config);
        assert!(connection.client.get().is_none());
    }
}
