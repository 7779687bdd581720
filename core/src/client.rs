//! Shared starting point for endpoint call-sites.
//!
//! # Design
//! `RestClient` holds only a `ClientConfig` and carries no mutable state
//! between calls. `start` hands out a fresh `RequestBuilder` with the base URL,
//! API key, timeouts and guard mode already applied; each call-site chains its
//! own path, method and body onto it and executes it once.

use crate::builder::RequestBuilder;
use crate::config::ClientConfig;

#[derive(Debug, Clone)]
pub struct RestClient {
    config: ClientConfig,
}

impl RestClient {
    pub fn new(mut config: ClientConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    /// Client for `base_url` authorized with `api_key`, other settings default.
    pub fn with_api_key(api_key: &str, base_url: &str) -> Self {
        Self::new(ClientConfig::new(base_url).with_api_key(api_key))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A builder pre-configured from this client's settings.
    pub fn start(&self) -> RequestBuilder {
        let builder = RequestBuilder::new()
            .set_guard_mode(self.config.guard_mode)
            .set_base_url(self.config.base_url.clone())
            .set_connect_timeout_ms(self.config.connect_timeout_ms)
            .set_read_timeout_ms(self.config.read_timeout_ms);
        match &self.config.api_key {
            Some(api_key) => builder.set_authorization_token(api_key),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardMode;
    use std::time::Duration;

    #[test]
    fn start_applies_client_settings() {
        let client = RestClient::new(
            ClientConfig::new("http://localhost:9011")
                .with_api_key("bf69486b")
                .with_timeouts(250, 750),
        );
        let request = client
            .start()
            .append_raw_uri("/api/application")
            .set_method_get()
            .finalize()
            .unwrap();

        assert_eq!(request.url, "http://localhost:9011/api/application");
        assert_eq!(request.headers, vec!["Authorization:bf69486b"]);
        assert_eq!(request.connect_timeout, Duration::from_millis(250));
        assert_eq!(request.read_timeout, Duration::from_millis(750));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = RestClient::with_api_key("key", "http://localhost:9011/");
        assert_eq!(client.start().url(), Some("http://localhost:9011"));
    }

    #[test]
    fn no_api_key_means_no_authorization_header() {
        let client = RestClient::new(ClientConfig::new("http://localhost:9011"));
        assert!(client.start().header_lines().is_empty());
    }

    #[test]
    fn builders_are_independent() {
        let client = RestClient::with_api_key("key", "http://localhost:9011");
        let first = client.start().append_path_segment("user");
        let second = client.start();
        assert_eq!(first.url(), Some("http://localhost:9011/user"));
        assert_eq!(second.url(), Some("http://localhost:9011"));
    }

    #[test]
    fn guard_mode_is_carried_to_builders() {
        let client = RestClient::new(ClientConfig::new("http://h").with_guard_mode(GuardMode::Corrected));
        let builder = client.start().set_basic_authorization("user", "pass");
        assert_eq!(
            builder.header_lines(),
            vec!["Authorization: Basic dXNlcjpwYXNz"]
        );
    }
}
