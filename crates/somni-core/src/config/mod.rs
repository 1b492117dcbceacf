//! Client configuration for the record store endpoint.
//!
//! The endpoint is environment-specific and always supplied by the caller
//! (flag, env var, or build-time wiring); nothing here is hard-coded to a
//! deployment. Timeouts are finite so a dead server can never hang a call.

use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint and timeout settings for `SleepSyncClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Record store base URL, `http://` or `https://`
    pub endpoint: String,
    /// Applied to the TCP connect phase of every request
    pub connect_timeout: Duration,
    /// Applied to the whole request, connect included
    pub request_timeout: Duration,
}

impl SyncConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_default_timeouts() {
        let config = SyncConfig::new("https://api.example.com");
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn with_timeouts_overrides_defaults() {
        let config = SyncConfig::new("https://api.example.com")
            .with_timeouts(Duration::from_millis(250), Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }
}
