//! HTTP client shared by remote providers.

use std::time::Duration;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client with rustls TLS, connect and request timeouts, and a
/// `daat/{version}` user agent.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(request_timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .user_agent(concat!("daat/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// [`build_client`] with [`REQUEST_TIMEOUT`], falling back to reqwest's
/// defaults if the builder fails.
#[must_use]
pub fn default_client() -> reqwest::Client {
    build_client(REQUEST_TIMEOUT).unwrap_or_else(|e| {
        tracing::warn!("falling back to default HTTP client: {e}");
        reqwest::Client::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_custom_timeout() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
