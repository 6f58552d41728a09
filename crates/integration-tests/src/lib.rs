//! Integration tests for the Bazaar storefront.
//!
//! Each test starts the full router on an ephemeral local port and talks to
//! it over HTTP with a cookie-keeping client, so session state flows between
//! requests the way it does in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - Public catalog endpoints
//! - `admin_gate` - Admin gate, unauthorized page, demo logins
//! - `admin_api` - Admin mutations and reports

use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::fixtures::Fixtures;
use bazaar_storefront::routes;
use bazaar_storefront::services::Catalog;
use bazaar_storefront::state::AppState;
use reqwest::{Client, redirect};
use tokio::task::JoinHandle;

/// A storefront running in the background for the duration of a test.
pub struct TestServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over the embedded fixtures with no gate delay.
    ///
    /// # Panics
    ///
    /// Panics if the fixtures fail to load or no local port can be bound.
    pub async fn start() -> Self {
        let fixtures = Fixtures::embedded().expect("embedded fixtures load");
        let state = AppState::new(test_config(), Catalog::new(fixtures));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, routes::app(state))
                .await
                .expect("server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Default configuration with the admin gate delay removed.
///
/// # Panics
///
/// Panics if the built-in defaults fail to parse.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(|key| (key == "ADMIN_GATE_DELAY_MS").then(|| "0".to_string()))
        .expect("default configuration")
}

/// A client that keeps cookies and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
