//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::controller::ControllerOptions;
use crate::domain::types::DEFAULT_ITEMS_PER_PAGE;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the mock payout backend.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Fill the ledger with fixture sellers and payouts on startup.
    #[serde(default)]
    pub seed_fixtures: bool,
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the `list_payouts` client.
pub struct ClientConfig {
    /// Full URL of the payouts list endpoint.
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_page_size() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    /// `None` disables the transport timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            search_debounce: (self.search_debounce_ms > 0)
                .then(|| Duration::from_millis(self.search_debounce_ms)),
            ..ControllerOptions::default()
        }
    }
}
