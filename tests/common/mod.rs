#![cfg(feature = "soccer")]
#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Deeply nested uses in sub-modules are falsely flagged as being unused"
)]

use httpmock::MockServer;
use serde_json::{Value, json};
use sportmonks_client::soccer::Client;
use sportmonks_client::{ApiVersion, Config};

pub const API_TOKEN: &str = "test-api-token";

/// Path prefix the mock server serves the API under.
pub const BASE_PATH: &str = "/api/v2.0";

#[must_use]
pub fn path(endpoint: &str) -> String {
    format!("{BASE_PATH}/{endpoint}")
}

pub fn client(server: &MockServer) -> anyhow::Result<Client> {
    client_with_config(server, Config::default())
}

pub fn client_with_config(server: &MockServer, config: Config) -> anyhow::Result<Client> {
    Ok(Client::with_host(&server.url(BASE_PATH), API_TOKEN, config)?)
}

pub fn v3_client(server: &MockServer) -> anyhow::Result<Client> {
    let config = Config::builder().api_version(ApiVersion::V3).build();
    client_with_config(server, config)
}

/// `meta` block of page `current` out of `total`, as the v2 API sends it.
#[must_use]
pub fn counter_meta(current: u64, total: u64) -> Value {
    json!({
        "plans": [{"name": "Football Free Plan", "features": "Standard", "request_limit": "180,60"}],
        "pagination": {
            "total": total * 2,
            "count": 2,
            "per_page": 2,
            "current_page": current,
            "total_pages": total,
            "links": {}
        }
    })
}
