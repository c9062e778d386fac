//! Soccer API example: geography, fixtures and cached lookups.
//!
//! Run with tracing enabled:
//! ```sh
//! SPORTMONKS_API_TOKEN=... RUST_LOG=debug,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example soccer --features soccer,tracing
//! ```
//!
//! Optionally log to a file:
//! ```sh
//! LOG_FILE=soccer.log SPORTMONKS_API_TOKEN=... RUST_LOG=debug cargo run --example soccer --features soccer,tracing
//! ```

use std::fs::File;
use std::sync::Arc;

use chrono::{Days, Utc};
use sportmonks_client::Config;
use sportmonks_client::cache::{LookupCache, LookupKind, SupportsLookup as _};
use sportmonks_client::request::Includes;
use sportmonks_client::soccer::Client;
use sportmonks_client::soccer::types::request::FixturesRequest;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

const API_TOKEN_VAR: &str = "SPORTMONKS_API_TOKEN";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let api_token = std::env::var(API_TOKEN_VAR)?;
    let config = Config::builder()
        .timezone("Europe/Amsterdam")
        .lookup_cache(Arc::new(LookupCache::default()))
        .build();
    let client = Client::new(&api_token, config)?;

    match client.healthcheck().await {
        Ok(health) => info!(endpoint = "healthcheck", %health),
        Err(e) => error!(endpoint = "healthcheck", error = %e),
    }

    match client.all_continents("countries").await {
        Ok(continents) => {
            for continent in &continents {
                let countries = continent["countries"].as_array().map_or(0, Vec::len);
                info!(endpoint = "continents", name = %continent["name"], countries);
            }
        }
        Err(e) => error!(endpoint = "continents", error = %e),
    }

    let today = Utc::now().date_naive();
    let week = today.checked_add_days(Days::new(7)).unwrap_or(today);
    let request = FixturesRequest::builder()
        .includes(["localTeam", "visitorTeam"])
        .build();
    match client.fixtures_between(today, week, &request).await {
        Ok(fixtures) => info!(endpoint = "fixtures_between", count = fixtures.len()),
        Err(e) => error!(endpoint = "fixtures_between", error = %e),
    }

    // Second lookup is served from the cache.
    for _ in 0..2 {
        match client.lookup(LookupKind::Country, 462, &Includes::none()).await {
            Ok(country) => info!(
                endpoint = "lookup",
                found = country.is_some(),
                requests = client.requests_made()
            ),
            Err(e) => error!(endpoint = "lookup", error = %e),
        }
    }

    Ok(())
}
