//! SportMonks Soccer API (v2.0) client.
//!
//! **Feature flag:** `soccer` (required to use this module)
//!
//! Every method builds an endpoint path, delegates to the generic
//! [`crate::Client`] for pagination and normalization, and returns plain JSON:
//! a list of records or a single object with all `data` wrappers removed.
//!
//! ## Available Endpoints
//!
//! | Endpoint | Method |
//! |----------|--------|
//! | `/continents[/{id}]` | [`Client::all_continents`], [`Client::continent_by_id`] |
//! | `/countries[/{id}]` | [`Client::all_countries`], [`Client::country_by_id`] |
//! | `/leagues[/{id}]` | [`Client::all_leagues`], [`Client::league_by_id`] |
//! | `/seasons[/{id}]` | [`Client::all_seasons`], [`Client::season_by_id`], [`Client::season_results`] |
//! | `/fixtures/{id}` | [`Client::fixture_by_id`] |
//! | `/fixtures/date/{date}` | [`Client::fixtures_at`] |
//! | `/fixtures/between/{from}/{to}[/{team_id}]` | [`Client::fixtures_between`], [`Client::fixtures_between_by_team_id`] |
//! | `/fixtures/season/{id}/between/{from}/{to}` | [`Client::fixtures_between_by_season_id`] |
//! | `/fixtures/multi/{ids}` | [`Client::fixtures_by_multiple_ids`] |
//! | `/livescores[/now]` | [`Client::fixtures_today`], [`Client::fixtures_in_play`] |
//! | `/commentaries/fixture/{id}` | [`Client::commentaries_by_fixture_id`] |
//! | `/highlights[/fixture/{id}]` | [`Client::all_video_highlights`], [`Client::video_highlights_by_fixture_id`] |
//! | `/head2head/{team}/{team}` | [`Client::head_to_head_by_team_ids`] |
//! | `/standings/season[/live]/{id}` | [`Client::standings_by_season_id`], [`Client::live_standings_by_season_id`] |
//! | `/teams/{id}`, `/teams/season/{id}` | [`Client::team_by_id`], [`Client::teams_by_season_id`], [`Client::team_stats`] |
//! | `/players/{id}` | [`Client::player_by_id`] |
//! | `/topscorers/season/{id}` | [`Client::topscorers_by_season_id`] |
//! | `/venues/{id}`, `/venues/season/{id}` | [`Client::venue_by_id`], [`Client::venues_by_season_id`] |
//! | `/rounds/{id}`, `/rounds/season/{id}` | [`Client::round_by_id`], [`Client::rounds_by_season_id`] |
//! | `/odds/fixture/{id}[/bookmaker/{id}\|/market/{id}]` | [`Client::pre_match_odds`] |
//! | `/odds/inplay/fixture/{id}`, `/odds/inplay/live` | [`Client::in_play_odds`] |
//! | `/coaches/{id}` | [`Client::coach_by_id`] |
//! | `/stages/{id}`, `/stages/season/{id}` | [`Client::stage_by_id`], [`Client::stages_by_season_id`] |
//! | `/bookmakers[/{id}]` | [`Client::all_bookmakers`], [`Client::bookmaker_by_id`] |
//! | `/markets[/{id}]` | [`Client::all_markets`], [`Client::market_by_id`] |
//! | `/squad/season/{id}/team/{id}` | [`Client::squad_by_season_and_team_id`] |
//! | `/tvstations/fixture/{id}` | [`Client::tv_stations_by_fixture_id`] |
//! | `/healthcheck` | [`Client::healthcheck`] |
//!
//! # Example
//!
//! ```no_run
//! use sportmonks_client::Config;
//! use sportmonks_client::soccer::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("my-token", Config::default())?;
//!
//! let continents = client.all_continents("countries").await?;
//! for continent in continents {
//!     println!("{}", continent["name"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::{Client, DEFAULT_HOST};
