#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;

use crate::request::{Includes, Params};

/// Narrows fixture listings to leagues, and their odds to markets and bookmakers.
///
/// Empty lists mean "all" and are not sent.
#[derive(Debug, Clone, Builder, Default)]
#[non_exhaustive]
pub struct FixturesRequest {
    #[builder(default)]
    pub leagues: Vec<u64>,
    #[builder(default)]
    pub markets: Vec<u64>,
    #[builder(default)]
    pub bookmakers: Vec<u64>,
    #[builder(into, default)]
    pub includes: Includes,
}

impl FixturesRequest {
    pub(crate) fn params(&self) -> Params {
        self.odds_params().with_list("leagues", &self.leagues)
    }

    /// Filters for calls that do not list by league: `leagues` is left out.
    pub(crate) fn odds_params(&self) -> Params {
        Params::new()
            .with_list("markets", &self.markets)
            .with_list("bookmakers", &self.bookmakers)
    }
}

#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct StandingsRequest {
    pub season_id: u64,
    /// Group of a tournament stage, e.g. a World Cup group.
    pub group_id: Option<u64>,
    /// Objects to include in every standing row, such as `team`.
    #[builder(into, default)]
    pub includes: Includes,
}

impl StandingsRequest {
    pub(crate) fn params(&self) -> Params {
        Params::new().with_opt("group_id", self.group_id)
    }
}

/// Pre-match odds of a fixture. A bookmaker takes precedence over a market.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct PreMatchOddsRequest {
    pub fixture_id: u64,
    pub bookmaker_id: Option<u64>,
    pub market_id: Option<u64>,
}
