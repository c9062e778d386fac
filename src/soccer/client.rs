use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use super::types::request::{FixturesRequest, PreMatchOddsRequest, StandingsRequest};
use crate::Result;
use crate::cache::{LookupCache, LookupKind, SupportsLookup};
use crate::client::{Client as BaseClient, Config};
use crate::error::Error;
use crate::normalize::{Normalized, Object, unwrap_envelope};
use crate::request::{Endpoint, Includes, Params};

/// Base URL of the Soccer API.
pub const DEFAULT_HOST: &str = "https://soccer.sportmonks.com/api/v2.0";

/// HTTP client for the SportMonks Soccer API.
///
/// `includes` arguments accept anything convertible into [`Includes`]: `()`,
/// a comma-free `&str`, arrays, vectors and sets of strings.
#[derive(Clone, Debug)]
pub struct Client {
    client: BaseClient,
}

impl Client {
    /// Creates a client for [`DEFAULT_HOST`].
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Configuration`](crate::error::Kind::Configuration) error
    /// if `api_token` is empty.
    pub fn new(api_token: &str, config: Config) -> Result<Client> {
        Self::with_host(DEFAULT_HOST, api_token, config)
    }

    /// Creates a client for a custom host, such as a proxy or a mock server.
    pub fn with_host(host: &str, api_token: &str, config: Config) -> Result<Client> {
        Ok(Self {
            client: BaseClient::new(host, api_token, config)?,
        })
    }

    /// The generic client this one delegates to.
    #[must_use]
    pub fn base(&self) -> &BaseClient {
        &self.client
    }

    /// Number of HTTP requests sent so far.
    #[must_use]
    pub fn requests_made(&self) -> u64 {
        self.client.requests_made()
    }

    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: Params,
        includes: &Includes,
    ) -> Result<Normalized> {
        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint = %endpoint, includes = %includes, "fetching");

        self.client.get(&endpoint, &params, includes).await
    }

    async fn list(
        &self,
        endpoint: Endpoint,
        params: Params,
        includes: &Includes,
    ) -> Result<Vec<Value>> {
        let records = self.fetch(endpoint, params, includes).await?.into_list()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(count = records.len(), "fetched records");

        Ok(records)
    }

    async fn object(
        &self,
        endpoint: Endpoint,
        params: Params,
        includes: &Includes,
    ) -> Result<Object> {
        self.fetch(endpoint, params, includes).await?.into_object()
    }

    /// Returns the `meta` block of your subscription: plan, sports and pagination defaults.
    ///
    /// There is no dedicated endpoint, so this reads the block from the fast
    /// `continents` response. The whole body is returned if it has no `meta`.
    pub async fn meta(&self) -> Result<Value> {
        let body = self
            .client
            .get_raw(&Endpoint::new("continents"), &Params::new())
            .await?;

        Ok(match body {
            Value::Object(mut map) if map.contains_key("meta") => {
                map.remove("meta").unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    /// Returns the endpoints advertised at the API root.
    pub async fn all_endpoints(&self) -> Result<Value> {
        let body = self.client.get_raw(&Endpoint::root(), &Params::new()).await?;
        let version = self.client.host().path().trim_matches('/').to_owned();

        Ok(match body {
            Value::Object(mut map) if map.contains_key(&version) => {
                map.remove(&version).unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    /// Returns the API health, `"Ok!"` when it is up and running.
    pub async fn healthcheck(&self) -> Result<Value> {
        let body = self
            .client
            .get_raw(&Endpoint::new("healthcheck"), &Params::new())
            .await?;
        Ok(unwrap_envelope(body))
    }

    pub async fn all_continents<I: Into<Includes>>(&self, includes: I) -> Result<Vec<Value>> {
        self.list(Endpoint::new("continents"), Params::new(), &includes.into())
            .await
    }

    pub async fn continent_by_id<I: Into<Includes>>(
        &self,
        continent_id: u64,
        includes: I,
    ) -> Result<Object> {
        let endpoint = Endpoint::new("continents").push(continent_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn all_countries<I: Into<Includes>>(&self, includes: I) -> Result<Vec<Value>> {
        self.list(Endpoint::new("countries"), Params::new(), &includes.into())
            .await
    }

    pub async fn country_by_id<I: Into<Includes>>(
        &self,
        country_id: u64,
        includes: I,
    ) -> Result<Object> {
        let endpoint = Endpoint::new("countries").push(country_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    /// Valid includes are `country`, `season` (the current one) and `seasons`.
    pub async fn all_leagues<I: Into<Includes>>(&self, includes: I) -> Result<Vec<Value>> {
        self.list(Endpoint::new("leagues"), Params::new(), &includes.into())
            .await
    }

    pub async fn league_by_id<I: Into<Includes>>(
        &self,
        league_id: u64,
        includes: I,
    ) -> Result<Object> {
        let endpoint = Endpoint::new("leagues").push(league_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn all_seasons<I: Into<Includes>>(&self, includes: I) -> Result<Vec<Value>> {
        self.list(Endpoint::new("seasons"), Params::new(), &includes.into())
            .await
    }

    pub async fn season_by_id<I: Into<Includes>>(
        &self,
        season_id: u64,
        includes: I,
    ) -> Result<Object> {
        let endpoint = Endpoint::new("seasons").push(season_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    /// Returns the completed fixtures of a season.
    ///
    /// `includes` apply to each result, e.g. `goals` is sent as `results.goals`.
    pub async fn season_results<I: Into<Includes>>(
        &self,
        season_id: u64,
        includes: I,
    ) -> Result<Vec<Value>> {
        let includes = includes.into().nested_under("results");
        let endpoint = Endpoint::new("seasons").push(season_id);

        match self.fetch(endpoint, Params::new(), &includes).await?.take("results")? {
            Value::Array(results) => Ok(results),
            Value::Null => Ok(Vec::new()),
            _ => Err(Error::schema("season `results` must be a list")),
        }
    }

    /// Only `markets` and `bookmakers` of `request` apply to a single fixture.
    pub async fn fixture_by_id(&self, fixture_id: u64, request: &FixturesRequest) -> Result<Object> {
        let endpoint = Endpoint::new("fixtures").push(fixture_id);
        self.object(endpoint, request.odds_params(), &request.includes).await
    }

    /// Fixtures of one day. As for [`Self::fixture_by_id`], `leagues` is not sent.
    pub async fn fixtures_at(&self, date: NaiveDate, request: &FixturesRequest) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("fixtures").push("date").push(date);
        self.list(endpoint, request.odds_params(), &request.includes).await
    }

    /// Fixtures between two dates, both inclusive.
    pub async fn fixtures_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        request: &FixturesRequest,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("fixtures").push("between").push(start).push(end);
        self.list(endpoint, request.params(), &request.includes).await
    }

    pub async fn fixtures_between_by_team_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        team_id: u64,
        request: &FixturesRequest,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("fixtures")
            .push("between")
            .push(start)
            .push(end)
            .push(team_id);
        self.list(endpoint, request.params(), &request.includes).await
    }

    pub async fn fixtures_between_by_season_id(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        season_id: u64,
        request: &FixturesRequest,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("fixtures")
            .push("season")
            .push(season_id)
            .push("between")
            .push(start)
            .push(end);
        self.list(endpoint, request.params(), &request.includes).await
    }

    pub async fn fixtures_by_multiple_ids(
        &self,
        fixture_ids: &[u64],
        request: &FixturesRequest,
    ) -> Result<Vec<Value>> {
        if fixture_ids.is_empty() {
            return Err(Error::configuration("at least one fixture id is required"));
        }

        let ids = fixture_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let endpoint = Endpoint::new("fixtures").push("multi").push(ids);
        self.list(endpoint, request.params(), &request.includes).await
    }

    /// All of today's fixtures, whether played, in play or upcoming.
    pub async fn fixtures_today(&self, request: &FixturesRequest) -> Result<Vec<Value>> {
        self.list(Endpoint::new("livescores"), request.params(), &request.includes)
            .await
    }

    /// Fixtures in play. The upstream counts fixtures starting within 45 minutes
    /// and those ended less than 30 minutes ago as in play.
    pub async fn fixtures_in_play(&self, request: &FixturesRequest) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("livescores").push("now");
        self.list(endpoint, request.params(), &request.includes).await
    }

    pub async fn commentaries_by_fixture_id(&self, fixture_id: u64) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("commentaries").push("fixture").push(fixture_id);
        self.list(endpoint, Params::new(), &Includes::none()).await
    }

    pub async fn all_video_highlights<I: Into<Includes>>(&self, includes: I) -> Result<Vec<Value>> {
        self.list(Endpoint::new("highlights"), Params::new(), &includes.into())
            .await
    }

    pub async fn video_highlights_by_fixture_id<I: Into<Includes>>(
        &self,
        fixture_id: u64,
        includes: I,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("highlights").push("fixture").push(fixture_id);
        self.list(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn head_to_head_by_team_ids<I: Into<Includes>>(
        &self,
        team_id: u64,
        other_team_id: u64,
        includes: I,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("head2head").push(team_id).push(other_team_id);
        self.list(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn standings_by_season_id(&self, request: &StandingsRequest) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("standings")
            .push("season")
            .push(request.season_id);
        let includes = request.includes.prefixed("standings");
        self.list(endpoint, request.params(), &includes).await
    }

    pub async fn live_standings_by_season_id(
        &self,
        request: &StandingsRequest,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("standings")
            .push("season")
            .push("live")
            .push(request.season_id);
        let includes = request.includes.prefixed("standings");
        self.list(endpoint, request.params(), &includes).await
    }

    pub async fn team_by_id<I: Into<Includes>>(&self, team_id: u64, includes: I) -> Result<Object> {
        let endpoint = Endpoint::new("teams").push(team_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn teams_by_season_id<I: Into<Includes>>(
        &self,
        season_id: u64,
        includes: I,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("teams").push("season").push(season_id);
        self.list(endpoint, Params::new(), &includes.into()).await
    }

    /// Returns the `stats` of a team.
    pub async fn team_stats(&self, team_id: u64) -> Result<Value> {
        let endpoint = Endpoint::new("teams").push(team_id);
        self.fetch(endpoint, Params::new(), &Includes::from("stats"))
            .await?
            .take("stats")
    }

    pub async fn player_by_id<I: Into<Includes>>(
        &self,
        player_id: u64,
        includes: I,
    ) -> Result<Object> {
        let endpoint = Endpoint::new("players").push(player_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    /// Top scorers of a season, grouped by stage.
    pub async fn topscorers_by_season_id<I: Into<Includes>>(
        &self,
        season_id: u64,
        includes: I,
    ) -> Result<Object> {
        let endpoint = Endpoint::new("topscorers").push("season").push(season_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn venue_by_id(&self, venue_id: u64) -> Result<Object> {
        let endpoint = Endpoint::new("venues").push(venue_id);
        self.object(endpoint, Params::new(), &Includes::none()).await
    }

    pub async fn venues_by_season_id(&self, season_id: u64) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("venues").push("season").push(season_id);
        self.list(endpoint, Params::new(), &Includes::none()).await
    }

    pub async fn round_by_id<I: Into<Includes>>(&self, round_id: u64, includes: I) -> Result<Object> {
        let endpoint = Endpoint::new("rounds").push(round_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn rounds_by_season_id<I: Into<Includes>>(
        &self,
        season_id: u64,
        includes: I,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("rounds").push("season").push(season_id);
        self.list(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn pre_match_odds(&self, request: &PreMatchOddsRequest) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("odds").push("fixture").push(request.fixture_id);
        let endpoint = match (request.bookmaker_id, request.market_id) {
            (Some(bookmaker_id), _) => endpoint.push("bookmaker").push(bookmaker_id),
            (None, Some(market_id)) => endpoint.push("market").push(market_id),
            (None, None) => endpoint,
        };
        self.list(endpoint, Params::new(), &Includes::none()).await
    }

    /// In-play odds of one fixture, or of every live fixture when `fixture_id` is `None`.
    pub async fn in_play_odds(&self, fixture_id: Option<u64>) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("odds").push("inplay");
        let endpoint = match fixture_id {
            Some(fixture_id) => endpoint.push("fixture").push(fixture_id),
            None => endpoint.push("live"),
        };
        self.list(endpoint, Params::new(), &Includes::none()).await
    }

    pub async fn coach_by_id(&self, coach_id: u64) -> Result<Object> {
        let endpoint = Endpoint::new("coaches").push(coach_id);
        self.object(endpoint, Params::new(), &Includes::none()).await
    }

    pub async fn stage_by_id<I: Into<Includes>>(&self, stage_id: u64, includes: I) -> Result<Object> {
        let endpoint = Endpoint::new("stages").push(stage_id);
        self.object(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn stages_by_season_id<I: Into<Includes>>(
        &self,
        season_id: u64,
        includes: I,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("stages").push("season").push(season_id);
        self.list(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn all_bookmakers(&self) -> Result<Vec<Value>> {
        self.list(Endpoint::new("bookmakers"), Params::new(), &Includes::none())
            .await
    }

    pub async fn bookmaker_by_id(&self, bookmaker_id: u64) -> Result<Object> {
        let endpoint = Endpoint::new("bookmakers").push(bookmaker_id);
        self.object(endpoint, Params::new(), &Includes::none()).await
    }

    pub async fn all_markets(&self) -> Result<Vec<Value>> {
        self.list(Endpoint::new("markets"), Params::new(), &Includes::none())
            .await
    }

    pub async fn market_by_id(&self, market_id: u64) -> Result<Object> {
        let endpoint = Endpoint::new("markets").push(market_id);
        self.object(endpoint, Params::new(), &Includes::none()).await
    }

    /// Players of a team during a season. Valid includes are `player` and `position`.
    pub async fn squad_by_season_and_team_id<I: Into<Includes>>(
        &self,
        season_id: u64,
        team_id: u64,
        includes: I,
    ) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("squad")
            .push("season")
            .push(season_id)
            .push("team")
            .push(team_id);
        self.list(endpoint, Params::new(), &includes.into()).await
    }

    pub async fn tv_stations_by_fixture_id(&self, fixture_id: u64) -> Result<Vec<Value>> {
        let endpoint = Endpoint::new("tvstations").push("fixture").push(fixture_id);
        self.list(endpoint, Params::new(), &Includes::none()).await
    }
}

#[async_trait]
impl SupportsLookup for Client {
    async fn fetch_collection(&self, kind: LookupKind, includes: &Includes) -> Result<Vec<Value>> {
        match kind {
            LookupKind::Continent => self.all_continents(includes).await,
            LookupKind::Country => self.all_countries(includes).await,
            LookupKind::League => self.all_leagues(includes).await,
            LookupKind::Bookmaker => {
                self.list(Endpoint::new("bookmakers"), Params::new(), includes)
                    .await
            }
        }
    }

    fn lookup_cache(&self) -> Option<&LookupCache> {
        self.client.config().lookup_cache().map(AsRef::as_ref)
    }
}
