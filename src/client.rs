//! Generic SportMonks client: request building, transport, pagination and
//! normalization for any endpoint.
//!
//! Resource-specific clients such as [`soccer::Client`](crate::soccer::Client)
//! are thin wrappers that translate arguments into an [`Endpoint`] and call
//! [`Client::get`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_stream::try_stream;
use bon::Builder;
use futures::Stream;
use reqwest::{
    Client as ReqwestClient, Method,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::Value;
use url::Url;

use crate::Result;
use crate::cache::LookupCache;
use crate::error::Error;
use crate::normalize::Normalized;
use crate::pagination::{DEFAULT_MAX_PAGES, Pager, PaginationStrategy, take_records};
use crate::request::{API_TOKEN, Endpoint, Includes, Params, Query, TIMEZONE, build_query};

/// Timezone sent with every request unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "UTC";

const CLIENT_IDENTIFIER: &str = concat!("sportmonks-client/", env!("CARGO_PKG_VERSION"));

/// Generation of the upstream API a [`Client`] talks to.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum_macros::Display)]
pub enum ApiVersion {
    /// Page-numbered pagination; `400` responses explain themselves in the body.
    #[default]
    V2,
    /// Link-based pagination.
    V3,
}

impl ApiVersion {
    #[must_use]
    pub fn pagination_strategy(self) -> PaginationStrategy {
        match self {
            Self::V2 => PaginationStrategy::CounterBased,
            Self::V3 => PaginationStrategy::LinkBased,
        }
    }

    /// Whether requests without an explicit `page` ask for page `1`.
    pub(crate) fn defaults_page(self) -> bool {
        self == Self::V2
    }

    /// Whether a `400` body is inspected instead of failing on the status alone.
    pub(crate) fn reports_bad_request_in_body(self) -> bool {
        self == Self::V2
    }
}

/// Configuration for [`Client`]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    #[builder(default)]
    api_version: ApiVersion,
    /// Timezone name sent as `tz`. Defaults to [`DEFAULT_TIMEZONE`].
    #[builder(into, default = DEFAULT_TIMEZONE.to_owned())]
    timezone: String,
    /// Timeout of each HTTP request. No timeout when unset.
    timeout: Option<Duration>,
    /// Upper bound on pages fetched by one call. The default is fifty (50).
    #[builder(default = DEFAULT_MAX_PAGES)]
    max_pages: u32,
    /// Cache for lookup tables; shared by every clone of the [`Client`].
    lookup_cache: Option<Arc<LookupCache>>,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Config {
    #[must_use]
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    #[must_use]
    pub fn lookup_cache(&self) -> Option<&Arc<LookupCache>> {
        self.lookup_cache.as_ref()
    }
}

#[derive(Debug)]
struct ClientInner {
    config: Config,
    /// The [`Url`] every endpoint path is appended to.
    host: Url,
    api_token: SecretString,
    /// The inner [`ReqwestClient`] used to make requests to `host`.
    client: ReqwestClient,
    /// Requests sent so far, for diagnostics.
    requests_made: AtomicU64,
}

/// Client for any SportMonks endpoint.
///
/// Cloning is cheap; clones share the connection pool, request counter and lookup cache.
///
/// # Example
///
/// ```no_run
/// use sportmonks_client::{Client, Config};
/// use sportmonks_client::request::{Endpoint, Includes, Params};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new(
///     "https://soccer.sportmonks.com/api/v2.0",
///     "my-token",
///     Config::default(),
/// )?;
///
/// let continents = client
///     .get(&Endpoint::new("continents"), &Params::new(), &Includes::from("countries"))
///     .await?;
/// println!("{} continents", continents.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Creates a client for the API rooted at `host`.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Configuration`](crate::error::Kind::Configuration) error if
    /// `host` or `api_token` is empty or `host` is not a usable base URL.
    pub fn new(host: &str, api_token: &str, config: Config) -> Result<Client> {
        if host.trim().is_empty() {
            return Err(Error::configuration("Base URL must be provided!"));
        }
        if api_token.trim().is_empty() {
            return Err(Error::configuration("API key must be provided!"));
        }
        if config.timezone.trim().is_empty() {
            return Err(Error::configuration("timezone must not be empty"));
        }

        let host = Url::parse(&format!("{}/", host.trim_end_matches('/')))
            .map_err(|e| Error::configuration(format!("invalid base URL: {e}")))?;
        if host.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "base URL cannot have paths appended: {host}"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_IDENTIFIER));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = ReqwestClient::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                host,
                api_token: SecretString::from(api_token.to_owned()),
                client: builder.build()?,
                requests_made: AtomicU64::new(0),
            }),
        })
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.inner.host
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Number of HTTP requests sent by this client and its clones.
    #[must_use]
    pub fn requests_made(&self) -> u64 {
        self.inner.requests_made.load(Ordering::Relaxed)
    }

    /// The full URL of `endpoint`.
    pub fn url(&self, endpoint: &Endpoint) -> Result<Url> {
        let mut url = self.inner.host.clone();
        let path = endpoint.path();
        url.path_segments_mut()
            .map_err(|()| Error::configuration("base URL cannot have paths appended"))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// The query sent for `params` and `includes`, before pagination.
    #[must_use]
    pub fn query(&self, params: &Params, includes: &Includes) -> Query {
        let config = &self.inner.config;
        let base = [
            (API_TOKEN, self.inner.api_token.expose_secret()),
            (TIMEZONE, config.timezone.as_str()),
        ];

        build_query(
            &base,
            params,
            includes,
            config.api_version.defaults_page(),
        )
    }

    fn pager(&self) -> Pager {
        let config = &self.inner.config;
        Pager::new(config.api_version.pagination_strategy(), config.max_pages)
    }

    /// Sends one GET and returns the decoded envelope, failing on upstream errors.
    async fn get_envelope(&self, url: &Url, query: &Query) -> Result<Value> {
        #[cfg(feature = "tracing")]
        tracing::debug!(url = %url, params = ?query, "GET");

        let request = self
            .inner
            .client
            .request(Method::GET, url.clone())
            .query(&query.pairs())
            .build()?;

        self.inner.requests_made.fetch_add(1, Ordering::Relaxed);
        crate::request(&self.inner.client, request, self.inner.config.api_version).await
    }

    /// Fetches `endpoint` without pagination or normalization.
    ///
    /// Upstream errors are still detected.
    pub async fn get_raw(&self, endpoint: &Endpoint, params: &Params) -> Result<Value> {
        let url = self.url(endpoint)?;
        let query = self.query(params, &Includes::none());
        self.get_envelope(&url, &query).await
    }

    /// Fetches `endpoint`, follows every page, and returns the normalized result.
    ///
    /// Pages are requested one after another and their records concatenated in
    /// page order. If any page fails, the whole call fails.
    pub async fn get(
        &self,
        endpoint: &Endpoint,
        params: &Params,
        includes: &Includes,
    ) -> Result<Normalized> {
        let url = self.url(endpoint)?;
        let mut query = self.query(params, includes);
        let mut pager = self.pager();

        let first = self.get_envelope(&url, &query).await?;
        let Some(mut next) = pager.advance(first.get("meta"))? else {
            return Normalized::try_from_body(first);
        };

        let mut records = take_records(first)?;
        loop {
            for (key, value) in next {
                query.set(key, value);
            }

            let page = self.get_envelope(&url, &query).await?;
            let following = pager.advance(page.get("meta"))?;
            records.extend(take_records(page)?);

            match following {
                Some(params) => next = params,
                None => break,
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            pages = pager.pages_fetched(),
            records = records.len(),
            "aggregated paginated response"
        );

        Normalized::try_from_body(Value::Array(records))
    }

    /// Returns a stream of normalized records, fetching pages lazily as it is polled.
    ///
    /// An object response is yielded as a single item.
    pub fn stream_data<'client>(
        &'client self,
        endpoint: &'client Endpoint,
        params: &'client Params,
        includes: &'client Includes,
    ) -> impl Stream<Item = Result<Value>> + 'client {
        try_stream! {
            let url = self.url(endpoint)?;
            let mut query = self.query(params, includes);
            let mut pager = self.pager();

            loop {
                let page = self.get_envelope(&url, &query).await?;
                let next = pager.advance(page.get("meta"))?;

                match Normalized::try_from_body(page)? {
                    Normalized::List(items) => {
                        for item in items {
                            yield item;
                        }
                    }
                    Normalized::Object(map) => {
                        if !map.is_empty() {
                            yield Value::Object(map);
                        }
                    }
                }

                let Some(next) = next else {
                    break;
                };
                for (key, value) in next {
                    query.set(key, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::Kind;
    use crate::request::{INCLUDE, PAGE};

    fn client(config: Config) -> Client {
        Client::new("https://soccer.example.com/api/v2.0", "token", config).expect("client")
    }

    #[test]
    fn missing_arguments_should_fail_fast() {
        let err = Client::new("", "token", Config::default()).unwrap_err();
        assert_eq!(err.kind(), Kind::Configuration);

        let err = Client::new("https://example.com", " ", Config::default()).unwrap_err();
        assert_eq!(err.kind(), Kind::Configuration);

        let err = Client::new("not a url", "token", Config::default()).unwrap_err();
        assert_eq!(err.kind(), Kind::Configuration);

        let config = Config::builder().timezone("").build();
        let err = Client::new("https://example.com", "token", config).unwrap_err();
        assert_eq!(err.kind(), Kind::Configuration);
    }

    #[test]
    fn url_should_append_segments_to_base_path() -> anyhow::Result<()> {
        let client = client(Config::default());
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
        let endpoint = Endpoint::new("fixtures").push("date").push(date);

        assert_eq!(
            client.url(&endpoint)?.as_str(),
            "https://soccer.example.com/api/v2.0/fixtures/date/2024-02-29"
        );
        assert_eq!(
            client.url(&Endpoint::new("livescores/now"))?.as_str(),
            "https://soccer.example.com/api/v2.0/livescores/now"
        );
        Ok(())
    }

    #[test]
    fn query_should_carry_base_params() {
        let config = Config::builder().timezone("Australia/Sydney").build();
        let query = client(config).query(&Params::new(), &Includes::none());

        assert_eq!(query.get(API_TOKEN), Some("token"));
        assert_eq!(query.get(TIMEZONE), Some("Australia/Sydney"));
        assert_eq!(query.get(INCLUDE), Some(""));
        assert_eq!(query.get(PAGE), Some("1"));
    }

    #[test]
    fn v3_should_not_default_page() {
        let config = Config::builder().api_version(ApiVersion::V3).build();
        let query = client(config).query(&Params::new(), &Includes::none());

        assert_eq!(query.get(PAGE), None);
    }

    #[test]
    fn debug_output_should_not_leak_token() {
        let client = Client::new("https://example.com", "very-secret", Config::default())
            .expect("client");

        assert!(!format!("{client:?}").contains("very-secret"));
    }

    #[test]
    fn api_version_should_select_strategy() {
        assert_eq!(
            ApiVersion::V2.pagination_strategy(),
            PaginationStrategy::CounterBased
        );
        assert_eq!(
            ApiVersion::V3.pagination_strategy(),
            PaginationStrategy::LinkBased
        );
    }
}
