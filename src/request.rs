//! Query assembly for API calls.
//!
//! Every call is described by an [`Endpoint`] (path segments), optional [`Params`],
//! and [`Includes`]. [`build_query`] merges them with the client's base parameters
//! into a deterministic [`Query`].

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use chrono::NaiveDate;

pub(crate) const API_TOKEN: &str = "api_token";
pub(crate) const TIMEZONE: &str = "tz";
pub(crate) const INCLUDE: &str = "include";
pub(crate) const PAGE: &str = "page";

/// Replacement for the API token in every diagnostic.
pub const REDACTED: &str = "API_TOKEN_REDACTED";

/// One part of an endpoint path.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Id(u64),
    Date(NaiveDate),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.write_str(s.trim_matches('/')),
            Self::Id(id) => write!(f, "{id}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<u64> for Segment {
    fn from(value: u64) -> Self {
        Self::Id(value)
    }
}

impl From<NaiveDate> for Segment {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Path of a logical endpoint, relative to the API base URL.
///
/// ```
/// use sportmonks_client::request::Endpoint;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let endpoint = Endpoint::new("fixtures").push("between").push(date).push(date);
/// assert_eq!(endpoint.path(), "fixtures/between/2024-05-01/2024-05-01");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<Segment>,
}

impl Endpoint {
    pub fn new<S: Into<Segment>>(first: S) -> Self {
        Self {
            segments: vec![first.into()],
        }
    }

    /// The API root itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn push<S: Into<Segment>>(mut self, segment: S) -> Self {
        self.segments.push(segment.into());
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Joins the segments with single slashes, skipping empty parts.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(ToString::to_string)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl From<&str> for Endpoint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A query parameter value. Lists are sent comma-joined.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
}

impl ParamValue {
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::List(values) => values.join(","),
        }
    }
}

macro_rules! scalar_param {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_param!(&str, String, u32, u64, i32, i64, bool);

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        Self::Scalar(value.format("%Y-%m-%d").to_string())
    }
}

impl<T: ToString> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for ParamValue {
    fn from(values: &[T]) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for ParamValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Caller-supplied query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Adds the parameter only when `value` is present.
    #[must_use]
    pub fn with_opt<K: Into<String>, V: Into<ParamValue>>(self, key: K, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Adds a list parameter only when it has elements.
    #[must_use]
    pub fn with_list<K: Into<String>, T: ToString>(self, key: K, values: &[T]) -> Self {
        if values.is_empty() {
            self
        } else {
            self.with(key, values)
        }
    }

    pub fn insert<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }
}

/// Related objects to embed in a response.
///
/// Order never matters to the upstream, so tokens are kept sorted; every
/// representation of the same tokens renders the same `include` value.
///
/// ```
/// use std::collections::HashSet;
/// use sportmonks_client::request::Includes;
///
/// let from_list = Includes::from(vec!["b", "a"]);
/// let from_set = Includes::from(HashSet::from(["a", "b"]));
/// assert_eq!(from_list, from_set);
/// assert_eq!(from_list.render(), "a,b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Includes(Vec<String>);

impl Includes {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    fn sorted<I: IntoIterator<Item = S>, S: Into<String>>(tokens: I) -> Self {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        tokens.sort();
        Self(tokens)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Comma-joined tokens; empty when there are none.
    #[must_use]
    pub fn render(&self) -> String {
        self.0.join(",")
    }

    /// Prefixes every token with `parent.` and adds `parent` itself.
    #[must_use]
    pub fn nested_under(&self, parent: &str) -> Self {
        Self::sorted(std::iter::once(parent.to_owned()).chain(self.prefixed(parent).0))
    }

    /// Prefixes every token with `parent.`.
    #[must_use]
    pub fn prefixed(&self, parent: &str) -> Self {
        Self::sorted(self.0.iter().map(|token| format!("{parent}.{token}")))
    }
}

impl From<()> for Includes {
    fn from((): ()) -> Self {
        Self::none()
    }
}

impl From<&str> for Includes {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::none()
        } else {
            Self(vec![value.to_owned()])
        }
    }
}

impl From<String> for Includes {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&Includes> for Includes {
    fn from(value: &Includes) -> Self {
        value.clone()
    }
}

impl<S: Into<String>> From<Vec<S>> for Includes {
    fn from(values: Vec<S>) -> Self {
        Self::sorted(values)
    }
}

impl<S: Into<String> + Clone> From<&[S]> for Includes {
    fn from(values: &[S]) -> Self {
        Self::sorted(values.iter().cloned())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Includes {
    fn from(values: [S; N]) -> Self {
        Self::sorted(values)
    }
}

impl<S: Into<String>> From<HashSet<S>> for Includes {
    fn from(values: HashSet<S>) -> Self {
        Self::sorted(values)
    }
}

impl<S: Into<String>> From<BTreeSet<S>> for Includes {
    fn from(values: BTreeSet<S>) -> Self {
        Self::sorted(values)
    }
}

impl<I: Into<Includes>> From<Option<I>> for Includes {
    fn from(value: Option<I>) -> Self {
        value.map_or_else(Self::none, Into::into)
    }
}

impl fmt::Display for Includes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Final, ordered query pairs of one request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Pairs with the API token replaced by [`REDACTED`].
    #[must_use]
    pub fn redacted(&self) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| {
                if k == API_TOKEN {
                    (k.as_str(), REDACTED)
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect()
    }
}

// Debug output goes to logs, so it never shows the token
impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}

/// Merges base parameters, caller parameters and includes into a [`Query`].
///
/// Caller values win over `base`, except `include`, which always comes from
/// `includes`. When `default_page` is set and no `page` was given, `page` is
/// set to `1`.
#[must_use]
pub fn build_query(
    base: &[(&str, &str)],
    params: &Params,
    includes: &Includes,
    default_page: bool,
) -> Query {
    let mut query = Query::default();

    for (key, value) in base {
        query.set(*key, *value);
    }
    for (key, value) in params.iter() {
        query.set(key.clone(), value.render());
    }
    query.set(INCLUDE, includes.render());

    if default_page && query.get(PAGE).is_none() {
        query.set(PAGE, "1");
    }

    query
}
