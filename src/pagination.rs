//! Aggregation of paginated result sets.
//!
//! The upstream has used two pagination protocols over time. Both are driven by
//! the same [`Pager`], which inspects each page's `meta` block and tells the
//! caller which query parameters to send for the next page, if any.

use serde_json::Value;
use url::Url;

use crate::Result;
use crate::error::Error;
use crate::normalize::{DATA, json_type};
use crate::request::{API_TOKEN, PAGE};

/// Default upper bound on pages fetched by one logical call.
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// How the upstream announces further pages.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum_macros::Display)]
pub enum PaginationStrategy {
    /// `meta.pagination.{current_page,total_pages}`; pages are requested by number.
    #[default]
    CounterBased,
    /// `meta.pagination.links.next` holds the URL of the following page.
    LinkBased,
}

/// Query parameters to overlay on the current query for the next page.
pub type NextPage = Vec<(String, String)>;

/// Pagination state of a single aggregated call.
#[derive(Debug)]
pub struct Pager {
    strategy: PaginationStrategy,
    max_pages: u32,
    fetched: u32,
    last_page: u32,
}

impl Pager {
    #[must_use]
    pub fn new(strategy: PaginationStrategy, max_pages: u32) -> Self {
        Self {
            strategy,
            max_pages: max_pages.max(1),
            fetched: 0,
            last_page: 1,
        }
    }

    #[must_use]
    pub fn pages_fetched(&self) -> u32 {
        self.fetched
    }

    /// Records one fetched page given its `meta` block and returns the
    /// parameters for the next request, or `None` when aggregation is done.
    pub fn advance(&mut self, meta: Option<&Value>) -> Result<Option<NextPage>> {
        self.fetched += 1;

        match self.strategy {
            PaginationStrategy::CounterBased => Ok(self.advance_counter(meta)),
            PaginationStrategy::LinkBased => self.advance_link(meta),
        }
    }

    fn advance_counter(&mut self, meta: Option<&Value>) -> Option<NextPage> {
        // Only the first page decides how many pages follow
        if self.fetched == 1 {
            let pagination = meta.and_then(|m| m.get("pagination"));
            let current = pagination
                .and_then(|p| p.get("current_page"))
                .and_then(Value::as_u64);
            let total = pagination
                .and_then(|p| p.get("total_pages"))
                .and_then(Value::as_u64);

            if let (Some(1), Some(total)) = (current, total)
                && total > 1
            {
                let total = u32::try_from(total).unwrap_or(u32::MAX);
                self.last_page = total.min(self.max_pages);

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    total_pages = total,
                    requesting_through = self.last_page,
                    "response is paginated"
                );
            }
        }

        let next = self.fetched + 1;
        (next <= self.last_page).then(|| vec![(PAGE.to_owned(), next.to_string())])
    }

    fn advance_link(&self, meta: Option<&Value>) -> Result<Option<NextPage>> {
        let next = meta
            .and_then(|m| m.pointer("/pagination/links/next"))
            .and_then(Value::as_str)
            .filter(|link| !link.is_empty());

        let Some(next) = next else {
            return Ok(None);
        };

        if self.fetched >= self.max_pages {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                max_pages = self.max_pages,
                "page limit reached, remaining pages are not requested"
            );
            return Ok(None);
        }

        let url = Url::parse(next)
            .map_err(|e| Error::schema(format!("invalid `next` pagination link: {e}")))?;
        let pairs: NextPage = url
            .query_pairs()
            .filter(|(key, _)| key != API_TOKEN)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if pairs.is_empty() {
            return Err(Error::schema(
                "`next` pagination link carries no page token",
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(page = self.fetched + 1, "following next page link");

        Ok(Some(pairs))
    }
}

/// Takes the `data` list out of one page of a paginated response.
pub fn take_records(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove(DATA) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(Error::schema(format!(
                "paginated `data` must be a list, got {}",
                json_type(&other)
            ))),
            None => Err(Error::schema("paginated response without `data`")),
        },
        other => Err(Error::schema(format!(
            "paginated response must be an object, got {}",
            json_type(&other)
        ))),
    }
}
