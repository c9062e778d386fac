#![cfg(feature = "soccer")]
#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]

//! Aggregation of paginated responses through the Soccer API client.

pub mod common;

mod counter_based {
    use futures_util::StreamExt as _;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;
    use sportmonks_client::Config;
    use sportmonks_client::error::{ApiReason, Kind};
    use sportmonks_client::request::{Endpoint, Includes, Params};

    use crate::common::{client, client_with_config, counter_meta, path};

    #[tokio::test]
    async fn pages_should_be_concatenated_in_order() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let first = server.mock(|when, then| {
            when.method(GET).path(path("seasons")).query_param("page", "1");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 1}, {"id": 2}],
                "meta": counter_meta(1, 3)
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path(path("seasons")).query_param("page", "2");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 3}, {"id": 4}],
                "meta": counter_meta(2, 3)
            }));
        });
        let third = server.mock(|when, then| {
            when.method(GET).path(path("seasons")).query_param("page", "3");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 5}],
                "meta": counter_meta(3, 3)
            }));
        });

        let seasons = client.all_seasons(()).await?;

        let ids: Vec<_> = seasons.iter().map(|s| s["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(client.requests_made(), 3);
        first.assert();
        second.assert();
        third.assert();

        Ok(())
    }

    #[tokio::test]
    async fn explicit_page_should_not_paginate() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path(path("seasons")).query_param("page", "2");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 3}],
                "meta": counter_meta(2, 3)
            }));
        });

        let seasons = client
            .base()
            .get(
                &Endpoint::new("seasons"),
                &Params::new().with("page", 2_u32),
                &Includes::none(),
            )
            .await?
            .into_list()?;

        assert_eq!(seasons, vec![json!({"id": 3})]);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn page_cap_should_limit_requests() -> anyhow::Result<()> {
        let server = MockServer::start();
        let config = Config::builder().max_pages(2).build();
        let client = client_with_config(&server, config)?;

        let first = server.mock(|when, then| {
            when.method(GET).path(path("teams/season/1")).query_param("page", "1");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 1}],
                "meta": counter_meta(1, 120)
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path(path("teams/season/1")).query_param("page", "2");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 2}],
                "meta": counter_meta(2, 120)
            }));
        });

        let teams = client.teams_by_season_id(1, ()).await?;

        assert_eq!(teams.len(), 2);
        assert_eq!(client.requests_made(), 2);
        first.assert();
        second.assert();

        Ok(())
    }

    #[tokio::test]
    async fn failing_page_should_fail_whole_call() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        server.mock(|when, then| {
            when.method(GET).path(path("rounds/season/9")).query_param("page", "1");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 1}],
                "meta": counter_meta(1, 2)
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path(path("rounds/season/9")).query_param("page", "2");
            then.status(StatusCode::TOO_MANY_REQUESTS)
                .json_body(json!({"error": {"message": "Too Many Attempts.", "code": 429}}));
        });

        let err = client.rounds_by_season_id(9, ()).await.unwrap_err();

        assert_eq!(err.kind(), Kind::Api);
        let api = err.api().unwrap();
        assert_eq!(api.reason, ApiReason::RateLimited);
        assert_eq!(api.message, "Too Many Attempts.");
        assert!(api.reason.is_retryable());

        Ok(())
    }

    #[tokio::test]
    async fn stream_should_yield_records_of_every_page() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server)?;

        server.mock(|when, then| {
            when.method(GET).path(path("venues/season/4")).query_param("page", "1");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 1}, {"id": 2}],
                "meta": counter_meta(1, 2)
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path(path("venues/season/4")).query_param("page", "2");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 3}],
                "meta": counter_meta(2, 2)
            }));
        });

        let endpoint = Endpoint::new("venues").push("season").push(4_u64);
        let params = Params::new();
        let includes = Includes::none();
        let venues: Vec<_> = client
            .base()
            .stream_data(&endpoint, &params, &includes)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<_, _>>()?;

        assert_eq!(venues, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);

        Ok(())
    }
}

mod link_based {
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::{API_TOKEN, path, v3_client};

    #[tokio::test]
    async fn next_links_should_be_followed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = v3_client(&server)?;
        let next = format!(
            "{}?api_token=leaked&page=2&include=country",
            server.url(path("leagues"))
        );

        let second = server.mock(|when, then| {
            when.method(GET)
                .path(path("leagues"))
                .query_param("page", "2")
                .query_param("api_token", API_TOKEN)
                .query_param("include", "country");
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 2, "country": {"data": {"id": 5}}}],
                "meta": {"pagination": {"links": {"next": null}}}
            }));
        });
        let first = server.mock(|when, then| {
            when.method(GET)
                .path(path("leagues"))
                .is_true(|req| req.query_params().iter().all(|(key, _)| key != "page"));
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 1, "country": {"data": {"id": 4}}}],
                "meta": {"pagination": {"links": {"next": next}}}
            }));
        });

        let leagues = client.all_leagues("country").await?;

        assert_eq!(
            leagues,
            vec![
                json!({"id": 1, "country": {"id": 4}}),
                json!({"id": 2, "country": {"id": 5}})
            ]
        );
        first.assert();
        second.assert();

        Ok(())
    }

    #[tokio::test]
    async fn single_page_should_not_follow() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = v3_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path(path("markets"));
            then.status(StatusCode::OK).json_body(json!({
                "data": [{"id": 1}],
                "meta": {"pagination": {"links": []}}
            }));
        });

        assert_eq!(client.all_markets().await?.len(), 1);
        mock.assert();

        Ok(())
    }
}
