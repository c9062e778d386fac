#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod cache;
pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod request;
pub(crate) mod serde_helpers;
#[cfg(feature = "soccer")]
pub mod soccer;

use reqwest::{Request, StatusCode};
use serde_json::Value;

pub use crate::client::{ApiVersion, Client, Config};
use crate::error::Error;
pub use crate::normalize::{Normalized, Object};

pub type Result<T> = std::result::Result<T, Error>;

/// Executes `request` and decodes the JSON envelope.
///
/// Fails on a non-success status and on a top-level `error` object, whatever
/// the status. For [`ApiVersion::V2`] a `400` is judged by its body alone.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request(
    client: &reqwest::Client,
    request: Request,
    api_version: ApiVersion,
) -> Result<Value> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    let text = response.text().await?;
    let reported_in_body =
        status_code == StatusCode::BAD_REQUEST && api_version.reports_bad_request_in_body();

    if !status_code.is_success() && !reported_in_body {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| error_message(&body).map(str::to_owned))
            .unwrap_or(text);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let body: Value = serde_json::from_str(&text)?;

    if let Some(error) = body.get("error").filter(|e| e.is_object()) {
        let message = error_message(&body).unwrap_or_default().to_owned();
        let code = error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok());

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API returned an error payload"
        );

        return Err(Error::in_body(code, status_code, method, path, message));
    }

    #[cfg(feature = "tracing")]
    if reported_in_body {
        tracing::warn!(method = %method, path = %path, "bad request without an error payload");
    }

    Ok(body)
}

fn error_message(body: &Value) -> Option<&str> {
    body.pointer("/error/message").and_then(Value::as_str)
}
