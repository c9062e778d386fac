use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A required constructor argument (base URL, API token) is missing or invalid
    Configuration,
    /// The upstream returned a non-success status or an in-body error payload
    Api,
    /// The response did not follow the `data` envelope convention
    Schema,
    /// Internal error from dependencies
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    /// Returns the [`Api`] details when this is an upstream failure.
    #[must_use]
    pub fn api(&self) -> Option<&Api> {
        self.downcast_ref::<Api>()
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Configuration {
            reason: message.into(),
        }
        .into()
    }

    pub fn schema<S: Into<String>>(message: S) -> Self {
        Schema {
            reason: message.into(),
        }
        .into()
    }

    /// Builds an [`Api`] error from a non-success HTTP status.
    ///
    /// When the upstream supplied no message, the reason's default description is used.
    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        let reason = classify_status(status_code);
        let message = message.into();
        let message = if message.trim().is_empty() {
            reason.description().to_owned()
        } else {
            message
        };

        Api {
            reason,
            status_code: Some(status_code),
            method,
            path,
            message,
        }
        .into()
    }

    /// Builds an [`Api`] error from an `error` object embedded in a response body.
    ///
    /// The numeric `code`, when the upstream provides one, takes precedence over
    /// the message text for classification.
    pub fn in_body<S: Into<String>>(
        code: Option<u16>,
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        let message = message.into();
        let reason = code
            .and_then(|c| StatusCode::from_u16(c).ok())
            .map(classify_status)
            .filter(|reason| *reason != ApiReason::Unknown)
            .or_else(|| {
                (!status_code.is_success())
                    .then(|| classify_status(status_code))
                    .filter(|reason| *reason != ApiReason::Unknown)
            })
            .unwrap_or_else(|| classify_message(&message));
        let message = if message.trim().is_empty() {
            reason.description().to_owned()
        } else {
            message
        };

        Api {
            reason,
            status_code: Some(status_code),
            method,
            path,
            message,
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// What an upstream failure means to the caller.
///
/// Callers decide on retries from this: only [`ApiReason::RateLimited`] and
/// [`ApiReason::UpstreamInternal`] are worth retrying.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ApiReason {
    BadRequest,
    Unauthorized,
    Forbidden,
    RateLimited,
    UpstreamInternal,
    Unknown,
}

impl ApiReason {
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::UpstreamInternal)
    }

    /// Description used when the upstream response carries no message of its own.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::BadRequest => {
                "It seems that some part of the request is malformed. The exact reason is returned in the response."
            }
            Self::Unauthorized => {
                "The request is not authenticated. Please check if your API token is correct and may access this endpoint."
            }
            Self::Forbidden => {
                "Not authorized. You are attempting to request data which is not accessible from your plan."
            }
            Self::RateLimited => {
                "Too Many Requests. The hourly request limit of your subscription has been reached."
            }
            Self::UpstreamInternal => {
                "An internal error has occurred upstream, and has been logged for further inspection."
            }
            Self::Unknown => "Whoops... Something went wrong!",
        }
    }
}

/// Maps an HTTP status code to an [`ApiReason`].
#[must_use]
pub fn classify_status(status_code: StatusCode) -> ApiReason {
    match status_code {
        StatusCode::BAD_REQUEST => ApiReason::BadRequest,
        StatusCode::UNAUTHORIZED => ApiReason::Unauthorized,
        StatusCode::FORBIDDEN => ApiReason::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => ApiReason::RateLimited,
        StatusCode::INTERNAL_SERVER_ERROR => ApiReason::UpstreamInternal,
        _ => ApiReason::Unknown,
    }
}

/// Maps the text of an in-body `error.message` to an [`ApiReason`].
#[must_use]
pub fn classify_message(message: &str) -> ApiReason {
    let message = message.to_ascii_lowercase();

    if message.contains("too many") || message.contains("rate limit") {
        ApiReason::RateLimited
    } else if message.contains("insufficient privileges")
        || message.contains("not accessible")
        || message.contains("not authorized")
    {
        ApiReason::Forbidden
    } else if message.contains("unauthenticated")
        || message.contains("not authenticated")
        || message.contains("api token")
        || message.contains("api_token")
    {
        ApiReason::Unauthorized
    } else if message.contains("malformed") || message.contains("invalid") {
        ApiReason::BadRequest
    } else if message.contains("internal error") {
        ApiReason::UpstreamInternal
    } else {
        ApiReason::Unknown
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Api {
    pub reason: ApiReason,
    pub status_code: Option<StatusCode>,
    pub method: Method,
    pub path: String,
    /// The upstream message, verbatim where one was available
    pub message: String,
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status_code) => write!(
                f,
                "{}({}) making {} call to {} with {}",
                self.reason, status_code, self.method, self.path, self.message
            ),
            None => write!(
                f,
                "{} making {} call to {} with {}",
                self.reason, self.method, self.path, self.message
            ),
        }
    }
}

impl StdError for Api {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Configuration {
    pub reason: String,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.reason)
    }
}

impl StdError for Configuration {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Schema {
    pub reason: String,
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected response schema: {}", self.reason)
    }
}

impl StdError for Schema {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API token in its query string
        Error::with_source(Kind::Internal, e.without_url())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<Api> for Error {
    fn from(err: Api) -> Self {
        Error::with_source(Kind::Api, err)
    }
}

impl From<Configuration> for Error {
    fn from(err: Configuration) -> Self {
        Error::with_source(Kind::Configuration, err)
    }
}

impl From<Schema> for Error {
    fn from(err: Schema) -> Self {
        Error::with_source(Kind::Schema, err)
    }
}
