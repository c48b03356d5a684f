use std::fmt;

use miette::Diagnostic;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing_error::SpanTrace;

/// Message used for every request that left the process without a response.
pub const NETWORK_ERROR_MESSAGE: &str = "network error: no response received";

/// The token grant an [`Error::TokenGrant`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    AuthorizationCode,
    RefreshToken,
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorizationCode => write!(f, "failed to exchange code for token"),
            Self::RefreshToken => write!(f, "failed to refresh access token"),
        }
    }
}

/// Errors that can occur when interacting with the Zoho Books API.
///
/// Every failure of the transport core or the token manager converges here.
/// Regardless of the variant, [`Error::message`], [`Error::http_status`] and
/// [`Error::details`] give the normalized view: `http_status` is `0` when no
/// response was received.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The remote service answered with a non-2xx status.
    #[error("{message} (status {status})")]
    #[diagnostic(
        code(zoho_books::api),
        help("Review the message and details returned by the Zoho Books API")
    )]
    Api {
        status: StatusCode,
        message: String,
        url: String,
        details: Option<Value>,
        span_trace: SpanTrace,
    },

    /// The request was dispatched but no response arrived (timeout, DNS, connection reset).
    #[error("network error: no response received")]
    #[diagnostic(
        code(zoho_books::network),
        help("Check your network connection and Zoho Books availability")
    )]
    Network {
        #[source]
        source: reqwest::Error,
        url: Option<String>,
        span_trace: SpanTrace,
    },

    /// The request could not be built or handed to the HTTP client.
    #[error("{message}")]
    #[diagnostic(
        code(zoho_books::request),
        help("The request could not be constructed; check the input values")
    )]
    Request {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
        span_trace: SpanTrace,
    },

    #[error("endpoint could not be parsed as a URL")]
    #[diagnostic(
        code(zoho_books::invalid_endpoint),
        help("Check that the configured API root is an absolute http(s) URL")
    )]
    InvalidEndpoint { span_trace: SpanTrace },

    /// A successful response carried a body that did not match the expected shape.
    #[error("error decoding response: {source}")]
    #[diagnostic(
        code(zoho_books::deserialization_error),
        help("The API returned data in an unexpected format")
    )]
    Decode {
        #[source]
        source: serde_json::Error,
        status: StatusCode,
        url: String,
        body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("refresh token is required for token refresh")]
    #[diagnostic(
        code(zoho_books::missing_refresh_token),
        help("Complete the authorization code flow or call `set_refresh_token` first")
    )]
    MissingRefreshToken { span_trace: SpanTrace },

    /// The authorization server rejected a code exchange or refresh.
    #[error("{grant}")]
    #[diagnostic(
        code(zoho_books::oauth2_error),
        help("Verify your OAuth2 client id, client secret, redirect URI and the code or refresh token")
    )]
    TokenGrant {
        grant: Grant,
        status: Option<StatusCode>,
        details: Option<Value>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
        span_trace: SpanTrace,
    },
}

impl Error {
    pub(crate) fn network(source: reqwest::Error) -> Self {
        let url = source.url().map(ToString::to_string);
        Self::Network {
            source,
            url,
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn request<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request {
            message: source.to_string(),
            source: Some(Box::new(source)),
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn invalid_endpoint() -> Self {
        Self::InvalidEndpoint {
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn missing_refresh_token() -> Self {
        Self::MissingRefreshToken {
            span_trace: SpanTrace::capture(),
        }
    }

    /// Map a `reqwest` failure onto the construction or no-response branch.
    pub(crate) fn from_reqwest(source: reqwest::Error) -> Self {
        if source.is_builder() {
            Self::request(source)
        } else {
            Self::network(source)
        }
    }

    /// The HTTP status reported by the remote service, or `0` if no response
    /// reached the client.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Api { status, .. } | Self::Decode { status, .. } => status.as_u16(),
            Self::TokenGrant { status, .. } => status.map_or(0, |s| s.as_u16()),
            Self::Network { .. }
            | Self::Request { .. }
            | Self::InvalidEndpoint { .. }
            | Self::MissingRefreshToken { .. } => 0,
        }
    }

    /// The normalized, human readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Request { message, .. } => message.clone(),
            Self::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            Self::TokenGrant { grant, .. } => grant.to_string(),
            other => other.to_string(),
        }
    }

    /// The raw body returned by the remote service, when there was one.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Api { details, .. } | Self::TokenGrant { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Get the span trace captured when this error was created.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Api { span_trace, .. }
            | Self::Network { span_trace, .. }
            | Self::Request { span_trace, .. }
            | Self::InvalidEndpoint { span_trace }
            | Self::Decode { span_trace, .. }
            | Self::MissingRefreshToken { span_trace }
            | Self::TokenGrant { span_trace, .. } => Some(span_trace),
        }
    }

    /// The URL of the request that failed, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Api { url, .. } | Self::Decode { url, .. } => Some(url),
            Self::Network { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure happened before any response was received.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.http_status() == 0
    }

    /// Owned snapshot of the normalized view of this error.
    #[must_use]
    pub fn summary(&self) -> ErrorSummary {
        ErrorSummary {
            message: self.message(),
            http_status: self.http_status(),
            details: self.details().cloned(),
        }
    }
}

/// The normalized `{message, http_status, details}` shape of an [`Error`].
///
/// Unlike [`Error`] this is `Clone`, which makes it suitable for state that is
/// shared with observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub message: String,
    pub http_status: u16,
    pub details: Option<Value>,
}

impl fmt::Display for ErrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.http_status == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (status {})", self.message, self.http_status)
        }
    }
}

impl From<&Error> for ErrorSummary {
    fn from(error: &Error) -> Self {
        error.summary()
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;
