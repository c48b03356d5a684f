//! Static configuration: the OAuth client registration and the service addresses.

use oauth2::{AccessToken, ClientId, ClientSecret, RefreshToken};
use url::Url;

use crate::error::{Error, Result};

pub const API_BASE_URL: &str = "https://books.zoho.com/api/v3";
pub const AUTH_URL: &str = "https://accounts.zoho.com/oauth/v2/auth";
pub const TOKEN_URL: &str = "https://accounts.zoho.com/oauth/v2/token";

pub const ENV_CLIENT_ID: &str = "ZOHO_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ZOHO_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "ZOHO_REDIRECT_URI";
pub const ENV_SCOPE: &str = "ZOHO_SCOPE";
pub const ENV_ACCESS_TOKEN: &str = "ZOHO_ACCESS_TOKEN";
pub const ENV_REFRESH_TOKEN: &str = "ZOHO_REFRESH_TOKEN";

/// Scope requested when none is configured.
pub const DEFAULT_SCOPE: &str = "ZohoBooks.fullaccess.all";

/// Stores the OAuth 2 client registration plus any tokens persisted from a
/// previous session.
///
/// The tokens are only used to seed a [`crate::Client`]; once the client is
/// built, its token store owns them.
#[derive(Debug, Clone)]
pub struct Credential {
    pub(crate) client_id: ClientId,
    pub(crate) client_secret: ClientSecret,
    pub(crate) redirect_uri: String,
    pub(crate) scope: String,
    pub(crate) access_token: Option<AccessToken>,
    pub(crate) refresh_token: Option<RefreshToken>,
}

impl Credential {
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
            redirect_uri: redirect_uri.into(),
            scope: scope.into(),
            access_token: None,
            refresh_token: None,
        }
    }

    /// Creates a `Credential` from the `ZOHO_*` environment variables.
    ///
    /// `ZOHO_CLIENT_ID`, `ZOHO_CLIENT_SECRET` and `ZOHO_REDIRECT_URI` are
    /// required. `ZOHO_SCOPE` defaults to [`DEFAULT_SCOPE`]; `ZOHO_ACCESS_TOKEN`
    /// and `ZOHO_REFRESH_TOKEN` are picked up when set.
    pub fn from_env() -> Result<Self> {
        let credential = Self::new(
            required_env(ENV_CLIENT_ID)?,
            required_env(ENV_CLIENT_SECRET)?,
            required_env(ENV_REDIRECT_URI)?,
            std::env::var(ENV_SCOPE).unwrap_or_else(|_| DEFAULT_SCOPE.to_string()),
        );

        let credential = match std::env::var(ENV_ACCESS_TOKEN) {
            Ok(token) if !token.is_empty() => credential.with_access_token(token),
            _ => credential,
        };
        Ok(match std::env::var(ENV_REFRESH_TOKEN) {
            Ok(token) if !token.is_empty() => credential.with_refresh_token(token),
            _ => credential,
        })
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(AccessToken::new(token.into()));
        self
    }

    #[must_use]
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(RefreshToken::new(token.into()));
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|e| Error::Request {
        message: format!("{name} not set"),
        source: Some(Box::new(e)),
        span_trace: tracing_error::SpanTrace::capture(),
    })
}

/// The addresses the client talks to.
///
/// The defaults are the fixed Zoho Books addresses; overriding them is only
/// needed for other Zoho data centres (`.eu`, `.in`, ...) or local test servers.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api_base: Url,
    pub auth_url: Url,
    pub token_url: Url,
}

impl Endpoints {
    /// Build endpoints from string addresses.
    pub fn new(api_base: &str, auth_url: &str, token_url: &str) -> Result<Self> {
        let parse = |s: &str| Url::parse(s).map_err(|_| Error::invalid_endpoint());
        Ok(Self {
            api_base: parse(api_base)?,
            auth_url: parse(auth_url)?,
            token_url: parse(token_url)?,
        })
    }

    /// Point every endpoint at one origin, e.g. a mock server.
    ///
    /// The API root becomes `{origin}/api/v3` and the OAuth endpoints
    /// `{origin}/oauth/v2/auth` and `{origin}/oauth/v2/token`.
    pub fn with_origin(origin: &str) -> Result<Self> {
        let origin = origin.trim_end_matches('/');
        Self::new(
            &format!("{origin}/api/v3"),
            &format!("{origin}/oauth/v2/auth"),
            &format!("{origin}/oauth/v2/token"),
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: Url::parse(API_BASE_URL).expect("API_BASE_URL is a valid URL"),
            auth_url: Url::parse(AUTH_URL).expect("AUTH_URL is a valid URL"),
            token_url: Url::parse(TOKEN_URL).expect("TOKEN_URL is a valid URL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let credential = Credential::new("id", "super-secret", "http://localhost/cb", "scope")
            .with_access_token("access-abc")
            .with_refresh_token("refresh-xyz");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("access-abc"));
        assert!(!debug.contains("refresh-xyz"));
        assert!(debug.contains("id"));
    }

    #[test]
    fn origin_override_keeps_fixed_paths() {
        let endpoints = Endpoints::with_origin("http://127.0.0.1:8080/").unwrap();
        assert_eq!(endpoints.api_base.as_str(), "http://127.0.0.1:8080/api/v3");
        assert_eq!(endpoints.token_url.path(), "/oauth/v2/token");
        assert_eq!(endpoints.auth_url.path(), "/oauth/v2/auth");
    }

    #[test]
    fn defaults_are_the_zoho_addresses() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.api_base.as_str(), API_BASE_URL);
        assert_eq!(endpoints.auth_url.as_str(), AUTH_URL);
        assert_eq!(endpoints.token_url.as_str(), TOKEN_URL);
    }

    #[test]
    fn invalid_addresses_are_rejected() {
        let error = Endpoints::new("not a url", AUTH_URL, TOKEN_URL).unwrap_err();
        assert_eq!(error.http_status(), 0);
    }
}
