//! OAuth 2 token lifecycle: the authorization URL, the code exchange and the
//! refresh grant, over a token store shared with the transport core.

use std::sync::Arc;
use std::time::Duration;

use oauth2::basic::BasicTokenType;
use oauth2::{AccessToken, RefreshToken, Scope};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing_error::SpanTrace;
use url::Url;

use crate::config::{Credential, Endpoints};
use crate::error::{Error, Grant, Result};

/// How long before the recorded expiry a token already counts as expiring.
pub const TOKEN_EXPIRY_MARGIN: time::Duration = time::Duration::seconds(60);

#[derive(Debug, Default)]
struct Tokens {
    access_token: Option<AccessToken>,
    refresh_token: Option<RefreshToken>,
    expires_at: Option<OffsetDateTime>,
}

/// The mutable half of the credential, shared between the transport core and
/// the token manager of one [`crate::Client`].
///
/// Reads and writes are short; the lock is never held across a network call.
#[derive(Debug, Clone, Default)]
pub struct TokenStore(Arc<RwLock<Tokens>>);

impl TokenStore {
    #[must_use]
    pub fn new(access_token: Option<AccessToken>, refresh_token: Option<RefreshToken>) -> Self {
        Self(Arc::new(RwLock::new(Tokens {
            access_token,
            refresh_token,
            expires_at: None,
        })))
    }

    pub async fn access_token(&self) -> Option<String> {
        let tokens = self.0.read().await;
        tokens.access_token.as_ref().map(|t| t.secret().clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        let tokens = self.0.read().await;
        tokens.refresh_token.as_ref().map(|t| t.secret().clone())
    }

    /// When the current access token expires, if the authorization server told us.
    pub async fn expires_at(&self) -> Option<OffsetDateTime> {
        self.0.read().await.expires_at
    }

    /// Replace the access token. The expiry of a token set this way is unknown.
    pub async fn set_access_token(&self, token: impl Into<String>) {
        let mut tokens = self.0.write().await;
        tokens.access_token = Some(AccessToken::new(token.into()));
        tokens.expires_at = None;
    }

    pub async fn set_refresh_token(&self, token: impl Into<String>) {
        self.0.write().await.refresh_token = Some(RefreshToken::new(token.into()));
    }

    pub async fn clear(&self) {
        let mut tokens = self.0.write().await;
        *tokens = Tokens::default();
    }

    async fn apply(&self, response: &TokenResponse) {
        let expires_at = response.expires_in.and_then(|secs| {
            let secs = i64::try_from(secs).ok()?;
            OffsetDateTime::now_utc().checked_add(time::Duration::seconds(secs))
        });

        let mut tokens = self.0.write().await;
        tokens.access_token = Some(response.access_token.clone());
        // Zoho omits the refresh token on refresh; keep the stored one then.
        if let Some(refresh_token) = &response.refresh_token {
            tokens.refresh_token = Some(refresh_token.clone());
        }
        tokens.expires_at = expires_at;
    }
}

/// Token endpoint response for both grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    access_token: AccessToken,
    #[serde(default)]
    refresh_token: Option<RefreshToken>,
    #[serde(default)]
    expires_in: Option<u64>,
    token_type: BasicTokenType,
    #[serde(default)]
    api_domain: Option<String>,
}

impl TokenResponse {
    /// The API domain of the data centre the account lives in, e.g.
    /// `https://www.zohoapis.eu`.
    #[must_use]
    pub fn api_domain(&self) -> Option<&str> {
        self.api_domain.as_deref()
    }
}

impl oauth2::TokenResponse for TokenResponse {
    type TokenType = BasicTokenType;

    fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    fn token_type(&self) -> &BasicTokenType {
        &self.token_type
    }

    fn expires_in(&self) -> Option<Duration> {
        self.expires_in.map(Duration::from_secs)
    }

    fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    fn scopes(&self) -> Option<&Vec<Scope>> {
        None
    }
}

/// Runs the authorization code flow against the Zoho accounts server and keeps
/// the [`TokenStore`] up to date.
#[derive(Debug, Clone)]
pub struct TokenManager {
    credential: Credential,
    auth_url: Url,
    token_url: Url,
    http: reqwest::Client,
    store: TokenStore,
}

impl TokenManager {
    pub(crate) fn new(
        credential: Credential,
        endpoints: &Endpoints,
        http: reqwest::Client,
        store: TokenStore,
    ) -> Self {
        Self {
            credential,
            auth_url: endpoints.auth_url.clone(),
            token_url: endpoints.token_url.clone(),
            http,
            store,
        }
    }

    /// The URL the user has to visit to grant access.
    ///
    /// Offline access is always requested so that the exchange yields a
    /// refresh token.
    #[must_use]
    pub fn authorization_url(&self) -> Url {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", self.credential.client_id())
            .append_pair("scope", self.credential.scope())
            .append_pair("redirect_uri", self.credential.redirect_uri())
            .append_pair("access_type", "offline");
        url
    }

    /// Exchange an authorization code for an access and refresh token.
    ///
    /// # Errors
    /// Returns [`Error::TokenGrant`] if the token endpoint can't be reached or
    /// rejects the code. The token store is left untouched in that case.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let params = [
            ("code", code),
            ("client_id", self.credential.client_id()),
            ("client_secret", self.credential.client_secret.secret().as_str()),
            ("redirect_uri", self.credential.redirect_uri()),
            ("grant_type", "authorization_code"),
        ];
        let response = self.request_token(Grant::AuthorizationCode, &params).await?;
        self.store.apply(&response).await;
        info!("authorization code exchanged for tokens");
        Ok(response)
    }

    /// Obtain a new access token with the stored refresh token.
    ///
    /// # Errors
    /// Returns [`Error::MissingRefreshToken`] without touching the network if
    /// no refresh token is stored, or [`Error::TokenGrant`] if the refresh is
    /// rejected.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<TokenResponse> {
        let Some(refresh_token) = self.store.refresh_token().await else {
            warn!("refresh requested without a refresh token");
            return Err(Error::missing_refresh_token());
        };

        let params = [
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.credential.client_id()),
            ("client_secret", self.credential.client_secret.secret().as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = self.request_token(Grant::RefreshToken, &params).await?;
        self.store.apply(&response).await;
        debug!("access token refreshed");
        Ok(response)
    }

    async fn request_token(&self, grant: Grant, params: &[(&str, &str)]) -> Result<TokenResponse> {
        type Source = Box<dyn std::error::Error + Send + Sync + 'static>;
        let failure =
            |status: Option<StatusCode>, details: Option<Value>, source: Option<Source>| {
                Error::TokenGrant {
                    grant,
                    status,
                    details,
                    source,
                    span_trace: SpanTrace::capture(),
                }
            };

        trace!(url = %self.token_url, ?grant, "posting token request");
        let response = self
            .http
            .post(self.token_url.clone())
            .form(params)
            .send()
            .await
            .map_err(|e| failure(None, None, Some(e.into())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| failure(Some(status), None, Some(e.into())))?;
        debug!(%status, size = body.len(), "token endpoint responded");

        let details = (!body.trim().is_empty()).then(|| {
            serde_json::from_str::<Value>(&body).unwrap_or_else(|_| Value::String(body.clone()))
        });

        // Zoho reports a bad code or refresh token with a 200 and an `error` field.
        let rejected = details.as_ref().and_then(|d| d.get("error")).is_some();
        if !status.is_success() || rejected {
            error!(%status, ?grant, "token request rejected");
            return Err(failure(Some(status), details, None));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(%status, ?grant, error = %e, %body, "token response could not be decoded");
            failure(Some(status), details, Some(e.into()))
        })
    }

    pub async fn access_token(&self) -> Option<String> {
        self.store.access_token().await
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.store.refresh_token().await
    }

    pub async fn set_access_token(&self, token: impl Into<String>) {
        self.store.set_access_token(token).await;
    }

    pub async fn set_refresh_token(&self, token: impl Into<String>) {
        self.store.set_refresh_token(token).await;
    }

    /// Forget both tokens.
    pub async fn clear_credentials(&self) {
        self.store.clear().await;
        debug!("credentials cleared");
    }

    pub async fn access_token_expires_at(&self) -> Option<OffsetDateTime> {
        self.store.expires_at().await
    }

    /// Whether the access token expires within [`TOKEN_EXPIRY_MARGIN`].
    ///
    /// `false` when the expiry is unknown. Nothing refreshes automatically;
    /// callers decide when to call [`TokenManager::refresh`].
    pub async fn is_token_expiring(&self) -> bool {
        self.store
            .expires_at()
            .await
            .is_some_and(|at| at - TOKEN_EXPIRY_MARGIN <= OffsetDateTime::now_utc())
    }

    #[must_use]
    pub fn store(&self) -> &TokenStore {
        &self.store
    }
}
