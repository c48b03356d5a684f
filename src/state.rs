//! Observable wrappers around client calls.
//!
//! An [`Operation`] tracks the loading, error and data state of one kind of
//! call and publishes every change over a [`tokio::sync::watch`] channel, so a
//! UI or a supervisor task can follow it. [`Operations`] tracks many calls at
//! once, keyed by an operation id. [`AuthSession`] does the same for the
//! sign-in state of a [`Client`].

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::watch;
use url::Url;

use crate::client::Client;
use crate::error::{ErrorSummary, Result};
use crate::oauth::TokenResponse;

#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T> {
    /// Result of the last successful call. Kept when a later call fails.
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<ErrorSummary>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

/// State holder for repeated executions of one call.
///
/// ```ignore
/// let contacts = Operation::new();
/// let mut updates = contacts.subscribe();
/// contacts.execute(client.contacts().list(&ListFilters::default())).await?;
/// ```
#[derive(Debug)]
pub struct Operation<T> {
    state: watch::Sender<OperationState<T>>,
}

impl<T: Clone> Default for Operation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Operation<T> {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(OperationState::default());
        Self { state }
    }

    /// Run `operation`, publishing the loading state before and the outcome
    /// after it. The result is handed back unchanged.
    pub async fn execute<F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let result = operation.await;

        self.state.send_modify(|state| {
            match &result {
                Ok(data) => state.data = Some(data.clone()),
                Err(error) => {
                    debug!(error = %error, "operation failed");
                    state.error = Some(error.summary());
                }
            }
            state.is_loading = false;
        });

        result
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OperationState<T>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> OperationState<T> {
        self.state.borrow().clone()
    }
}

/// Loading and error state of several concurrent calls, keyed by operation id.
///
/// Only the outcome is recorded; results are handed back to the caller.
#[derive(Debug)]
pub struct Operations {
    state: watch::Sender<HashMap<String, OperationState<()>>>,
}

impl Default for Operations {
    fn default() -> Self {
        Self::new()
    }
}

impl Operations {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(HashMap::new());
        Self { state }
    }

    /// Run `operation` under `id`. The error of a previous run under the
    /// same id is cleared when it starts.
    pub async fn execute<T, F>(&self, id: &str, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.state.send_modify(|states| {
            let state = states.entry(id.to_string()).or_default();
            state.is_loading = true;
            state.error = None;
        });

        let result = operation.await;

        self.state.send_modify(|states| {
            let state = states.entry(id.to_string()).or_default();
            if let Err(error) = &result {
                debug!(operation = id, error = %error, "operation failed");
                state.error = Some(error.summary());
            }
            state.is_loading = false;
        });

        result
    }

    /// `false` for ids that never ran.
    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        self.state.borrow().get(id).is_some_and(|s| s.is_loading)
    }

    #[must_use]
    pub fn error(&self, id: &str) -> Option<ErrorSummary> {
        self.state.borrow().get(id).and_then(|s| s.error.clone())
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HashMap<String, OperationState<()>>> {
        self.state.subscribe()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<ErrorSummary>,
}

/// Sign-in state of a [`Client`].
#[derive(Debug)]
pub struct AuthSession {
    client: Client,
    state: watch::Sender<AuthState>,
}

impl AuthSession {
    /// Wrap `client`. The session starts authenticated if the client already
    /// holds a non-empty access token.
    pub async fn new(client: Client) -> Self {
        let is_authenticated = client
            .access_token()
            .await
            .is_some_and(|token| !token.is_empty());
        let (state, _) = watch::channel(AuthState {
            is_authenticated,
            ..AuthState::default()
        });
        Self { client, state }
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn authorization_url(&self) -> Url {
        self.client.authorization_url()
    }

    /// Exchange the authorization code. A failed login leaves the previous
    /// authentication state as it was.
    #[instrument(skip(self, code))]
    pub async fn login(&self, code: &str) -> Result<TokenResponse> {
        self.begin();
        let result = self.client.exchange_code_for_token(code).await;
        self.state.send_modify(|state| {
            match &result {
                Ok(_) => state.is_authenticated = true,
                Err(error) => state.error = Some(error.summary()),
            }
            state.is_loading = false;
        });
        result
    }

    /// Refresh the access token. A failed refresh signs the session out.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<TokenResponse> {
        self.begin();
        let result = self.client.refresh_access_token().await;
        self.state.send_modify(|state| {
            match &result {
                Ok(_) => state.is_authenticated = true,
                Err(error) => {
                    state.is_authenticated = false;
                    state.error = Some(error.summary());
                }
            }
            state.is_loading = false;
        });
        result
    }

    /// Forget both tokens.
    pub async fn logout(&self) {
        self.client.clear_credentials().await;
        self.state.send_modify(|state| {
            state.is_authenticated = false;
            state.error = None;
        });
        info!("logged out");
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credential, DEFAULT_SCOPE};
    use crate::error::Error;

    fn client() -> Client {
        let credential = Credential::new("id", "secret", "http://localhost/callback", DEFAULT_SCOPE);
        Client::new(credential).unwrap()
    }

    #[tokio::test]
    async fn operation_publishes_data() {
        let operation = Operation::new();
        let mut updates = operation.subscribe();

        let value = operation.execute(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert!(updates.has_changed().unwrap());

        let state = updates.borrow_and_update().clone();
        assert_eq!(state.data, Some(7));
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn failure_keeps_previous_data() {
        let operation = Operation::new();
        operation.execute(async { Ok("first") }).await.unwrap();

        let error = operation
            .execute(async { Err(Error::missing_refresh_token()) })
            .await
            .unwrap_err();
        assert_eq!(error.http_status(), 0);

        let state = operation.state();
        assert_eq!(state.data, Some("first"));
        assert_eq!(state.error.unwrap().http_status, 0);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn operations_are_tracked_per_id() {
        let operations = Operations::new();
        assert!(!operations.is_loading("send"));
        assert_eq!(operations.error("send"), None);

        let error = operations
            .execute("send", async { Err::<(), _>(Error::missing_refresh_token()) })
            .await
            .unwrap_err();
        assert_eq!(error.http_status(), 0);

        let value = operations.execute("load", async { Ok(3) }).await.unwrap();
        assert_eq!(value, 3);

        assert!(!operations.is_loading("send"));
        assert_eq!(
            operations.error("send").unwrap().message,
            "refresh token is required for token refresh"
        );
        assert_eq!(operations.error("load"), None);
        assert_eq!(operations.subscribe().borrow().len(), 2);

        operations.execute("send", async { Ok(()) }).await.unwrap();
        assert_eq!(operations.error("send"), None);
    }

    #[tokio::test]
    async fn operations_report_loading_while_running() {
        let operations = Operations::new();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();

        let call = operations.execute("slow", async {
            wait.await.unwrap();
            Ok(())
        });
        let observer = async {
            tokio::task::yield_now().await;
            let loading = operations.is_loading("slow");
            release.send(()).unwrap();
            loading
        };
        let (result, saw_loading) = tokio::join!(call, observer);

        result.unwrap();
        assert!(saw_loading);
        assert!(!operations.is_loading("slow"));
    }

    #[tokio::test]
    async fn session_mirrors_stored_token() {
        let session = AuthSession::new(client()).await;
        assert!(!session.state().is_authenticated);

        session.client().set_access_token("abc").await;
        let session = AuthSession::new(session.client().clone()).await;
        assert!(session.state().is_authenticated);

        session.logout().await;
        assert!(!session.state().is_authenticated);
        assert_eq!(session.client().access_token().await, None);
    }

    #[tokio::test]
    async fn empty_stored_token_is_not_signed_in() {
        let client = client();
        client.set_access_token("").await;
        let session = AuthSession::new(client).await;
        assert!(!session.state().is_authenticated);
    }

    #[tokio::test]
    async fn refresh_without_token_signs_out() {
        let session = AuthSession::new(client()).await;
        session.client().set_access_token("abc").await;

        let error = session.refresh().await.unwrap_err();
        assert!(matches!(error, Error::MissingRefreshToken { .. }));

        let state = session.state();
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(
            state.error.unwrap().message,
            "refresh token is required for token refresh"
        );
    }
}
