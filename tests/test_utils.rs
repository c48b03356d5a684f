use std::sync::Once;

use tracing::info;
use wiremock::MockServer;
use zoho_books_rs::config::DEFAULT_SCOPE;
use zoho_books_rs::{Client, Credential, Endpoints};

pub const CLIENT_ID: &str = "1000.TESTCLIENT";
pub const CLIENT_SECRET: &str = "test-secret";
pub const REDIRECT_URI: &str = "http://localhost:3000/callback";

#[allow(dead_code)]
pub fn credential() -> Credential {
    Credential::new(CLIENT_ID, CLIENT_SECRET, REDIRECT_URI, DEFAULT_SCOPE)
}

/// Creates a client whose API and OAuth endpoints all point at `server`.
#[allow(dead_code)]
pub fn mock_client(server: &MockServer, credential: Credential) -> Client {
    let endpoints = Endpoints::with_origin(&server.uri()).unwrap();
    Client::with_endpoints(credential, endpoints).unwrap()
}

/// Creates a client against `server` that already holds an access token.
#[allow(dead_code)]
pub fn authorized_client(server: &MockServer) -> Client {
    mock_client(server, credential().with_access_token("test-access-token"))
}

static LOGGING_CONFIGURED: Once = Once::new();

/// Setup before test runs
pub fn do_setup() {
    LOGGING_CONFIGURED.call_once(|| tracing_subscriber::fmt().with_test_writer().init());
    info!("Setting up test environment");
}
