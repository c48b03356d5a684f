//! Runs the authorization code flow against Zoho Books.
//!
//! Register `http://localhost:4000/redirect` as redirect URI of your Zoho
//! client and export `ZOHO_CLIENT_ID`, `ZOHO_CLIENT_SECRET` and
//! `ZOHO_REDIRECT_URI` before running.

#[macro_use]
extern crate tracing;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use serde::Deserialize;
use tokio::sync::Mutex;
use warp::Filter;
use zoho_books_rs::{AuthSession, Client, Credential, ListFilters};

lazy_static::lazy_static! {
    static ref REDIRECT_ARGS: Arc<Mutex<Option<RedirectArgs>>> = Arc::new(Mutex::new(None));
}

#[derive(Clone, Deserialize)]
struct RedirectArgs {
    code: String,
    location: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Spawn a local web server to handle the OAuth callback
    std::thread::spawn(|| {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let redirect = warp::get()
                .and(warp::path("redirect"))
                .and(warp::query::<RedirectArgs>())
                .map(|args: RedirectArgs| {
                    tokio::spawn(async move {
                        *REDIRECT_ARGS.lock().await = Some(args);
                    });
                    warp::reply::html("success")
                });
            warp::serve(redirect).run(([127, 0, 0, 1], 4000)).await
        });
    });

    let client = Client::new(Credential::from_env()?)?;
    let session = AuthSession::new(client).await;
    info!("Sign in to Zoho Books: {}", session.authorization_url());

    // Wait for the callback with authorization code
    info!("Waiting for redirect URL to be hit...");
    let RedirectArgs { code, location } = loop {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if let Some(args) = REDIRECT_ARGS.try_lock().ok().and_then(|c| c.clone()) {
            break args;
        }
    };
    if let Some(location) = location {
        info!("account lives in data centre {location}");
    }

    let tokens = session.login(&code).await?;
    info!(api_domain = ?tokens.api_domain(), "signed in");

    let contacts = session
        .client()
        .contacts()
        .list(&ListFilters::new().per_page(10))
        .await?;
    info!("Found {} contacts", contacts.items.len());

    session.logout().await;
    Ok(())
}
