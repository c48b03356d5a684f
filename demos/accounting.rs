//! Lists a few records with tokens from the environment.
//!
//! Needs `ZOHO_CLIENT_ID`, `ZOHO_CLIENT_SECRET`, `ZOHO_REDIRECT_URI` and
//! either `ZOHO_ACCESS_TOKEN` or `ZOHO_REFRESH_TOKEN`.

#[macro_use]
extern crate tracing;

use anyhow::Result;
use zoho_books_rs::invoice::Status;
use zoho_books_rs::{Client, Credential, ListFilters, Operation, Page, SortOrder};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let client = Client::new(Credential::from_env()?)?;

    // Without a usable access token, trade the refresh token for one
    if client.access_token().await.is_none() || client.is_token_expiring().await {
        client.refresh_access_token().await?;
    }

    let filters = ListFilters::new()
        .per_page(25)
        .sort("date", SortOrder::Descending);

    let invoices: Operation<Page<zoho_books_rs::Invoice>> = Operation::new();
    let page = invoices.execute(client.invoices().list(&filters)).await?;
    let unpaid = page
        .items
        .iter()
        .filter(|i| matches!(i.status, Some(Status::Unpaid | Status::Overdue)))
        .count();
    info!("found {} invoices, {unpaid} unpaid", page.items.len());

    let payments = client.customer_payments().list(&ListFilters::new().per_page(5)).await?;
    for payment in &payments.items {
        info!(
            "payment {} of {} from {}",
            payment.payment_number.as_deref().unwrap_or("-"),
            payment.amount,
            payment.customer_name.as_deref().unwrap_or("unknown customer"),
        );
    }

    match client.contacts().get("0").await {
        Ok(contact) => info!("unexpected contact: {}", contact.contact_name),
        Err(e) => warn!(status = e.http_status(), "lookup failed: {}", e.message()),
    }

    Ok(())
}
