//! # zoho-books-rs
//!
//! A Rust client library for the Zoho Books API.
//!
//! The [`Client`] facade bundles one transport core and one OAuth 2 token
//! manager. Resource APIs for contacts, invoices, customer payments and sales
//! receipts hang off it:
//!
//! ```ignore
//! use zoho_books_rs::{Client, Credential, ListFilters};
//!
//! let client = Client::new(Credential::from_env()?)?;
//! let url = client.authorization_url();
//! // ... send the user to `url`, receive `code` on the redirect URI
//! client.exchange_code_for_token(&code).await?;
//!
//! let page = client.contacts().list(&ListFilters::new().per_page(50)).await?;
//! ```
//!
//! ## Errors
//!
//! Every failure is an [`Error`]. Whatever the variant, [`Error::message`],
//! [`Error::http_status`] (`0` when no response was received) and
//! [`Error::details`] give the normalized view.
//!
//! ## Sentry Integration
//!
//! Errors capture a span trace at the point of creation. Set up tracing with
//! `ErrorLayer` to have them filled in:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())  // Required for SpanTrace capture
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```
//!
//! With the `sentry` feature enabled, errors also convert into Sentry
//! breadcrumbs.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod filters;
pub mod oauth;
pub mod state;
pub mod transport;
pub mod utils;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::Client;
pub use config::{Credential, Endpoints};
pub use endpoints::{Collection, ZohoEndpoint};
pub use entities::*;
pub use error::{Error, ErrorSummary, Result};
pub use filters::{ListFilters, SearchCriterion, SearchOperator, SortOrder};
pub use oauth::{TokenManager, TokenResponse};
pub use state::{AuthSession, AuthState, Operation, OperationState, Operations};
pub use transport::{Request, Transport};

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;

// Re-export the main record types for convenience
pub use entities::contact::{Contact, ContactType};
pub use entities::customer_payment::CustomerPayment;
pub use entities::invoice::Invoice;
pub use entities::line_item::LineItem;
pub use entities::sales_receipt::SalesReceipt;
