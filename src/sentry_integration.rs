//! Sentry integration for zoho-books-rs errors.
//!
//! Only available with the `sentry` feature:
//!
//! ```toml
//! [dependencies]
//! zoho-books-rs = { version = "0.1", features = ["sentry"] }
//! ```
//!
//! Span traces are only populated when tracing is set up with `ErrorLayer`,
//! see the crate documentation.

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;

/// Longest response body excerpt attached to Sentry context.
const BODY_PREVIEW_LIMIT: usize = 500;

/// Convert a zoho-books-rs Error into a Sentry breadcrumb.
impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let mut data = BTreeMap::new();
        if let Some(url) = error.url() {
            data.insert("url".to_string(), Value::from(url));
        }
        data.insert("http_status".to_string(), Value::from(error.http_status()));

        let category = match error {
            Error::Api { .. } => "zoho.api",
            Error::Network { .. } => "http.request",
            Error::Decode { .. } => "http.response",
            Error::Request { .. } | Error::InvalidEndpoint { .. } => "zoho.config",
            Error::MissingRefreshToken { .. } => "auth",
            Error::TokenGrant { grant, .. } => {
                data.insert("grant".to_string(), Value::from(format!("{grant:?}")));
                "auth"
            }
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(error.message()),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Convert a zoho-books-rs Error into Sentry context data.
///
/// # Example
///
/// ```ignore
/// use sentry::configure_scope;
/// use zoho_books_rs::sentry_integration::error_to_sentry_context;
///
/// if let Err(e) = client.contacts().get("42").await {
///     configure_scope(|scope| {
///         for (key, value) in error_to_sentry_context(&e) {
///             scope.set_extra(&key, value);
///         }
///     });
/// }
/// ```
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "zoho.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    if let Some(url) = error.url() {
        context.insert("zoho.url".to_string(), Value::from(url));
    }

    context.insert("zoho.http_status".to_string(), Value::from(error.http_status()));
    context.insert("zoho.message".to_string(), Value::from(error.message()));

    if let Some(details) = error.details() {
        context.insert("zoho.details".to_string(), details.clone());
    }

    if let Error::Decode {
        body: Some(body), ..
    } = error
    {
        let preview: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();
        let preview = if preview.len() < body.len() {
            format!("{preview}...")
        } else {
            preview
        };
        context.insert("zoho.response_body".to_string(), Value::from(preview));
    }

    context
}
