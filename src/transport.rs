//! The request pipeline every resource call goes through.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing_error::SpanTrace;
use url::Url;

use crate::endpoints::ZohoEndpoint;
use crate::entities::{Acknowledgement, Envelope, Page, Resource};
use crate::error::{Error, Result};
use crate::filters::ListFilters;
use crate::oauth::TokenStore;

/// Every request is abandoned after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How the body of a successful response is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    #[default]
    Json,
    /// Raw bytes, e.g. a PDF.
    Binary,
}

/// Describes one call against the API. Built per call, never persisted.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    endpoint: ZohoEndpoint,
    query: Vec<(String, String)>,
    body: Option<Value>,
    kind: ResponseKind,
}

impl Request {
    #[must_use]
    pub fn new(method: Method, endpoint: ZohoEndpoint) -> Self {
        Self {
            method,
            endpoint,
            query: Vec::new(),
            body: None,
            kind: ResponseKind::Json,
        }
    }

    #[must_use]
    pub fn get(endpoint: ZohoEndpoint) -> Self {
        Self::new(Method::GET, endpoint)
    }

    #[must_use]
    pub fn post(endpoint: ZohoEndpoint) -> Self {
        Self::new(Method::POST, endpoint)
    }

    #[must_use]
    pub fn put(endpoint: ZohoEndpoint) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    #[must_use]
    pub fn delete(endpoint: ZohoEndpoint) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: &ListFilters) -> Self {
        self.query.extend(filters.to_query_pairs());
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns [`Error::Request`] if the body can't be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(Error::request)?);
        Ok(self)
    }

    #[must_use]
    pub fn binary(mut self) -> Self {
        self.kind = ResponseKind::Binary;
        self
    }

    /// Resolve the full URL, query included, below `base`.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = self.endpoint.to_url_with_base(base)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON; `Value::Null` for an empty body.
    Json(Value),
    Binary(Vec<u8>),
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub url: Url,
    pub payload: Payload,
}

impl Reply {
    fn decode_error(&self, source: serde_json::Error) -> Error {
        let body = match &self.payload {
            Payload::Json(value) => value.to_string(),
            Payload::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        };
        error!(url = %self.url, status = %self.status, error = %source, "failed to decode response");
        Error::Decode {
            source,
            status: self.status,
            url: self.url.to_string(),
            body: Some(body),
            span_trace: SpanTrace::capture(),
        }
    }

    /// Decode the whole body.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if the body doesn't have the shape of `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        let decoded = match &self.payload {
            Payload::Json(value) => T::deserialize(value),
            Payload::Binary(bytes) => serde_json::from_slice(bytes),
        };
        decoded.map_err(|e| self.decode_error(e))
    }

    /// Decode a bare success notice. An empty body counts as success.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if a non-empty body isn't an acknowledgement.
    pub fn into_acknowledgement(self) -> Result<Acknowledgement> {
        if self.payload == Payload::Json(Value::Null) {
            return Ok(Acknowledgement::default());
        }
        self.into_json()
    }

    /// Decode the record stored under `key` of the response envelope.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if the key is missing or malformed.
    pub fn into_record<T: DeserializeOwned>(self, key: &str) -> Result<T> {
        let decoded = Envelope::deserialize_from(&self.payload)
            .and_then(|mut envelope| envelope.take(key));
        decoded.map_err(|e| self.decode_error(e))
    }

    /// Decode a paginated list of `T`.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if the list is missing or malformed.
    pub fn into_page<T: Resource>(self) -> Result<Page<T>> {
        let decoded = Envelope::deserialize_from(&self.payload).and_then(Page::from_envelope);
        decoded.map_err(|e| self.decode_error(e))
    }

    /// The raw body bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self.payload {
            Payload::Binary(bytes) => bytes,
            Payload::Json(Value::Null) => Vec::new(),
            Payload::Json(value) => value.to_string().into_bytes(),
        }
    }
}

/// The single point through which every resource request flows.
///
/// Cloning is cheap; clones share the HTTP connection pool and the token
/// store.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    api_base: Url,
    tokens: TokenStore,
}

impl Transport {
    /// Build a transport with the fixed timeout and JSON default headers.
    ///
    /// # Errors
    /// Returns [`Error::Request`] if the HTTP client can't be initialised.
    pub fn new(api_base: Url, tokens: TokenStore) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(Error::request)?;

        Ok(Self {
            http,
            api_base,
            tokens,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn authorization(&self) -> Result<Option<HeaderValue>> {
        let Some(token) = self.tokens.access_token().await.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let mut value =
            HeaderValue::from_str(&format!("Zoho-oauthtoken {token}")).map_err(Error::request)?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    /// Dispatch a request. Performs exactly one network call.
    ///
    /// # Errors
    /// * [`Error::Api`] for a non-2xx response.
    /// * [`Error::Network`] if no response arrived.
    /// * [`Error::Request`] or [`Error::InvalidEndpoint`] if the request
    ///   could not be built.
    /// * [`Error::Decode`] if a JSON body is not valid JSON.
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = ?request.endpoint))]
    pub async fn send(&self, request: Request) -> Result<Reply> {
        let url = request.url(&self.api_base)?;
        let mut builder = self.http.request(request.method.clone(), url.clone());
        if let Some(authorization) = self.authorization().await? {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        if let Some(body) = &request.body {
            trace!(json = %body, "request body");
            builder = builder.json(body);
        }

        trace!(%url, "dispatching request");
        let response = builder.send().await.map_err(|e| {
            error!(%url, error = %e, "request failed without a response");
            Error::from_reqwest(e)
        })?;

        let status = response.status();
        let url = response.url().clone();
        let bytes = response.bytes().await.map_err(Error::network)?;
        debug!(%url, %status, size = bytes.len(), "received response");

        if !status.is_success() {
            return Err(api_error(status, &url, &bytes));
        }

        let payload = match request.kind {
            ResponseKind::Binary => Payload::Binary(bytes.to_vec()),
            ResponseKind::Json if bytes.iter().all(u8::is_ascii_whitespace) => {
                Payload::Json(Value::Null)
            }
            ResponseKind::Json => {
                let value = serde_json::from_slice(&bytes).map_err(|source| {
                    error!(%url, %status, error = %source, "response body is not JSON");
                    Error::Decode {
                        source,
                        status,
                        url: url.to_string(),
                        body: Some(String::from_utf8_lossy(&bytes).into_owned()),
                        span_trace: SpanTrace::capture(),
                    }
                })?;
                Payload::Json(value)
            }
        };

        Ok(Reply {
            status,
            url,
            payload,
        })
    }

    /// Dispatch a call that answers with a success notice only.
    pub async fn send_acknowledgement(&self, request: Request) -> Result<Acknowledgement> {
        self.send(request).await?.into_acknowledgement()
    }

    /// Dispatch and decode the record under `key`.
    pub async fn send_record<T: DeserializeOwned>(&self, request: Request, key: &str) -> Result<T> {
        self.send(request).await?.into_record(key)
    }

    /// Dispatch and return the raw body.
    pub async fn send_bytes(&self, request: Request) -> Result<Vec<u8>> {
        Ok(self.send(request.binary()).await?.into_bytes())
    }
}

fn api_error(status: StatusCode, url: &Url, body: &[u8]) -> Error {
    let details = (!body.is_empty()).then(|| {
        serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
    });
    let message = details
        .as_ref()
        .and_then(|d| d.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map_or_else(
            || format!("request failed with status code {}", status.as_u16()),
            ToString::to_string,
        );

    if status.is_client_error() {
        warn!(%url, %status, %message, "request rejected");
    } else {
        error!(%url, %status, %message, "request failed");
    }

    Error::Api {
        status,
        message,
        url: url.to_string(),
        details,
        span_trace: SpanTrace::capture(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::endpoints::Collection;

    #[test]
    fn api_error_prefers_server_message() {
        let url = Url::parse("https://books.zoho.com/api/v3/contacts/1").unwrap();
        let error = api_error(
            StatusCode::NOT_FOUND,
            &url,
            br#"{"code":1002,"message":"Contact not found"}"#,
        );
        assert_eq!(error.http_status(), 404);
        assert_eq!(error.message(), "Contact not found");
        assert_eq!(error.details(), Some(&json!({ "code": 1002, "message": "Contact not found" })));
    }

    #[test]
    fn api_error_falls_back_to_generic_message() {
        let url = Url::parse("https://books.zoho.com/api/v3/contacts").unwrap();
        let error = api_error(StatusCode::BAD_GATEWAY, &url, b"<html>bad gateway</html>");
        assert_eq!(error.message(), "request failed with status code 502");
        assert_eq!(error.details(), Some(&json!("<html>bad gateway</html>")));

        let error = api_error(StatusCode::INTERNAL_SERVER_ERROR, &url, b"");
        assert_eq!(error.message(), "request failed with status code 500");
        assert!(error.details().is_none());
    }

    #[test]
    fn request_url_keeps_query_order() {
        let base = Url::parse("https://books.zoho.com/api/v3").unwrap();
        let url = Request::get(ZohoEndpoint::List(Collection::Invoices))
            .query("customer_id", "42")
            .filters(&ListFilters::new().page(3))
            .url(&base)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://books.zoho.com/api/v3/invoices?customer_id=42&page=3"
        );

        let url = Request::get(ZohoEndpoint::List(Collection::Contacts))
            .filters(&ListFilters::default())
            .url(&base)
            .unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn reply_decodes_records_and_reports_missing_keys() {
        let reply = Reply {
            status: StatusCode::OK,
            url: Url::parse("https://books.zoho.com/api/v3/contacts/1").unwrap(),
            payload: Payload::Json(json!({
                "code": 0,
                "message": "success",
                "contact": { "contact_id": "1" }
            })),
        };

        let value: Value = reply.clone().into_record("contact").unwrap();
        assert_eq!(value, json!({ "contact_id": "1" }));

        let error = reply.into_record::<Value>("invoice").unwrap_err();
        assert_eq!(error.http_status(), 200);
        assert!(matches!(error, Error::Decode { .. }));
    }
}
