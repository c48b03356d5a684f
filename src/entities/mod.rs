use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::Date;

use crate::endpoints::Collection;
use crate::transport::Payload;
use crate::utils::date_format::zoho_date_format_option;

pub mod contact;
pub mod customer_payment;
pub mod invoice;
pub mod line_item;
pub mod sales_receipt;

/// A record type that lives in one of the top-level collections.
///
/// Zoho wraps single records under a singular key (`contact`) and lists under
/// a plural one (`contacts`).
pub trait Resource: DeserializeOwned {
    const COLLECTION: Collection;
    const RECORD_KEY: &'static str;
    const LIST_KEY: &'static str;
}

/// The `{code, message, ...}` wrapper around every JSON response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    pub(crate) fn deserialize_from(payload: &Payload) -> serde_json::Result<Self> {
        match payload {
            Payload::Json(value) => Self::deserialize(value),
            Payload::Binary(bytes) => serde_json::from_slice(bytes),
        }
    }

    /// Remove and decode the field `key`.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> serde_json::Result<T> {
        let value = self
            .payload
            .remove(key)
            .ok_or_else(|| serde::de::Error::custom(format!("missing field `{key}`")))?;
        serde_json::from_value(value)
    }

    /// Like [`Envelope::take`] but absent and `null` fields yield `None`.
    pub fn take_optional<T: DeserializeOwned>(&mut self, key: &str) -> serde_json::Result<Option<T>> {
        match self.payload.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub has_more_page: bool,
    pub report_name: Option<String>,
    pub sort_column: Option<String>,
    pub sort_order: Option<String>,
}

/// One page of a `list` call.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_context: Option<PageContext>,
    pub code: i64,
    pub message: String,
}

impl<T: Resource> Page<T> {
    pub(crate) fn from_envelope(mut envelope: Envelope) -> serde_json::Result<Self> {
        let items = envelope.take(T::LIST_KEY)?;
        let page_context = envelope.take_optional("page_context")?;
        Ok(Self {
            items,
            page_context,
            code: envelope.code,
            message: envelope.message,
        })
    }
}

impl<T> Page<T> {
    /// Whether the service reported a further page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page_context.as_ref().is_some_and(|c| c.has_more_page)
    }
}

/// Response of calls that only report success, e.g. deletes, status changes
/// and emails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub customfield_id: String,
    pub value: Value,
}

impl CustomField {
    #[must_use]
    pub fn new(customfield_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            customfield_id: customfield_id.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    EntityLevel,
    ItemLevel,
}

/// A discount as Zoho reports it: either an amount or a formatted
/// percentage such as `"12.50%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Discount {
    Amount(Decimal),
    Formatted(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    #[serde(default)]
    pub description: String,
    pub commented_by: Option<String>,
    pub commented_by_id: Option<String>,
    #[serde(default, with = "zoho_date_format_option")]
    pub comment_date: Option<Date>,
    pub comment_date_formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub description: &'a str,
}

/// Body of the `email` endpoints of invoices and sales receipts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_mail_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc_mail_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_from_org_email_id: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_customer_statement: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_attachment: Option<bool>,
}

impl EmailRequest {
    #[must_use]
    pub fn to(recipients: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            to_mail_ids: recipients.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cc(mut self, recipient: impl Into<String>) -> Self {
        self.cc_mail_ids.push(recipient.into());
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, send_attachment: bool) -> Self {
        self.send_attachment = Some(send_attachment);
        self
    }
}

/// The pre-filled email Zoho would send for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub email_template_id: Option<String>,
    pub email_template_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub template_id: String,
    pub template_name: String,
    pub template_type: Option<String>,
    pub created_time: Option<String>,
    pub last_modified_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintUrl {
    pub print_url: String,
}

/// Key under which Zoho places payloads that have no resource name.
pub(crate) const DATA_KEY: &str = "data";

/// Generic calls shared by every [`Resource`].
pub mod endpoint_utils {
    use serde::Serialize;

    use super::{
        Acknowledgement, Comment, CommentRequest, DATA_KEY, EmailContent, EmailRequest, Page,
        PrintUrl, Resource, Template,
    };
    use crate::endpoints::ZohoEndpoint;
    use crate::error::Result;
    use crate::filters::ListFilters;
    use crate::transport::{Request, Transport};

    pub async fn list<T: Resource>(transport: &Transport, filters: &ListFilters) -> Result<Page<T>> {
        let request = Request::get(ZohoEndpoint::List(T::COLLECTION)).filters(filters);
        transport.send(request).await?.into_page()
    }

    pub async fn get<T: Resource>(transport: &Transport, id: &str) -> Result<T> {
        let request = Request::get(ZohoEndpoint::Record(T::COLLECTION, id.to_string()));
        transport.send_record(request, T::RECORD_KEY).await
    }

    pub async fn create<T, B>(transport: &Transport, body: &B) -> Result<T>
    where
        T: Resource,
        B: Serialize + ?Sized,
    {
        let request = Request::post(ZohoEndpoint::List(T::COLLECTION)).json(body)?;
        transport.send_record(request, T::RECORD_KEY).await
    }

    pub async fn update<T, B>(transport: &Transport, id: &str, body: &B) -> Result<T>
    where
        T: Resource,
        B: Serialize + ?Sized,
    {
        let request = Request::put(ZohoEndpoint::Record(T::COLLECTION, id.to_string())).json(body)?;
        transport.send_record(request, T::RECORD_KEY).await
    }

    pub async fn delete<T: Resource>(transport: &Transport, id: &str) -> Result<Acknowledgement> {
        let request = Request::delete(ZohoEndpoint::Record(T::COLLECTION, id.to_string()));
        transport.send_acknowledgement(request).await
    }

    /// `POST /{collection}/{id}/{action}` without a body.
    pub async fn action<T: Resource>(
        transport: &Transport,
        id: &str,
        action: &'static str,
    ) -> Result<Acknowledgement> {
        let request = Request::post(ZohoEndpoint::Action(T::COLLECTION, id.to_string(), action));
        transport.send_acknowledgement(request).await
    }

    pub async fn comments<T: Resource>(transport: &Transport, id: &str) -> Result<Vec<Comment>> {
        let request = Request::get(ZohoEndpoint::Comments(T::COLLECTION, id.to_string()));
        transport.send_record(request, "comments").await
    }

    pub async fn add_comment<T: Resource>(
        transport: &Transport,
        id: &str,
        description: &str,
    ) -> Result<Comment> {
        let request = Request::post(ZohoEndpoint::Comments(T::COLLECTION, id.to_string()))
            .json(&CommentRequest { description })?;
        transport.send_record(request, "comment").await
    }

    pub async fn update_comment<T: Resource>(
        transport: &Transport,
        id: &str,
        comment_id: &str,
        description: &str,
    ) -> Result<Comment> {
        let endpoint = ZohoEndpoint::Comment(T::COLLECTION, id.to_string(), comment_id.to_string());
        let request = Request::put(endpoint).json(&CommentRequest { description })?;
        transport.send_record(request, "comment").await
    }

    pub async fn delete_comment<T: Resource>(
        transport: &Transport,
        id: &str,
        comment_id: &str,
    ) -> Result<Acknowledgement> {
        let endpoint = ZohoEndpoint::Comment(T::COLLECTION, id.to_string(), comment_id.to_string());
        transport.send_acknowledgement(Request::delete(endpoint)).await
    }

    pub async fn email<T: Resource>(
        transport: &Transport,
        id: &str,
        email: &EmailRequest,
    ) -> Result<Acknowledgement> {
        let request =
            Request::post(ZohoEndpoint::Action(T::COLLECTION, id.to_string(), "email")).json(email)?;
        transport.send_acknowledgement(request).await
    }

    pub async fn email_content<T: Resource>(transport: &Transport, id: &str) -> Result<EmailContent> {
        let request = Request::get(ZohoEndpoint::Action(T::COLLECTION, id.to_string(), "email"));
        transport.send_record(request, DATA_KEY).await
    }

    pub async fn templates<T: Resource>(transport: &Transport) -> Result<Vec<Template>> {
        let request = Request::get(ZohoEndpoint::Templates(T::COLLECTION));
        transport.send_record(request, "templates").await
    }

    pub async fn pdf<T: Resource>(transport: &Transport, id: &str) -> Result<Vec<u8>> {
        let request = Request::get(ZohoEndpoint::Action(T::COLLECTION, id.to_string(), "pdf"));
        transport.send_bytes(request).await
    }

    pub async fn print_url<T: Resource>(transport: &Transport, id: &str) -> Result<PrintUrl> {
        let request = Request::get(ZohoEndpoint::Action(T::COLLECTION, id.to_string(), "print"));
        transport.send_record(request, DATA_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::entities::contact::Contact;

    #[test]
    fn page_uses_the_plural_key() {
        let envelope: Envelope = serde_json::from_value(json!({
            "code": 0,
            "message": "success",
            "contacts": [
                { "contact_id": "1", "contact_name": "Acme" },
                { "contact_id": "2", "contact_name": "Globex" }
            ],
            "page_context": { "page": 1, "per_page": 200, "has_more_page": true }
        }))
        .unwrap();

        let page = Page::<Contact>::from_envelope(envelope).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].contact_name, "Globex");
        assert!(page.has_more());
        assert_eq!(page.message, "success");
    }

    #[test]
    fn page_without_context() {
        let envelope: Envelope =
            serde_json::from_value(json!({ "code": 0, "message": "success", "contacts": [] })).unwrap();
        let page = Page::<Contact>::from_envelope(envelope).unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn missing_keys_are_reported() {
        let mut envelope: Envelope = serde_json::from_value(json!({ "code": 0 })).unwrap();
        let error = envelope.take::<Vec<Contact>>("contacts").unwrap_err();
        assert!(error.to_string().contains("contacts"));
        assert_eq!(envelope.take_optional::<PageContext>("page_context").unwrap(), None);
    }

    #[test]
    fn discounts_are_amounts_or_formatted() {
        let amount: Discount = serde_json::from_value(json!(12.5)).unwrap();
        assert_eq!(amount, Discount::Amount(dec!(12.5)));
        let formatted: Discount = serde_json::from_value(json!("10.00%")).unwrap();
        assert_eq!(formatted, Discount::Formatted("10.00%".to_string()));
    }

    #[test]
    fn email_request_skips_unset_fields() {
        let request = EmailRequest::to(["billing@acme.test"]).subject("Invoice INV-0001");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "to_mail_ids": ["billing@acme.test"], "subject": "Invoice INV-0001" })
        );
    }
}
