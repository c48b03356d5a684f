use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use super::{Address, CustomField, Resource};
use crate::endpoints::Collection;
use crate::utils::date_format::zoho_date_format_option;
use crate::utils::serde_helpers::{empty_string_as_none, null_as_default};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Customer,
    Vendor,
    CustomerVendor,
    #[serde(other)]
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubType {
    Individual,
    Business,
    #[serde(other)]
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub contact_id: String,
    pub contact_name: String,
    pub company_name: Option<String>,
    pub customer_name: Option<String>,
    pub vendor_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub website: Option<String>,
    pub contact_type: Option<ContactType>,
    pub customer_sub_type: Option<SubType>,
    pub vendor_sub_type: Option<SubType>,
    pub is_taxable: Option<bool>,
    pub tax_id: Option<String>,
    pub tax_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tax_percentage: Option<Decimal>,
    pub place_of_contact: Option<String>,
    pub gst_no: Option<String>,
    pub gst_treatment: Option<String>,
    pub vat_treatment: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub payment_terms: Option<i32>,
    pub payment_terms_label: Option<String>,
    pub currency_id: Option<String>,
    pub currency_code: Option<String>,
    pub currency_symbol: Option<String>,
    pub currency_format: Option<String>,
    pub price_precision: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub opening_balance_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub outstanding_receivable_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub outstanding_payable_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub unused_credits_receivable_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub unused_credits_payable_amount: Option<Decimal>,
    pub status: Option<Status>,
    pub payment_reminder_enabled: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub notes: Option<String>,
    pub created_time: Option<String>,
    pub last_modified_time: Option<String>,
}

impl Resource for Contact {
    const COLLECTION: Collection = Collection::Contacts;
    const RECORD_KEY: &'static str = "contact";
    const LIST_KEY: &'static str = "contacts";
}

/// Body of `contacts.create` and, with every field optional, `contacts.update`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Builder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<ContactType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_sub_type: Option<SubType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_sub_type: Option<SubType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_taxable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_balance_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reminder_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Builder {
    /// Start a new contact with the mandatory name.
    #[must_use]
    pub fn new(contact_name: impl Into<String>, contact_type: ContactType) -> Self {
        Self {
            contact_name: Some(contact_name.into()),
            contact_type: Some(contact_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    #[must_use]
    pub fn billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatementTransaction {
    pub transaction_id: String,
    pub transaction_type: Option<String>,
    #[serde(default, with = "zoho_date_format_option")]
    pub transaction_date: Option<Date>,
    pub transaction_date_formatted: Option<String>,
    pub reference_number: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub debit_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub credit_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub balance: Option<Decimal>,
}

/// Account statement of a contact between two dates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default, with = "zoho_date_format_option")]
    pub statement_date: Option<Date>,
    pub statement_date_formatted: Option<String>,
    pub contact_id: String,
    pub contact_name: Option<String>,
    pub currency_id: Option<String>,
    pub currency_code: Option<String>,
    pub currency_symbol: Option<String>,
    pub currency_format: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub opening_balance: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub closing_balance: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<StatementTransaction>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn minimal_contact_decodes() {
        let contact: Contact =
            serde_json::from_value(json!({ "contact_id": "123", "contact_name": "Acme" })).unwrap();
        assert_eq!(contact.contact_id, "123");
        assert_eq!(contact.contact_name, "Acme");
        assert!(contact.custom_fields.is_empty());
        assert_eq!(contact.status, None);
    }

    #[test]
    fn unknown_contact_type_still_decodes() {
        let contact: Contact = serde_json::from_value(json!({
            "contact_id": "9",
            "contact_name": "Acme",
            "contact_type": "employee"
        }))
        .unwrap();
        assert_eq!(contact.contact_type, Some(ContactType::Other));
    }

    #[test]
    fn full_contact_decodes() {
        let contact: Contact = serde_json::from_value(json!({
            "contact_id": "460000000026049",
            "contact_name": "Bowman and Co",
            "company_name": "Bowman and Co",
            "contact_type": "customer",
            "customer_sub_type": "business",
            "status": "active",
            "payment_terms": 15,
            "payment_terms_label": "Net 15",
            "tax_percentage": "",
            "outstanding_receivable_amount": 250.5,
            "payment_reminder_enabled": true,
            "custom_fields": [{ "customfield_id": "46000000012845", "value": "Normal" }],
            "billing_address": { "address": "4900 Hopyard Rd", "city": "Pleasanton", "zip": "94588" },
            "created_time": "2013-08-05T12:06:10+0530"
        }))
        .unwrap();

        assert_eq!(contact.contact_type, Some(ContactType::Customer));
        assert_eq!(contact.customer_sub_type, Some(SubType::Business));
        assert_eq!(contact.status, Some(Status::Active));
        assert_eq!(contact.tax_percentage, None);
        assert_eq!(contact.outstanding_receivable_amount, Some(dec!(250.5)));
        assert_eq!(contact.custom_fields[0].value, json!("Normal"));
        assert_eq!(
            contact.billing_address.unwrap().city.as_deref(),
            Some("Pleasanton")
        );
    }

    #[test]
    fn builder_serializes_only_set_fields() {
        let body = Builder::new("Acme", ContactType::Customer).email("ap@acme.test");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "contact_name": "Acme", "contact_type": "customer", "email": "ap@acme.test" })
        );
    }
}
