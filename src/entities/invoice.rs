use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use super::line_item::{self, LineItem};
use super::{Address, CustomField, Discount, DiscountType, Resource};
use crate::endpoints::Collection;
use crate::utils::date_format::{zoho_date_format, zoho_date_format_option};
use crate::utils::serde_helpers::{empty_string_as_none, null_as_default};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Draft,
    Sent,
    Viewed,
    Overdue,
    Unpaid,
    PartiallyPaid,
    Paid,
    Void,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    #[serde(default)]
    pub invoice_number: String,
    pub status: Option<Status>,
    #[serde(default, with = "zoho_date_format_option")]
    pub date: Option<Date>,
    #[serde(default, with = "zoho_date_format_option")]
    pub due_date: Option<Date>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub payment_terms: Option<i32>,
    pub payment_terms_label: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub currency_id: Option<String>,
    pub currency_code: Option<String>,
    pub currency_symbol: Option<String>,
    pub price_precision: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub exchange_rate: Option<Decimal>,
    pub discount: Option<Discount>,
    pub is_discount_before_tax: Option<bool>,
    pub discount_type: Option<DiscountType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub shipping_charge: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub adjustment: Option<Decimal>,
    pub adjustment_description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sub_total: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tax_total: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub total: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub payment_made: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub credits_applied: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub balance: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub write_off_amount: Option<Decimal>,
    pub allow_partial_payments: Option<bool>,
    pub is_inclusive_tax: Option<bool>,
    pub salesperson_id: Option<String>,
    pub salesperson_name: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub place_of_supply: Option<String>,
    pub gst_no: Option<String>,
    pub gst_treatment: Option<String>,
    pub vat_treatment: Option<String>,
    pub tax_treatment: Option<String>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub template_id: Option<String>,
    pub template_name: Option<String>,
    pub can_send_in_mail: Option<bool>,
    pub created_time: Option<String>,
    pub last_modified_time: Option<String>,
}

impl Resource for Invoice {
    const COLLECTION: Collection = Collection::Invoices;
    const RECORD_KEY: &'static str = "invoice";
    const LIST_KEY: &'static str = "invoices";
}

/// Body of `invoices.create`.
///
/// `invoices.update` takes the same type; only the fields that are set are
/// sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Builder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "zoho_date_format_option")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "zoho_date_format_option")]
    pub due_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_discount_before_tax: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<line_item::Builder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_charge: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_partial_payments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesperson_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_supply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl Builder {
    #[must_use]
    pub fn new(customer_id: impl Into<String>, date: Date) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            date: Some(date),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn line_item(mut self, line_item: line_item::Builder) -> Self {
        self.line_items.push(line_item);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: Date) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A payment recorded against an invoice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoicePayment {
    pub payment_id: String,
    pub payment_number: Option<String>,
    pub payment_mode: Option<String>,
    #[serde(default, with = "zoho_date_format_option")]
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub amount: Option<Decimal>,
    pub reference_number: Option<String>,
    pub description: Option<String>,
    pub account_id: Option<String>,
    pub account_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreditToApply {
    pub creditnote_id: String,
    pub amount_applied: Decimal,
}

/// Body of `invoices.apply_credits`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyCredits {
    pub credits: Vec<CreditToApply>,
}

impl ApplyCredits {
    #[must_use]
    pub fn credit_note(mut self, creditnote_id: impl Into<String>, amount_applied: Decimal) -> Self {
        self.credits.push(CreditToApply {
            creditnote_id: creditnote_id.into(),
            amount_applied,
        });
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Overdue,
    Reminder,
}

/// Body of `invoices.send_reminder`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub reminder_type: ReminderType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_mail_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_from_org_email_id: Option<bool>,
}

impl ReminderRequest {
    #[must_use]
    pub fn new(reminder_type: ReminderType) -> Self {
        Self {
            reminder_type,
            to_mail_ids: Vec::new(),
            subject: None,
            body: None,
            send_from_org_email_id: None,
        }
    }
}

/// The invoice created from a sales receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedInvoice {
    pub invoice_id: String,
    pub invoice_number: Option<String>,
    #[serde(with = "zoho_date_format")]
    pub date: Date,
    #[serde(default, with = "zoho_date_format_option")]
    pub due_date: Option<Date>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub total: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub balance: Option<Decimal>,
    pub status: Option<Status>,
}
