use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use super::line_item::{self, LineItem};
use super::{Address, CustomField, Discount, DiscountType, Resource};
use crate::endpoints::Collection;
use crate::utils::date_format::zoho_date_format_option;
use crate::utils::serde_helpers::{empty_string_as_none, null_as_default};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesReceipt {
    #[serde(alias = "sales_receipt_id")]
    pub salesreceipt_id: String,
    #[serde(default, alias = "receipt_number")]
    pub salesreceipt_number: String,
    #[serde(default, with = "zoho_date_format_option")]
    pub date: Option<Date>,
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub payment_mode: Option<String>,
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
    pub is_inclusive_tax: Option<bool>,
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

impl Resource for SalesReceipt {
    const COLLECTION: Collection = Collection::SalesReceipts;
    const RECORD_KEY: &'static str = "sales_receipt";
    const LIST_KEY: &'static str = "salesreceipts";
}

/// Body of `sales_receipts.create` and `sales_receipts.update`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Builder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesreceipt_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "zoho_date_format_option")]
    pub date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<String>,
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
    pub fn payment_mode(mut self, payment_mode: impl Into<String>) -> Self {
        self.payment_mode = Some(payment_mode.into());
        self
    }
}

/// Optional overrides for `sales_receipts.convert_to_invoice`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceConversion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "zoho_date_format_option")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "zoho_date_format_option")]
    pub due_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
}

/// Optional overrides for `sales_receipts.convert_to_credit_note`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteConversion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditnote_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "zoho_date_format_option")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
}

/// The credit note created from a sales receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedCreditNote {
    pub creditnote_id: String,
    pub creditnote_number: Option<String>,
    #[serde(default, with = "zoho_date_format_option")]
    pub date: Option<Date>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub total: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub balance: Option<Decimal>,
    pub status: Option<String>,
}
