use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use super::{CustomField, Resource};
use crate::endpoints::Collection;
use crate::utils::date_format::{zoho_date_format, zoho_date_format_option};
use crate::utils::serde_helpers::{empty_string_as_none, null_as_default};

/// An invoice a payment was applied to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedInvoice {
    pub invoice_id: String,
    pub invoice_number: Option<String>,
    #[serde(default, alias = "date", with = "zoho_date_format_option")]
    pub invoice_date: Option<Date>,
    #[serde(default, alias = "total", deserialize_with = "empty_string_as_none")]
    pub invoice_amount: Option<Decimal>,
    #[serde(default, alias = "balance_amount", deserialize_with = "empty_string_as_none")]
    pub invoice_balance: Option<Decimal>,
    pub amount_applied: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerPayment {
    pub payment_id: String,
    pub payment_number: Option<String>,
    #[serde(default, with = "zoho_date_format_option")]
    pub date: Option<Date>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub payment_mode: Option<String>,
    pub amount: Decimal,
    pub currency_id: Option<String>,
    pub currency_code: Option<String>,
    pub currency_symbol: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub exchange_rate: Option<Decimal>,
    pub reference_number: Option<String>,
    pub description: Option<String>,
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoices: Vec<AppliedInvoice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
    pub notes: Option<String>,
    pub created_time: Option<String>,
    pub last_modified_time: Option<String>,
}

impl Resource for CustomerPayment {
    const COLLECTION: Collection = Collection::CustomerPayments;
    const RECORD_KEY: &'static str = "payment";
    const LIST_KEY: &'static str = "customerpayments";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceApplication {
    pub invoice_id: String,
    pub amount_applied: Decimal,
}

/// Body of `customer_payments.create` and `customer_payments.update`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Builder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "zoho_date_format_option")]
    pub date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invoices: Vec<InvoiceApplication>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Builder {
    #[must_use]
    pub fn new(
        customer_id: impl Into<String>,
        payment_mode: impl Into<String>,
        amount: Decimal,
        date: Date,
    ) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            payment_mode: Some(payment_mode.into()),
            amount: Some(amount),
            date: Some(date),
            ..Self::default()
        }
    }

    /// Apply part of the payment to an invoice.
    #[must_use]
    pub fn apply_to(mut self, invoice_id: impl Into<String>, amount_applied: Decimal) -> Self {
        self.invoices.push(InvoiceApplication {
            invoice_id: invoice_id.into(),
            amount_applied,
        });
        self
    }

    #[must_use]
    pub fn reference_number(mut self, reference_number: impl Into<String>) -> Self {
        self.reference_number = Some(reference_number.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    #[serde(alias = "payment_refund_id")]
    pub refund_id: String,
    pub refund_number: Option<String>,
    pub refund_mode: Option<String>,
    #[serde(default, alias = "date", with = "zoho_date_format_option")]
    pub refund_date: Option<Date>,
    pub amount: Decimal,
    pub reference_number: Option<String>,
    pub description: Option<String>,
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub created_time: Option<String>,
    pub last_modified_time: Option<String>,
}

/// Body of `customer_payments.create_refund`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub refund_mode: String,
    pub amount: Decimal,
    #[serde(with = "zoho_date_format")]
    pub date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl RefundRequest {
    #[must_use]
    pub fn new(refund_mode: impl Into<String>, amount: Decimal, date: Date) -> Self {
        Self {
            refund_mode: refund_mode.into(),
            amount,
            date,
            reference_number: None,
            description: None,
            account_id: None,
        }
    }
}

/// A payment mode configured for the organization (cash, cheque, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMode {
    pub payment_mode_id: String,
    #[serde(alias = "name")]
    pub payment_mode_name: String,
    pub payment_mode_type: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_offline: bool,
    #[serde(default)]
    pub is_online: bool,
    pub created_time: Option<String>,
    pub last_modified_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::macros::date;

    use super::*;

    #[test]
    fn payment_with_applied_invoices_decodes() {
        let payment: CustomerPayment = serde_json::from_value(json!({
            "payment_id": "9030000079467",
            "payment_number": "2",
            "date": "2016-06-05",
            "payment_mode": "cash",
            "amount": 450.0,
            "exchange_rate": "",
            "invoices": [{
                "invoice_id": "90300000079426",
                "invoice_number": "INV-00001",
                "date": "2016-06-05",
                "total": 450,
                "balance_amount": 0,
                "amount_applied": 450
            }]
        }))
        .unwrap();

        assert_eq!(payment.amount, dec!(450));
        assert_eq!(payment.exchange_rate, None);
        let applied = &payment.invoices[0];
        assert_eq!(applied.invoice_date, Some(date!(2016 - 06 - 05)));
        assert_eq!(applied.invoice_amount, Some(dec!(450)));
        assert_eq!(applied.invoice_balance, Some(dec!(0)));
    }

    #[test]
    fn refund_request_body() {
        let refund = RefundRequest::new("cash", dec!(25), date!(2024 - 05 - 02));
        assert_eq!(
            serde_json::to_value(&refund).unwrap(),
            json!({ "refund_mode": "cash", "amount": 25.0, "date": "2024-05-02" })
        );
    }
}
