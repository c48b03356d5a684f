use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CustomField, Discount, DiscountType};
use crate::utils::serde_helpers::{empty_string_as_none, null_as_default};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Inventory,
    NonInventory,
    Service,
    #[serde(other)]
    Other,
}

/// A line of an invoice or sales receipt as returned by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub line_item_id: String,
    pub item_id: Option<String>,
    #[serde(alias = "name")]
    pub item_name: Option<String>,
    #[serde(alias = "description")]
    pub item_description: Option<String>,
    pub item_type: Option<ItemType>,
    pub sku: Option<String>,
    pub hsn_or_sac: Option<String>,
    pub unit: Option<String>,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub discount: Option<Discount>,
    pub discount_type: Option<DiscountType>,
    pub tax_id: Option<String>,
    pub tax_name: Option<String>,
    pub tax_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tax_percentage: Option<Decimal>,
    pub item_total: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_custom_fields: Vec<CustomField>,
}

impl LineItem {
    #[must_use]
    pub fn into_builder(self) -> Builder {
        let mut builder = Builder::new(self.quantity, self.rate);
        builder.line_item_id = Some(self.line_item_id);
        builder.item_id = self.item_id;
        builder.item_name = self.item_name;
        builder.item_description = self.item_description;
        builder.item_type = self.item_type.filter(|t| *t != ItemType::Other);
        builder.sku = self.sku;
        builder.hsn_or_sac = self.hsn_or_sac;
        builder.unit = self.unit;
        builder.discount = self.discount;
        builder.discount_type = self.discount_type;
        builder.tax_id = self.tax_id;
        builder.item_custom_fields = self.item_custom_fields;

        builder
    }
}

/// A line in a create or update request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Builder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_or_sac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub quantity: Decimal,
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_custom_fields: Vec<CustomField>,
}

impl Builder {
    #[must_use]
    pub fn new(quantity: Decimal, rate: Decimal) -> Self {
        Self {
            line_item_id: None,
            item_id: None,
            item_name: None,
            item_description: None,
            item_type: None,
            sku: None,
            hsn_or_sac: None,
            unit: None,
            quantity,
            rate,
            discount: None,
            discount_type: None,
            tax_id: None,
            item_custom_fields: Vec::new(),
        }
    }

    /// A line for an existing item of the catalogue.
    #[must_use]
    pub fn item(item_id: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            item_id: Some(item_id.into()),
            ..Self::new(quantity, rate)
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.item_description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tax(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_service_line_and_round_trips_into_builder() {
        let line: LineItem = serde_json::from_value(json!({
            "line_item_id": "460000000039131",
            "item_id": "460000000017088",
            "name": "Hard Drive",
            "description": "500GB, USB 2.0 interface",
            "item_type": "goods",
            "quantity": 2,
            "rate": 120.0,
            "discount": "10.00%",
            "tax_percentage": "",
            "item_total": 216.0,
            "item_custom_fields": null
        }))
        .unwrap();

        assert_eq!(line.item_name.as_deref(), Some("Hard Drive"));
        assert_eq!(line.item_type, Some(ItemType::Other));
        assert_eq!(line.tax_percentage, None);
        assert_eq!(line.discount, Some(Discount::Formatted("10.00%".to_string())));

        let builder = line.into_builder();
        assert_eq!(builder.item_type, None);
        let body = serde_json::to_value(&builder).unwrap();
        assert_eq!(body["line_item_id"], "460000000039131");
        assert_eq!(body["quantity"], json!(2.0));
        assert!(body.get("item_type").is_none());
    }

    #[test]
    fn builder_only_serializes_what_is_set() {
        let builder = Builder::item("9", dec!(1), dec!(50)).description("Consulting");
        assert_eq!(
            serde_json::to_value(&builder).unwrap(),
            json!({
                "item_id": "9",
                "item_description": "Consulting",
                "quantity": 1.0,
                "rate": 50.0
            })
        );
    }
}
