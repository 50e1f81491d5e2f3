//! Price quote payloads
//!
//! `ProductSelection` is chosen upstream (catalog + variant picker) and is read-only to the
//! questionnaire flow. Fields the flow never reads are carried as opaque JSON, and the
//! prices and variant specification go back to the pricing service exactly as the catalog
//! sent them.

use crate::api::models::{Amount, Id, scalar_text, verbatim};
use crate::questionnaire::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The product and variant being sold, with its base (lead) price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSelection {
    pub product_id: Id,
    pub product_name: String,
    pub brand_name: String,
    pub category_name: String,
    pub product_image: Option<String>,
    pub unique_specifications: Value,
    /// Omitted when the catalog did not send one
    #[serde(
        rename = "leadPrice",
        default,
        deserialize_with = "verbatim",
        skip_serializing_if = "Option::is_none"
    )]
    pub lead_price: Option<Value>,
    pub variant: SelectedVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedVariant {
    pub variant_id: Id,
    pub variant_name: String,
    #[serde(default, deserialize_with = "verbatim", skip_serializing_if = "Option::is_none")]
    pub variant_price: Option<Value>,
    #[serde(default, deserialize_with = "verbatim", skip_serializing_if = "Option::is_none")]
    pub specification: Option<Value>,
}

impl ProductSelection {
    /// Product name with the storage size, as shown on the quote screen
    pub fn headline(&self) -> String {
        let storage = self
            .variant
            .specification
            .as_ref()
            .and_then(|spec| spec.get("STORAGE"))
            .and_then(scalar_text);
        match storage {
            Some(storage) => format!("{} ({})", self.product_name, storage),
            None => self.product_name.clone(),
        }
    }

    pub fn lead_amount(&self) -> Option<Amount> {
        self.lead_price.as_ref().and_then(Amount::from_wire)
    }
}

/// Body of the price calculation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRequest {
    #[serde(rename = "selectedProduct")]
    pub selected_product: ProductSelection,
    pub response: Vec<Response>,
}

/// Price computed by the pricing service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteResult {
    pub price: Amount,
}

/// A finished questionnaire: the quote plus everything needed to place the sale
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedQuote {
    pub quote: QuoteResult,
    pub selection: ProductSelection,
    pub responses: Vec<Response>,
}
