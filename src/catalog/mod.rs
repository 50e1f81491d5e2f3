//! Catalog: categories, brands, models and product variants

use crate::api::models::{Amount, Id, scalar_text, verbatim};
use crate::quote::{ProductSelection, SelectedVariant};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod variants;

pub use variants::VariantPicker;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Availability {
    Available,
    ComingSoon,
    /// Anything else the backend sends, kept verbatim
    Other(String),
    #[default]
    Unknown,
}

impl Availability {
    fn from_wire(value: &str) -> Self {
        match value.trim() {
            "Available" => Availability::Available,
            "Coming Soon" => Availability::ComingSoon,
            other => Availability::Other(other.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn label(&self) -> &str {
        match self {
            Availability::Available => "Available",
            Availability::ComingSoon => "Coming Soon",
            Availability::Other(label) => label,
            Availability::Unknown => "Unavailable",
        }
    }
}

fn availability<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Availability, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| Availability::from_wire(&s))
        .unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: Id,
    #[serde(rename = "cat_name", default)]
    pub name: String,
    #[serde(rename = "fileUrl", default)]
    pub image: Option<String>,
    #[serde(rename = "avail", default, deserialize_with = "availability")]
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Brand {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "brand_img", default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cat_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Model {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "fileUrl", default)]
    pub image: Option<String>,
}

/// Models whose name contains `query`, ignoring case; a blank query keeps everything
pub fn filter_models<'a>(models: &'a [Model], query: &str) -> Vec<&'a Model> {
    let query = query.trim().to_lowercase();
    models
        .iter()
        .filter(|model| query.is_empty() || model.name.to_lowercase().contains(&query))
        .collect()
}

/// RAM/storage read out of a variant's specification
///
/// The specification object itself is kept as received so it can be echoed to the pricing
/// service unchanged; `RAM: 8` and `RAM: "8"` both read as `"8"` here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantSpec {
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub raw: Option<Value>,
}

impl<'de> Deserialize<'de> for VariantSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self {
            ram: raw.get("RAM").and_then(scalar_text),
            storage: raw.get("STORAGE").and_then(scalar_text),
            raw: Some(raw),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Variant {
    pub variant_id: Id,
    #[serde(default)]
    pub variant_name: String,
    #[serde(default, deserialize_with = "verbatim")]
    pub variant_price: Option<Value>,
    #[serde(default)]
    pub specification: VariantSpec,
}

impl Variant {
    pub fn price(&self) -> Option<Amount> {
        self.variant_price.as_ref().and_then(Amount::from_wire)
    }

    pub fn ram(&self) -> Option<&str> {
        self.specification.ram.as_deref()
    }

    pub fn storage(&self) -> Option<&str> {
        self.specification.storage.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDetails {
    pub product_id: Id,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(default)]
    pub unique_specifications: Value,
    #[serde(rename = "leadPrice", default, deserialize_with = "verbatim")]
    pub lead_price: Option<Value>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl ProductDetails {
    pub fn lead_amount(&self) -> Option<Amount> {
        self.lead_price.as_ref().and_then(Amount::from_wire)
    }

    /// Freeze this product and one of its variants into the input of a questionnaire flow
    pub fn selection(&self, variant: &Variant) -> ProductSelection {
        ProductSelection {
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            brand_name: self.brand_name.clone(),
            category_name: self.category_name.clone(),
            product_image: self.product_image.clone(),
            unique_specifications: self.unique_specifications.clone(),
            lead_price: self.lead_price.clone(),
            variant: SelectedVariant {
                variant_id: variant.variant_id.clone(),
                variant_name: variant.variant_name.clone(),
                variant_price: variant.variant_price.clone(),
                specification: variant.specification.raw.clone(),
            },
        }
    }
}
