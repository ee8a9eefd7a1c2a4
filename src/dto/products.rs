use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::products::Model as ProductModel,
    validation::{ProductDraft, ValidationError},
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(min_length = 1, max_length = 100, example = "Laptop")]
    pub name: String,
    #[serde(default)]
    #[schema(max_length = 500)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(minimum = 0, default = 0)]
    pub quantity: i32,
    #[schema(exclusive_minimum = 0, maximum = 1000000, example = 999.99)]
    pub price: f64,
}

impl CreateProductRequest {
    pub fn into_draft(self) -> Result<ProductDraft, ValidationError> {
        ProductDraft {
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            price: self.price,
        }
        .validate()
    }
}

/// Partial update. Absent fields are left untouched; `description: null`
/// clears the description.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }

    /// Overlays the supplied fields on `existing` and validates the result.
    pub fn merge_into(self, existing: &ProductModel) -> Result<ProductDraft, ValidationError> {
        ProductDraft {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            description: match self.description {
                Some(description) => description,
                None => existing.description.clone(),
            },
            quantity: self.quantity.unwrap_or(existing.quantity),
            price: self.price.unwrap_or(existing.price),
        }
        .validate()
    }
}

// A key that is present deserializes to `Some`, even when its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
