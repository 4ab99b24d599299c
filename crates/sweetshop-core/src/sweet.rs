//! Inventory items.

use crate::error::ValidationError;
use crate::price::Price;
use serde::{Deserialize, Serialize};

pub type SweetId = i64;

/// A sweet as stored. `quantity` is the stock on hand and never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sweet {
    pub id: SweetId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub quantity: u32,
}

/// Fields of a sweet about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub quantity: u32,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl SweetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }

    /// Trims text fields and rejects blanks.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: self.name.map(|n| non_blank(n, "name")).transpose()?,
            category: self.category.map(|c| non_blank(c, "category")).transpose()?,
            ..self
        })
    }

    /// Applies the patch to a local copy.
    pub fn apply_to(&self, sweet: &mut Sweet) {
        if let Some(name) = &self.name {
            sweet.name = name.clone();
        }
        if let Some(category) = &self.category {
            sweet.category = category.clone();
        }
        if let Some(price) = self.price {
            sweet.price = price;
        }
        if let Some(quantity) = self.quantity {
            sweet.quantity = quantity;
        }
    }
}

pub(crate) fn non_blank(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
