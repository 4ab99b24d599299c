//! API request and response types.
//!
//! Request types keep every field optional so that a missing field surfaces
//! as a [`ValidationError`] with the field name rather than a generic
//! deserialisation failure.

use crate::error::ValidationError;
use crate::price::Price;
use crate::role::Role;
use crate::sweet::{NewSweet, non_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Returns `(username, password)`. The username is trimmed, the password
    /// is taken verbatim.
    pub fn validate(self) -> Result<(String, String), ValidationError> {
        let username = non_blank(
            self.username.ok_or(ValidationError::MissingField("username"))?,
            "username",
        )?;
        let password = self.password.ok_or(ValidationError::MissingField("password"))?;
        if password.is_empty() {
            return Err(ValidationError::EmptyField("password"));
        }
        Ok((username, password))
    }
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Sweets
// =============================================================================

/// Body of `POST /sweets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSweetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl CreateSweetRequest {
    pub fn validate(self) -> Result<NewSweet, ValidationError> {
        Ok(NewSweet {
            name: non_blank(self.name.ok_or(ValidationError::MissingField("name"))?, "name")?,
            category: non_blank(
                self.category.ok_or(ValidationError::MissingField("category"))?,
                "category",
            )?,
            price: self.price.ok_or(ValidationError::MissingField("price"))?,
            quantity: self.quantity.ok_or(ValidationError::MissingField("quantity"))?,
        })
    }
}

/// Body of `POST /sweets/{id}/purchase` and `POST /sweets/{id}/restock`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockRequest {
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl StockRequest {
    pub fn new(quantity: u32) -> Self {
        Self {
            quantity: Some(i64::from(quantity)),
        }
    }

    pub fn positive_quantity(&self) -> Result<u32, ValidationError> {
        let quantity = self.quantity.ok_or(ValidationError::MissingField("quantity"))?;
        if quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }
        u32::try_from(quantity).map_err(|_| ValidationError::QuantityTooLarge(quantity))
    }
}

/// Query of `GET /sweets/search`. Every supplied filter must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Case-insensitive substring of the name.
    #[serde(default, alias = "q", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exact category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Price>,
}

impl SearchParams {
    /// Trims text filters and drops the blank ones.
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Self {
            name: keep(self.name),
            category: keep(self.category),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

// =============================================================================
// Errors
// =============================================================================

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable kind, e.g. `bad_request`.
    pub error: String,
    /// Human-readable explanation.
    pub message: String,
}
