use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog item. `id` and `created_at` are assigned by the store and never
/// change afterwards; the remaining fields come from caller input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for create and update. Any `id` or `createdAt`
/// present in the request body is ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl ProductDraft {
    /// Rejects drafts with blank name or description. Price is already typed
    /// by deserialization; no sign constraint is enforced.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::MissingField("description"));
        }
        Ok(())
    }
}
