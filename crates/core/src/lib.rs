pub mod config;
pub mod domain;
pub mod errors;

pub use domain::product::{Product, ProductDraft, ProductId};
pub use errors::DomainError;
