pub mod catalog;
pub mod seed;

pub use catalog::{CatalogError, CatalogStore, InMemoryCatalog};
pub use seed::demo_products;
