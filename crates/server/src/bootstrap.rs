use std::sync::Arc;

use chrono::Utc;
use shelf_core::config::{AppConfig, ConfigError, LoadOptions};
use shelf_store::{demo_products, InMemoryCatalog};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<InMemoryCatalog>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    Ok(bootstrap_with_config(config))
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let catalog = if config.catalog.seed_demo_data {
        let products = demo_products(Utc::now());
        info!(
            event_name = "system.bootstrap.catalog_seeded",
            count = products.len(),
            "catalog seeded with demo products"
        );
        Arc::new(InMemoryCatalog::with_products(products))
    } else {
        info!(event_name = "system.bootstrap.catalog_empty", "catalog starting empty");
        Arc::new(InMemoryCatalog::new())
    };

    Application { config, catalog }
}
