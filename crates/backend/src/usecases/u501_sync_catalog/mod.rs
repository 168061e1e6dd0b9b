pub mod catalog_api_client;
pub mod executor;
pub mod processors;

pub use catalog_api_client::{AuthMode, CatalogApiClient, CatalogPage, CatalogPager};
pub use executor::{CatalogSyncExecutor, BATCH_SIZE};
