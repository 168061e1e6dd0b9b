pub mod executor;
pub mod importers;

pub use executor::SupplierImportExecutor;
pub use importers::{ImporterRegistry, SupplierImporter};
