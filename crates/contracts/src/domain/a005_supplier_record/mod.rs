pub mod aggregate;

pub use aggregate::{SupplierRecord, SupplierRow};
