pub mod aggregate;

pub use aggregate::{SupplierFile, SupplierFileInfo};
