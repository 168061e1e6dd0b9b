pub mod details;
pub mod repository;

pub use repository::{ProductScan, ProductStore};
