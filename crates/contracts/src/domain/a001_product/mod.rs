pub mod aggregate;
pub mod details;

pub use aggregate::{CatalogSummary, Product};
pub use details::{NameValue, OptionItem, ProductDetails};
