pub mod repository;
pub mod tree;

pub use repository::{CategoryScan, CategoryStore};
pub use tree::build_tree;
