pub mod aggregate;
pub mod tree;

pub use aggregate::Category;
pub use tree::CategoryNode;
