pub mod catalog_resource;
pub mod supplier_kind;

pub use catalog_resource::CatalogResource;
pub use supplier_kind::SupplierKind;
