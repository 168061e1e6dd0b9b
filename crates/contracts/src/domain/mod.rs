pub mod a001_product;
pub mod a002_category;
pub mod a003_supplier;
pub mod a004_supplier_file;
pub mod a005_supplier_record;
pub mod common;
