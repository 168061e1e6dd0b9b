pub mod common;
pub mod u501_sync_catalog;
pub mod u502_import_supplier_file;
