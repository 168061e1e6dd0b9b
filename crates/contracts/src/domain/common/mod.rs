//! Общие типы агрегатов

pub mod raw_record;

// Re-exports
pub use raw_record::RawRecord;
