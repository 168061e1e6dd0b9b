//! Общие типы и трейты UseCase

pub mod usecase_metadata;

// Re-exports
pub use usecase_metadata::UseCaseMetadata;
