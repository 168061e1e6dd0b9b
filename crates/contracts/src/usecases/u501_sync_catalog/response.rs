use serde::{Deserialize, Serialize};

use crate::enums::CatalogResource;

/// Итог синхронизации одной коллекции
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub resource: CatalogResource,
    /// Сколько записей пришло из API
    pub fetched: u64,
    pub inserted: u64,
    pub updated: u64,
    /// Записи с неизменённым исходным JSON (запись пропущена)
    pub unchanged: u64,
    /// Записи без корректного идентификатора
    pub skipped: u64,
}

impl SyncResponse {
    pub fn new(resource: CatalogResource) -> Self {
        Self {
            resource,
            fetched: 0,
            inserted: 0,
            updated: 0,
            unchanged: 0,
            skipped: 0,
        }
    }
}
