use serde::{Deserialize, Serialize};

use crate::enums::CatalogResource;

/// Запрос на синхронизацию каталога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Какие коллекции синхронизировать (по порядку)
    pub resources: Vec<CatalogResource>,

    /// Размер страницы удалённого API; None: из конфигурации
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl SyncRequest {
    /// Полная синхронизация: сначала категории, затем товары
    pub fn all() -> Self {
        Self {
            resources: vec![CatalogResource::Categories, CatalogResource::Products],
            page_size: None,
        }
    }
}
