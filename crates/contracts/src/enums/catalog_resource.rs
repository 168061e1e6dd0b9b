use serde::{Deserialize, Serialize};

/// Коллекция удалённого каталога, которую можно выгрузить постранично
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogResource {
    Products,
    Categories,
}

impl CatalogResource {
    /// Сегмент пути в URL удалённого API
    pub fn path(&self) -> &'static str {
        match self {
            CatalogResource::Products => "products",
            CatalogResource::Categories => "categories",
        }
    }
}

impl std::fmt::Display for CatalogResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
