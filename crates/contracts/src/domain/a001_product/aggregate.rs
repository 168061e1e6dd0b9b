use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Товар каталога удалённого магазина.
///
/// Типизированные поля: проекция исходного JSON; всё, что в неё не попало,
/// остаётся в `raw_json` хранимой записи.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Product {
    /// Идентификатор, назначенный удалённой системой
    pub id: i64,
    pub sku: Option<String>,
    pub name: String,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub enabled: bool,
    /// Время последнего изменения на стороне магазина
    pub updated: Option<DateTime<Utc>>,
}

/// Сводка по локальной копии каталога
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub product_count: u64,
    pub category_count: u64,
    pub last_synced_at: Option<DateTime<Utc>>,
}
