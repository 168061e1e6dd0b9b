use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Категория каталога. Категории образуют дерево через `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Category {
    pub id: i64,
    /// Ссылка на родительскую категорию (None: корень)
    pub parent_id: Option<i64>,
    pub name: String,
    pub enabled: bool,
    pub product_count: i32,
    pub updated: Option<DateTime<Utc>>,
}
