use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Поставщик, чьи прайс-листы загружаются в систему
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i32,
    /// Уникальный бизнес-код (например, "ALSO")
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
