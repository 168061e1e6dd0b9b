use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Загруженный файл поставщика вместе с содержимым.
///
/// Пара (`supplier_id`, `sha256`) уникальна: один и тот же файл нельзя
/// загрузить для поставщика дважды.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierFile {
    pub id: i64,
    pub supplier_id: i32,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: i64,
    /// SHA-256 содержимого, hex в нижнем регистре
    pub sha256: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// Описание файла без содержимого (для списков)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierFileInfo {
    pub id: i64,
    pub supplier_id: i32,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub sha256: String,
    pub uploaded_at: DateTime<Utc>,
}
