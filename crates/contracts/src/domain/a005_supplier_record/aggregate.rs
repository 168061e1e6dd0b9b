use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Нормализованная строка прайс-листа, как её отдаёт импортёр.
///
/// Поставщик и файл проставляет оркестратор импорта.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRow {
    pub sku: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    /// Время импорта, если формат файла его содержит
    pub imported_at: Option<DateTime<Utc>>,
    /// Исходная строка файла (для аудита)
    pub raw: String,
}

/// Сохранённая строка прайс-листа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub id: i64,
    pub supplier_id: i32,
    pub supplier_file_id: Option<i64>,
    pub sku: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub imported_at: DateTime<Utc>,
    pub raw: String,
}
