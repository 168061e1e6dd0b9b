use serde::{Deserialize, Serialize};

/// Результат импорта файла поставщика
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub supplier_id: i32,
    pub supplier_file_id: i64,
    /// Количество записанных строк
    pub record_count: u64,
}
