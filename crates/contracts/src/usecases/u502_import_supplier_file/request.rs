use serde::{Deserialize, Serialize};

use crate::enums::SupplierKind;

/// Запрос на импорт файла поставщика
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Формат файла (определяет импортёр и поставщика)
    pub kind: SupplierKind,

    /// Путь к локальному файлу
    pub file_path: String,

    /// MIME-тип, если известен вызывающей стороне
    #[serde(default)]
    pub content_type: Option<String>,
}
