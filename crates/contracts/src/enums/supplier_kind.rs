use serde::{Deserialize, Serialize};

/// Формат прайс-листа поставщика. Определяет, какой импортёр читает файл.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplierKind {
    /// Табличный TXT с фиксированными колонками (ALSO)
    Also,
    /// CSV с разделителем `;` (EET)
    Eet,
}

impl SupplierKind {
    /// Бизнес-код поставщика
    pub fn code(&self) -> &'static str {
        match self {
            SupplierKind::Also => "ALSO",
            SupplierKind::Eet => "EET",
        }
    }

    /// Отображаемое имя поставщика
    pub fn display_name(&self) -> &'static str {
        match self {
            SupplierKind::Also => "ALSO",
            SupplierKind::Eet => "EET Europarts",
        }
    }

    pub fn all() -> Vec<SupplierKind> {
        vec![SupplierKind::Also, SupplierKind::Eet]
    }

    /// Парсинг из кода (без учёта регистра)
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::all()
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for SupplierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
