pub mod also_txt;
pub mod eet_csv;

use std::collections::HashMap;
use std::io::{self, BufRead};
use std::sync::Arc;

use contracts::domain::a005_supplier_record::SupplierRow;
use contracts::enums::SupplierKind;

pub use also_txt::AlsoTxtImporter;
pub use eet_csv::EetCsvImporter;

/// Однопроходная последовательность строк прайс-листа
pub type SupplierRowIter<'a> = Box<dyn Iterator<Item = io::Result<SupplierRow>> + Send + 'a>;

/// Читатель прайс-листа одного формата.
///
/// Битые строки пропускаются на месте; ошибкой завершается только чтение
/// самого источника.
pub trait SupplierImporter: Send + Sync {
    fn kind(&self) -> SupplierKind;

    fn read<'a>(&self, source: Box<dyn BufRead + Send + 'a>) -> SupplierRowIter<'a>;
}

/// Реестр импортёров по формату файла
pub struct ImporterRegistry {
    importers: HashMap<SupplierKind, Arc<dyn SupplierImporter>>,
}

impl ImporterRegistry {
    pub fn new() -> Self {
        Self {
            importers: HashMap::new(),
        }
    }

    /// Реестр со всеми встроенными форматами
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AlsoTxtImporter);
        registry.register(EetCsvImporter);
        registry
    }

    /// Регистрирует импортёр; прежний импортёр того же формата заменяется.
    pub fn register<T: SupplierImporter + 'static>(&mut self, importer: T) {
        self.importers.insert(importer.kind(), Arc::new(importer));
    }

    pub fn get(&self, kind: SupplierKind) -> Option<Arc<dyn SupplierImporter>> {
        self.importers.get(&kind).cloned()
    }

    pub fn kinds(&self) -> Vec<SupplierKind> {
        let mut kinds: Vec<_> = self.importers.keys().copied().collect();
        kinds.sort_by_key(|k| k.code());
        kinds
    }
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
