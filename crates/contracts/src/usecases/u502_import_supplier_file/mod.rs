pub mod progress;
pub mod request;
pub mod response;

pub use progress::ImportPhase;
pub use request::ImportRequest;
pub use response::ImportResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct ImportSupplierFile;

impl UseCaseMetadata for ImportSupplierFile {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "import_supplier_file"
    }

    fn display_name() -> &'static str {
        "Импорт прайс-листа поставщика"
    }

    fn description() -> &'static str {
        "Загрузка файла поставщика с проверкой дубликатов по SHA-256"
    }
}
