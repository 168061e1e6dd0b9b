pub mod request;
pub mod response;

pub use request::SyncRequest;
pub use response::SyncResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct SyncCatalog;

impl UseCaseMetadata for SyncCatalog {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "sync_catalog"
    }

    fn display_name() -> &'static str {
        "Синхронизация каталога"
    }

    fn description() -> &'static str {
        "Постраничная загрузка товаров и категорий магазина в локальную базу"
    }
}
