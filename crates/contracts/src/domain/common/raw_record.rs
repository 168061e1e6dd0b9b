use serde::{Deserialize, Serialize};

/// Типизированная запись вместе с исходным JSON, как его вернул удалённый API.
///
/// `raw_json` хранится дословно: по нему определяется, изменилась ли запись
/// с прошлой синхронизации, и из него строится детальная карточка.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord<T> {
    pub item: T,
    pub raw_json: String,
}

impl<T> RawRecord<T> {
    pub fn new(item: T, raw_json: impl Into<String>) -> Self {
        Self {
            item,
            raw_json: raw_json.into(),
        }
    }
}
