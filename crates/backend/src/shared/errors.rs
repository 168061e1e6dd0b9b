use thiserror::Error;

/// Ошибки движка синхронизации.
///
/// Ошибки уровня строки (битое поле, пустой SKU) сюда не попадают: такие
/// строки пропускаются на месте. Здесь только ошибки всего вызова.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Удалённый API ответил неуспешным статусом
    #[error("Remote API request failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse remote API JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Для запрошенного формата не зарегистрирован импортёр
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File already imported for supplier {supplier_id} (sha256 {digest})")]
    DuplicateContent { supplier_id: i32, digest: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Операция отменена; уже записанные пачки остаются в базе
    #[error("Cancelled after {committed} committed rows")]
    Cancelled { committed: u64 },

    #[error("Another import is already running")]
    ImportInProgress,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SyncError::Cancelled { .. })
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
