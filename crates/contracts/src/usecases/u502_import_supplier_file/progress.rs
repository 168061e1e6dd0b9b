use serde::{Deserialize, Serialize};

/// Фаза выполнения импорта.
///
/// Idle → Resolving → Storing → Streaming → Committing → Done;
/// после завершения или ошибки оркестратор возвращается в Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    #[default]
    Idle,
    /// Выбор импортёра и поставщика
    Resolving,
    /// Хэширование и сохранение файла
    Storing,
    /// Чтение строк файла
    Streaming,
    /// Запись последней пачки
    Committing,
    Done,
}

impl std::fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Resolving => "resolving",
            ImportPhase::Storing => "storing",
            ImportPhase::Streaming => "streaming",
            ImportPhase::Committing => "committing",
            ImportPhase::Done => "done",
        };
        f.write_str(s)
    }
}
