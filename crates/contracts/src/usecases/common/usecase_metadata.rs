/// Метаданные UseCase: индекс и имена для логов и CLI
pub trait UseCaseMetadata {
    /// Индекс UseCase ("u501")
    fn usecase_index() -> &'static str;

    /// Техническое имя ("sync_catalog")
    fn usecase_name() -> &'static str;

    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// "u501_sync_catalog"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
