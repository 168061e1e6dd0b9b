use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::Utc;
use contracts::domain::a005_supplier_record::SupplierRecord;
use contracts::enums::SupplierKind;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_import_supplier_file::{
    ImportPhase, ImportRequest, ImportResponse, ImportSupplierFile,
};
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use super::importers::ImporterRegistry;
use crate::domain::{a003_supplier, a004_supplier_file, a005_supplier_record};
use crate::shared::cancel::CancelFlag;
use crate::shared::errors::{SyncError, SyncResult};

/// Сколько строк копить перед записью в базу
pub const BATCH_SIZE: usize = 200;

/// Executor для UseCase импорта прайс-листа поставщика.
///
/// Один экземпляр выполняет не больше одного импорта одновременно.
pub struct SupplierImportExecutor {
    registry: Arc<ImporterRegistry>,
    db: DatabaseConnection,
    run_guard: Mutex<()>,
    phase: RwLock<ImportPhase>,
}

impl SupplierImportExecutor {
    pub fn new(registry: Arc<ImporterRegistry>, db: DatabaseConnection) -> Self {
        Self {
            registry,
            db,
            run_guard: Mutex::new(()),
            phase: RwLock::new(ImportPhase::Idle),
        }
    }

    /// Текущая фаза импорта
    pub fn phase(&self) -> ImportPhase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: ImportPhase) {
        *self.phase.write().unwrap_or_else(|e| e.into_inner()) = phase;
        tracing::debug!("Import phase: {}", phase);
    }

    pub async fn execute(
        &self,
        request: &ImportRequest,
        cancel: &CancelFlag,
    ) -> SyncResult<ImportResponse> {
        let path = Path::new(&request.file_path);
        let content_type = request
            .content_type
            .clone()
            .or_else(|| guess_content_type(path).map(str::to_string));
        self.run(request.kind, path, content_type.as_deref(), cancel)
            .await
    }

    /// Импортировать файл в формате `kind`
    pub async fn import_file(
        &self,
        kind: SupplierKind,
        path: &Path,
        cancel: &CancelFlag,
    ) -> SyncResult<ImportResponse> {
        self.run(kind, path, guess_content_type(path), cancel).await
    }

    async fn run(
        &self,
        kind: SupplierKind,
        path: &Path,
        content_type: Option<&str>,
        cancel: &CancelFlag,
    ) -> SyncResult<ImportResponse> {
        let _guard = self
            .run_guard
            .try_lock()
            .map_err(|_| SyncError::ImportInProgress)?;

        let started = Instant::now();
        tracing::info!(
            "{}: starting {} import from {}",
            ImportSupplierFile::full_name(),
            kind,
            path.display()
        );

        let result = self.run_import(kind, path, content_type, cancel).await;
        self.set_phase(ImportPhase::Idle);

        match &result {
            Ok(response) => tracing::info!(
                "{} import finished in {:.1}s: {} rows (supplier {}, file {})",
                kind,
                started.elapsed().as_secs_f64(),
                response.record_count,
                response.supplier_id,
                response.supplier_file_id
            ),
            Err(e) if e.is_cancelled() => tracing::warn!("{} import cancelled: {}", kind, e),
            Err(e) => tracing::error!("{} import of {} failed: {}", kind, path.display(), e),
        }

        result
    }

    async fn run_import(
        &self,
        kind: SupplierKind,
        path: &Path,
        content_type: Option<&str>,
        cancel: &CancelFlag,
    ) -> SyncResult<ImportResponse> {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled { committed: 0 });
        }

        self.set_phase(ImportPhase::Resolving);
        let importer = self.registry.get(kind).ok_or_else(|| {
            SyncError::Configuration(format!("no importer registered for supplier kind {}", kind))
        })?;
        let supplier_id =
            a003_supplier::repository::ensure_supplier(&self.db, kind.code(), kind.display_name())
                .await?;

        self.set_phase(ImportPhase::Storing);
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let supplier_file_id = a004_supplier_file::repository::save_file(
            &self.db,
            supplier_id,
            &file_name,
            content_type,
            &content,
        )
        .await?;

        self.set_phase(ImportPhase::Streaming);
        let imported_at = Utc::now();
        let mut committed: u64 = 0;
        let mut batch: Vec<SupplierRecord> = Vec::with_capacity(BATCH_SIZE);

        for row in importer.read(Box::new(Cursor::new(content))) {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled { committed });
            }
            let row = row?;

            batch.push(SupplierRecord {
                id: 0,
                supplier_id,
                supplier_file_id: Some(supplier_file_id),
                sku: row.sku,
                name: row.name,
                price: row.price,
                stock: row.stock,
                imported_at: row.imported_at.unwrap_or(imported_at),
                raw: row.raw,
            });

            if batch.len() >= BATCH_SIZE {
                committed +=
                    a005_supplier_record::repository::insert_batch(&self.db, std::mem::take(&mut batch))
                        .await?;
                tracing::debug!("{} import: {} rows committed", kind, committed);
            }
        }

        self.set_phase(ImportPhase::Committing);
        committed += a005_supplier_record::repository::insert_batch(&self.db, batch).await?;

        self.set_phase(ImportPhase::Done);
        Ok(ImportResponse {
            supplier_id,
            supplier_file_id,
            record_count: committed,
        })
    }
}

/// MIME-тип по расширению файла
fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" => Some("text/plain"),
        "csv" => Some("text/csv"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::importers::{SupplierImporter, SupplierRowIter};
    use crate::shared::data::db::connect_in_memory;
    use contracts::domain::a005_supplier_record::SupplierRow;
    use std::io::BufRead;
    use std::path::PathBuf;

    fn also_text(rows: usize, tag: &str) -> String {
        (0..rows)
            .map(|i| format!("{}-{}\t1\t2\t3\t4\tItem {}\t{}\t{}.50\t8\tBrand\r\n", tag, i, i, i, i))
            .collect()
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    async fn executor() -> SupplierImportExecutor {
        SupplierImportExecutor::new(
            Arc::new(ImporterRegistry::with_defaults()),
            connect_in_memory().await,
        )
    }

    #[tokio::test]
    async fn test_import_stamps_supplier_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "also.txt", &also_text(3, "A"));
        let executor = executor().await;

        let response = executor
            .import_file(SupplierKind::Also, &path, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(response.record_count, 3);
        assert_eq!(executor.phase(), ImportPhase::Idle);

        let records =
            a005_supplier_record::repository::search_records(&executor.db, None, "", 10)
                .await
                .unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.supplier_id == response.supplier_id
            && r.supplier_file_id == Some(response.supplier_file_id)));

        let files = a004_supplier_file::repository::list_files(&executor.db, response.supplier_id)
            .await
            .unwrap();
        assert_eq!(files[0].file_name, "also.txt");
        assert_eq!(files[0].content_type.as_deref(), Some("text/plain"));

        let supplier = a003_supplier::repository::get_by_code(&executor.db, "ALSO")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(supplier.id, response.supplier_id);
    }

    #[tokio::test]
    async fn test_flushes_large_files_in_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "big.txt", &also_text(450, "B"));
        let executor = executor().await;

        let response = executor
            .import_file(SupplierKind::Also, &path, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(response.record_count, 450);
        assert_eq!(
            a005_supplier_record::repository::count_by_file(&executor.db, response.supplier_file_id)
                .await
                .unwrap(),
            450
        );
    }

    #[tokio::test]
    async fn test_duplicate_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_file(&dir, "first.txt", &also_text(2, "D"));
        let copy = write_file(&dir, "copy.txt", &also_text(2, "D"));
        let other = write_file(&dir, "other.txt", &also_text(2, "E"));
        let executor = executor().await;
        let cancel = CancelFlag::new();

        let imported = executor
            .import_file(SupplierKind::Also, &first, &cancel)
            .await
            .unwrap();

        let err = executor
            .import_file(SupplierKind::Also, &copy, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::DuplicateContent { .. }));
        assert_eq!(executor.phase(), ImportPhase::Idle);

        executor
            .import_file(SupplierKind::Also, &other, &cancel)
            .await
            .unwrap();

        assert_eq!(
            a005_supplier_record::repository::count_by_supplier(&executor.db, imported.supplier_id)
                .await
                .unwrap(),
            4
        );
    }

    #[tokio::test]
    async fn test_same_bytes_for_other_supplier_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "prices.csv", "X-1;Mouse;9,99;3\nX-2;Pad;1,50;0\n");
        let executor = executor().await;
        let cancel = CancelFlag::new();

        let eet = executor
            .import_file(SupplierKind::Eet, &path, &cancel)
            .await
            .unwrap();
        let also = executor
            .import_file(SupplierKind::Also, &path, &cancel)
            .await
            .unwrap();

        assert_eq!(eet.record_count, 2);
        // Для ALSO в этих строках меньше 10 колонок
        assert_eq!(also.record_count, 0);
        assert_ne!(eet.supplier_id, also.supplier_id);
    }

    #[tokio::test]
    async fn test_execute_uses_request_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "eet.dat", "SKU;Name;Price;Stock\nZ-1;Disk;10,00;1\n");
        let executor = executor().await;

        let request = ImportRequest {
            kind: SupplierKind::Eet,
            file_path: path.to_string_lossy().into_owned(),
            content_type: Some("application/octet-stream".to_string()),
        };
        let response = executor.execute(&request, &CancelFlag::new()).await.unwrap();
        assert_eq!(response.record_count, 1);

        let files = a004_supplier_file::repository::list_files(&executor.db, response.supplier_id)
            .await
            .unwrap();
        assert_eq!(
            files[0].content_type.as_deref(),
            Some("application/octet-stream")
        );
    }

    #[tokio::test]
    async fn test_pre_cancelled_import_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "also.txt", &also_text(5, "C"));
        let executor = executor().await;
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = executor
            .import_file(SupplierKind::Also, &path, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Cancelled { committed: 0 }));
        assert!(a003_supplier::repository::list_suppliers(&executor.db)
            .await
            .unwrap()
            .is_empty());
    }

    /// Импортёр ALSO, который выставляет отмену на строке `cancel_at`
    struct CancellingImporter {
        rows: usize,
        cancel_at: usize,
        cancel: CancelFlag,
    }

    impl SupplierImporter for CancellingImporter {
        fn kind(&self) -> SupplierKind {
            SupplierKind::Also
        }

        fn read<'a>(
            &self,
            _source: Box<dyn BufRead + Send + 'a>,
        ) -> SupplierRowIter<'a> {
            let cancel = self.cancel.clone();
            let cancel_at = self.cancel_at;
            Box::new((0..self.rows).map(move |i| {
                if i == cancel_at {
                    cancel.cancel();
                }
                Ok(SupplierRow {
                    sku: format!("R-{}", i),
                    name: None,
                    price: None,
                    stock: None,
                    imported_at: None,
                    raw: format!("R-{}", i),
                })
            }))
        }
    }

    #[tokio::test]
    async fn test_cancel_mid_import_keeps_flushed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "also.txt", "placeholder");
        let cancel = CancelFlag::new();

        let mut registry = ImporterRegistry::new();
        registry.register(CancellingImporter {
            rows: 500,
            cancel_at: 250,
            cancel: cancel.clone(),
        });
        let executor = SupplierImportExecutor::new(Arc::new(registry), connect_in_memory().await);

        let err = executor
            .import_file(SupplierKind::Also, &path, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(matches!(err, SyncError::Cancelled { committed: 200 }));
        assert_eq!(executor.phase(), ImportPhase::Idle);

        let supplier = a003_supplier::repository::get_by_code(&executor.db, "ALSO")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            a005_supplier_record::repository::count_by_supplier(&executor.db, supplier.id)
                .await
                .unwrap(),
            200
        );
        assert_eq!(
            a004_supplier_file::repository::list_files(&executor.db, supplier.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_unregistered_kind_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "also.txt", &also_text(1, "U"));
        let executor =
            SupplierImportExecutor::new(Arc::new(ImporterRegistry::new()), connect_in_memory().await);

        let err = executor
            .import_file(SupplierKind::Also, &path, &CancelFlag::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(a003_supplier::repository::list_suppliers(&executor.db)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_run_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "also.txt", &also_text(1, "O"));
        let executor = executor().await;

        let _running = executor.run_guard.try_lock().unwrap();
        let err = executor
            .import_file(SupplierKind::Also, &path, &CancelFlag::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::ImportInProgress));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor().await;

        let err = executor
            .import_file(SupplierKind::Eet, &dir.path().join("absent.csv"), &CancelFlag::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Io(_)));
        assert_eq!(executor.phase(), ImportPhase::Idle);
    }
}
