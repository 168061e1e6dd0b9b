use chrono::Utc;
use contracts::domain::a004_supplier_file::{SupplierFile, SupplierFileInfo};
use sha2::{Digest, Sha256};

use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};

use crate::shared::errors::{SyncError, SyncResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "supplier_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub supplier_id: i32,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub sha256: String,
    pub content: Vec<u8>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SupplierFile {
    fn from(m: Model) -> Self {
        SupplierFile {
            id: m.id,
            supplier_id: m.supplier_id,
            file_name: m.file_name,
            content_type: m.content_type,
            size: m.size,
            sha256: m.sha256,
            content: m.content,
            uploaded_at: m.uploaded_at,
        }
    }
}

/// Строка списка файлов: все колонки, кроме содержимого
#[derive(Debug, FromQueryResult)]
struct FileInfoRow {
    id: i64,
    supplier_id: i32,
    file_name: String,
    content_type: Option<String>,
    size: i64,
    sha256: String,
    uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl From<FileInfoRow> for SupplierFileInfo {
    fn from(r: FileInfoRow) -> Self {
        SupplierFileInfo {
            id: r.id,
            supplier_id: r.supplier_id,
            file_name: r.file_name,
            content_type: r.content_type,
            size: r.size,
            sha256: r.sha256,
            uploaded_at: r.uploaded_at,
        }
    }
}

/// SHA-256 содержимого в виде hex в нижнем регистре
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Сохранить файл поставщика. Возвращает id файла.
///
/// Повторная загрузка того же содержимого для того же поставщика
/// отклоняется ошибкой `DuplicateContent`. Решает уникальный индекс
/// (supplier_id, sha256); предварительная проверка лишь избавляет от
/// заведомо неудачной вставки.
pub async fn save_file<C: ConnectionTrait>(
    db: &C,
    supplier_id: i32,
    file_name: &str,
    content_type: Option<&str>,
    content: &[u8],
) -> SyncResult<i64> {
    if supplier_id <= 0 {
        return Err(SyncError::Validation(format!(
            "supplier id must be positive, got {}",
            supplier_id
        )));
    }

    let digest = sha256_hex(content);

    if exists(db, supplier_id, &digest).await? {
        return Err(SyncError::DuplicateContent {
            supplier_id,
            digest,
        });
    }

    insert_file(db, supplier_id, file_name, content_type, content, digest).await
}

/// Вставка без предварительной проверки. Нарушение уникального индекса
/// (supplier_id, sha256) превращается в `DuplicateContent`.
async fn insert_file<C: ConnectionTrait>(
    db: &C,
    supplier_id: i32,
    file_name: &str,
    content_type: Option<&str>,
    content: &[u8],
    digest: String,
) -> SyncResult<i64> {
    let size = content.len() as i64;
    let active = ActiveModel {
        supplier_id: Set(supplier_id),
        file_name: Set(file_name.to_string()),
        content_type: Set(content_type.map(str::to_string)),
        size: Set(size),
        sha256: Set(digest.clone()),
        content: Set(content.to_vec()),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    };

    match active.insert(db).await {
        Ok(model) => {
            tracing::info!(
                "Stored file '{}' for supplier {} ({} bytes, sha256 {})",
                file_name,
                supplier_id,
                size,
                digest
            );
            Ok(model.id)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            tracing::warn!(
                "Concurrent upload of the same file for supplier {} (sha256 {})",
                supplier_id,
                digest
            );
            Err(SyncError::DuplicateContent {
                supplier_id,
                digest,
            })
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn exists<C: ConnectionTrait>(db: &C, supplier_id: i32, digest: &str) -> SyncResult<bool> {
    let found = Entity::find()
        .select_only()
        .column(Column::Id)
        .filter(Column::SupplierId.eq(supplier_id))
        .filter(Column::Sha256.eq(digest))
        .into_tuple::<i64>()
        .one(db)
        .await?;
    Ok(found.is_some())
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> SyncResult<Option<SupplierFile>> {
    let model = Entity::find_by_id(id).one(db).await?;
    Ok(model.map(Into::into))
}

/// Файлы поставщика, новые сначала, без содержимого
pub async fn list_files<C: ConnectionTrait>(
    db: &C,
    supplier_id: i32,
) -> SyncResult<Vec<SupplierFileInfo>> {
    let rows = Entity::find()
        .select_only()
        .columns([
            Column::Id,
            Column::SupplierId,
            Column::FileName,
            Column::ContentType,
            Column::Size,
            Column::Sha256,
            Column::UploadedAt,
        ])
        .filter(Column::SupplierId.eq(supplier_id))
        .order_by_desc(Column::UploadedAt)
        .order_by_desc(Column::Id)
        .into_model::<FileInfoRow>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
