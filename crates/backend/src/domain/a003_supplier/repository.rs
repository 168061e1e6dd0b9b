use chrono::Utc;
use contracts::domain::a003_supplier::Supplier;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::errors::{SyncError, SyncResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Supplier {
    fn from(m: Model) -> Self {
        Supplier {
            id: m.id,
            code: m.code,
            name: m.name,
            created_at: m.created_at,
        }
    }
}

/// Найти поставщика по коду, создать при отсутствии, обновить имя если
/// оно изменилось. Возвращает id поставщика.
pub async fn ensure_supplier<C: ConnectionTrait>(db: &C, code: &str, name: &str) -> SyncResult<i32> {
    let code = code.trim();
    if code.is_empty() {
        return Err(SyncError::Validation(
            "supplier code must not be empty".to_string(),
        ));
    }
    let name = name.trim();

    let existing = Entity::find()
        .filter(Column::Code.eq(code))
        .one(db)
        .await?;

    match existing {
        Some(model) if model.name == name => Ok(model.id),
        Some(model) => {
            tracing::info!(
                "Renaming supplier {}: '{}' -> '{}'",
                code,
                model.name,
                name
            );
            let id = model.id;
            let mut active: ActiveModel = model.into();
            active.name = Set(name.to_string());
            active.update(db).await?;
            Ok(id)
        }
        None => {
            let active = ActiveModel {
                code: Set(code.to_string()),
                name: Set(name.to_string()),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            let model = active.insert(db).await?;
            tracing::info!("Created supplier {} (id {})", code, model.id);
            Ok(model.id)
        }
    }
}

pub async fn get_by_code<C: ConnectionTrait>(db: &C, code: &str) -> SyncResult<Option<Supplier>> {
    let model = Entity::find()
        .filter(Column::Code.eq(code.trim()))
        .one(db)
        .await?;
    Ok(model.map(Into::into))
}

pub async fn list_suppliers<C: ConnectionTrait>(db: &C) -> SyncResult<Vec<Supplier>> {
    let mut items: Vec<Supplier> = Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(items)
}
