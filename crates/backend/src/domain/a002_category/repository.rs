use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a002_category::Category;
use contracts::domain::common::RawRecord;

use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::shared::data::upsert::{upsert_rows, RawJsonRow, StoreScan, UpsertStats, UpsertStore};
use crate::shared::errors::SyncResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub enabled: bool,
    pub product_count: i32,
    pub updated: Option<chrono::DateTime<chrono::Utc>>,
    pub raw_json: String,
    pub synced_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl RawJsonRow for Model {
    fn raw_json(&self) -> &str {
        &self.raw_json
    }
}

impl From<Model> for Category {
    fn from(m: Model) -> Self {
        Category {
            id: m.id,
            parent_id: m.parent_id,
            name: m.name,
            enabled: m.enabled,
            product_count: m.product_count,
            updated: m.updated,
        }
    }
}

fn to_active(record: RawRecord<Category>, synced_at: chrono::DateTime<Utc>) -> ActiveModel {
    let RawRecord { item, raw_json } = record;
    ActiveModel {
        id: Set(item.id),
        parent_id: Set(item.parent_id),
        name: Set(item.name),
        enabled: Set(item.enabled),
        product_count: Set(item.product_count),
        updated: Set(item.updated),
        raw_json: Set(raw_json),
        synced_at: Set(synced_at),
    }
}

/// Локальная копия категорий каталога
#[derive(Clone)]
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> SyncResult<u64> {
        Ok(Entity::find().count(&self.db).await?)
    }
}

#[async_trait]
impl UpsertStore for CategoryStore {
    type Entity = Category;

    async fn upsert_batch(&self, records: Vec<RawRecord<Category>>) -> SyncResult<UpsertStats> {
        upsert_rows(&self.db, records, to_active).await
    }

    async fn get_by_id(&self, id: i64) -> SyncResult<Option<Category>> {
        let model = Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn scan_page(&self, after: Option<i64>, limit: u64) -> SyncResult<Vec<Category>> {
        let mut query = Entity::find().order_by_asc(Column::Id).limit(limit);
        if let Some(after) = after {
            query = query.filter(Column::Id.gt(after));
        }
        let rows = query.all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Постраничный проход по категориям в порядке id
pub type CategoryScan<'a> = StoreScan<'a, CategoryStore>;
