use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a001_product::{CatalogSummary, Product, ProductDetails};
use contracts::domain::common::RawRecord;

use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::details::build_details;
use crate::domain::a002_category::repository as category_repository;
use crate::shared::data::upsert::{upsert_rows, RawJsonRow, StoreScan, UpsertStats, UpsertStore};
use crate::shared::errors::SyncResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub sku: Option<String>,
    pub name: String,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub enabled: bool,
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

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            id: m.id,
            sku: m.sku,
            name: m.name,
            price: m.price,
            quantity: m.quantity,
            enabled: m.enabled,
            updated: m.updated,
        }
    }
}

fn to_active(record: RawRecord<Product>, synced_at: chrono::DateTime<Utc>) -> ActiveModel {
    let RawRecord { item, raw_json } = record;
    ActiveModel {
        id: Set(item.id),
        sku: Set(item.sku),
        name: Set(item.name),
        price: Set(item.price),
        quantity: Set(item.quantity),
        enabled: Set(item.enabled),
        updated: Set(item.updated),
        raw_json: Set(raw_json),
        synced_at: Set(synced_at),
    }
}

/// Локальная копия товаров каталога
#[derive(Clone)]
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_raw_json(&self, id: i64) -> SyncResult<Option<String>> {
        let model = Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.raw_json))
    }

    /// Детальная карточка товара из сохранённого исходного JSON
    pub async fn get_details(&self, id: i64) -> SyncResult<Option<ProductDetails>> {
        let Some(model) = Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let raw_json = model.raw_json.clone();
        Ok(Some(build_details(&model.into(), &raw_json)))
    }

    pub async fn count(&self) -> SyncResult<u64> {
        Ok(Entity::find().count(&self.db).await?)
    }

    pub async fn summary(&self) -> SyncResult<CatalogSummary> {
        let product_count = Entity::find().count(&self.db).await?;
        let category_count = category_repository::Entity::find().count(&self.db).await?;

        let last_product = Entity::find()
            .order_by_desc(Column::SyncedAt)
            .one(&self.db)
            .await?
            .map(|m| m.synced_at);
        let last_category = category_repository::Entity::find()
            .order_by_desc(category_repository::Column::SyncedAt)
            .one(&self.db)
            .await?
            .map(|m| m.synced_at);

        Ok(CatalogSummary {
            product_count,
            category_count,
            last_synced_at: last_product.max(last_category),
        })
    }
}

#[async_trait]
impl UpsertStore for ProductStore {
    type Entity = Product;

    async fn upsert_batch(&self, records: Vec<RawRecord<Product>>) -> SyncResult<UpsertStats> {
        upsert_rows(&self.db, records, to_active).await
    }

    async fn get_by_id(&self, id: i64) -> SyncResult<Option<Product>> {
        let model = Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn scan_page(&self, after: Option<i64>, limit: u64) -> SyncResult<Vec<Product>> {
        let mut query = Entity::find().order_by_asc(Column::Id).limit(limit);
        if let Some(after) = after {
            query = query.filter(Column::Id.gt(after));
        }
        let rows = query.all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Постраничный проход по товарам в порядке id
pub type ProductScan<'a> = StoreScan<'a, ProductStore>;
