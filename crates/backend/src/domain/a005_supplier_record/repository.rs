use contracts::domain::a005_supplier_record::SupplierRecord;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::shared::errors::SyncResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "supplier_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub supplier_id: i32,
    pub supplier_file_id: Option<i64>,
    pub sku: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub imported_at: chrono::DateTime<chrono::Utc>,
    pub raw: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SupplierRecord {
    fn from(m: Model) -> Self {
        SupplierRecord {
            id: m.id,
            supplier_id: m.supplier_id,
            supplier_file_id: m.supplier_file_id,
            sku: m.sku,
            name: m.name,
            price: m.price,
            stock: m.stock,
            imported_at: m.imported_at,
            raw: m.raw,
        }
    }
}

fn to_active(record: SupplierRecord) -> ActiveModel {
    ActiveModel {
        supplier_id: Set(record.supplier_id),
        supplier_file_id: Set(record.supplier_file_id),
        sku: Set(record.sku),
        name: Set(record.name),
        price: Set(record.price),
        stock: Set(record.stock),
        imported_at: Set(record.imported_at),
        raw: Set(record.raw),
        ..Default::default()
    }
}

/// Вставить пачку строк одной транзакцией. Поле `id` записей игнорируется.
pub async fn insert_batch<C>(db: &C, records: Vec<SupplierRecord>) -> SyncResult<u64>
where
    C: ConnectionTrait + TransactionTrait,
{
    if records.is_empty() {
        return Ok(0);
    }

    let count = records.len() as u64;
    let txn = db.begin().await?;
    Entity::insert_many(records.into_iter().map(to_active))
        .exec(&txn)
        .await?;
    txn.commit().await?;
    Ok(count)
}

/// Поиск строк по подстроке в SKU или наименовании
pub async fn search_records<C: ConnectionTrait>(
    db: &C,
    supplier_id: Option<i32>,
    query: &str,
    limit: u64,
) -> SyncResult<Vec<SupplierRecord>> {
    let mut select = Entity::find();

    if let Some(supplier_id) = supplier_id {
        select = select.filter(Column::SupplierId.eq(supplier_id));
    }

    let query = query.trim();
    if !query.is_empty() {
        select = select.filter(
            Condition::any()
                .add(Column::Sku.contains(query))
                .add(Column::Name.contains(query)),
        );
    }

    let items = select
        .order_by_asc(Column::Sku)
        .order_by_asc(Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count_by_supplier<C: ConnectionTrait>(db: &C, supplier_id: i32) -> SyncResult<u64> {
    Ok(Entity::find()
        .filter(Column::SupplierId.eq(supplier_id))
        .count(db)
        .await?)
}

pub async fn count_by_file<C: ConnectionTrait>(db: &C, supplier_file_id: i64) -> SyncResult<u64> {
    Ok(Entity::find()
        .filter(Column::SupplierFileId.eq(supplier_file_id))
        .count(db)
        .await?)
}
