use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::domain::a001_product::Product;
use contracts::domain::a002_category::Category;
use contracts::domain::common::RawRecord;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, TransactionTrait,
};

use crate::shared::errors::SyncResult;

/// Размер страницы при последовательном чтении таблицы
pub const SCAN_PAGE_SIZE: u64 = 500;

/// Итог записи одной пачки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertStats {
    pub inserted: u64,
    pub updated: u64,
    pub unchanged: u64,
}

impl UpsertStats {
    pub fn merge(&mut self, other: UpsertStats) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
    }

    pub fn total(&self) -> u64 {
        self.inserted + self.updated + self.unchanged
    }
}

/// Запись каталога с идентификатором удалённой системы
pub trait CatalogEntity {
    fn id(&self) -> i64;
}

impl CatalogEntity for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

impl CatalogEntity for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Хранилище, которое принимает записи каталога пачками.
///
/// Для каждой записи: нет в базе: вставка; исходный JSON совпадает
/// побайтно: ничего не делаем; отличается: полная перезапись полей.
/// Один вызов `upsert_batch` выполняется в одной транзакции.
#[async_trait]
pub trait UpsertStore: Send + Sync {
    type Entity: CatalogEntity + Send + 'static;

    async fn upsert_batch(
        &self,
        records: Vec<RawRecord<Self::Entity>>,
    ) -> SyncResult<UpsertStats>;

    async fn get_by_id(&self, id: i64) -> SyncResult<Option<Self::Entity>>;

    /// До `limit` записей с id больше `after`, по возрастанию id
    async fn scan_page(&self, after: Option<i64>, limit: u64) -> SyncResult<Vec<Self::Entity>>;

    /// Упорядоченное по id чтение всей таблицы страницами.
    /// Каждый вызов начинает чтение заново.
    fn get_all(&self) -> StoreScan<'_, Self>
    where
        Self: Sized,
    {
        StoreScan::new(self)
    }
}

/// Постраничный проход по хранилищу (keyset по id)
pub struct StoreScan<'a, S> {
    store: &'a S,
    after: Option<i64>,
    page_size: u64,
    done: bool,
}

impl<'a, S: UpsertStore> StoreScan<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            after: None,
            page_size: SCAN_PAGE_SIZE,
            done: false,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub async fn next_page(&mut self) -> SyncResult<Option<Vec<S::Entity>>> {
        if self.done {
            return Ok(None);
        }

        let page = self.store.scan_page(self.after, self.page_size).await?;
        if (page.len() as u64) < self.page_size {
            self.done = true;
        }
        match page.last() {
            Some(last) => self.after = Some(last.id()),
            None => return Ok(None),
        }
        Ok(Some(page))
    }

    pub async fn collect_all(mut self) -> SyncResult<Vec<S::Entity>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }
        Ok(items)
    }
}

/// Строка таблицы каталога с сохранённым исходным JSON
pub trait RawJsonRow {
    fn raw_json(&self) -> &str;
}

/// Общая реализация `upsert_batch` для таблиц каталога.
///
/// `to_active` строит полную ActiveModel записи с отметкой времени записи.
pub async fn upsert_rows<A, T, F>(
    db: &DatabaseConnection,
    records: Vec<RawRecord<T>>,
    to_active: F,
) -> SyncResult<UpsertStats>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: RawJsonRow + IntoActiveModel<A>,
    <<A::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
    T: CatalogEntity,
    F: Fn(RawRecord<T>, DateTime<Utc>) -> A,
{
    let mut stats = UpsertStats::default();
    if records.is_empty() {
        return Ok(stats);
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    for record in records {
        let existing = <A::Entity as EntityTrait>::find_by_id(record.item.id())
            .one(&txn)
            .await?;
        match existing {
            None => {
                to_active(record, now).insert(&txn).await?;
                stats.inserted += 1;
            }
            Some(stored) if stored.raw_json() == record.raw_json => {
                stats.unchanged += 1;
            }
            Some(_) => {
                to_active(record, now).update(&txn).await?;
                stats.updated += 1;
            }
        }
    }

    txn.commit().await?;
    Ok(stats)
}
