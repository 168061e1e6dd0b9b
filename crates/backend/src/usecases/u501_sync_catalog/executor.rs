use std::sync::Arc;
use std::time::Instant;

use contracts::domain::common::RawRecord;
use contracts::enums::CatalogResource;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_sync_catalog::{SyncCatalog, SyncRequest, SyncResponse};
use sea_orm::DatabaseConnection;

use super::catalog_api_client::CatalogApiClient;
use super::processors::{map_category, map_product};
use crate::domain::a001_product::ProductStore;
use crate::domain::a002_category::CategoryStore;
use crate::shared::cancel::CancelFlag;
use crate::shared::data::upsert::{CatalogEntity, UpsertStats, UpsertStore};
use crate::shared::errors::{SyncError, SyncResult};

/// Сколько записей копить перед записью в базу
pub const BATCH_SIZE: usize = 200;

/// Executor для UseCase синхронизации каталога
pub struct CatalogSyncExecutor {
    api_client: Arc<CatalogApiClient>,
    products: ProductStore,
    categories: CategoryStore,
    default_page_size: u32,
}

impl CatalogSyncExecutor {
    pub fn new(
        api_client: Arc<CatalogApiClient>,
        db: DatabaseConnection,
        default_page_size: u32,
    ) -> Self {
        Self {
            api_client,
            products: ProductStore::new(db.clone()),
            categories: CategoryStore::new(db),
            default_page_size,
        }
    }

    /// Синхронизировать коллекции по порядку. Первая ошибка прерывает
    /// выполнение; уже записанные пачки остаются в базе.
    pub async fn sync(
        &self,
        request: &SyncRequest,
        cancel: &CancelFlag,
    ) -> SyncResult<Vec<SyncResponse>> {
        let page_size = request.page_size.unwrap_or(self.default_page_size);
        let mut results = Vec::with_capacity(request.resources.len());

        for resource in &request.resources {
            let response = match resource {
                CatalogResource::Products => {
                    self.sync_resource(*resource, page_size, &self.products, map_product, cancel)
                        .await
                }
                CatalogResource::Categories => {
                    self.sync_resource(
                        *resource,
                        page_size,
                        &self.categories,
                        map_category,
                        cancel,
                    )
                    .await
                }
            };

            match response {
                Ok(response) => results.push(response),
                Err(e) if e.is_cancelled() => {
                    tracing::warn!("Sync of {} cancelled: {}", resource, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("Sync of {} failed: {}", resource, e);
                    return Err(e);
                }
            }
        }

        Ok(results)
    }

    async fn sync_resource<S, F>(
        &self,
        resource: CatalogResource,
        page_size: u32,
        store: &S,
        map: F,
        cancel: &CancelFlag,
    ) -> SyncResult<SyncResponse>
    where
        S: UpsertStore,
        F: Fn(&str) -> RawRecord<S::Entity>,
    {
        let started = Instant::now();
        tracing::info!(
            "{}: starting sync of {} (page size {})",
            SyncCatalog::full_name(),
            resource,
            page_size
        );

        let mut response = SyncResponse::new(resource);
        let mut totals = UpsertStats::default();
        let mut pager = self.api_client.pages(resource, page_size);
        let mut batch: Vec<RawRecord<S::Entity>> = Vec::with_capacity(BATCH_SIZE);

        loop {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled {
                    committed: totals.total(),
                });
            }

            let Some(raw) = pager.next().await? else {
                break;
            };
            response.fetched += 1;

            let record = map(&raw);
            if record.item.id() <= 0 {
                response.skipped += 1;
                tracing::warn!(
                    "Skipping {} record without a valid id: {}",
                    resource,
                    preview(&raw)
                );
                continue;
            }

            batch.push(record);
            if batch.len() >= BATCH_SIZE {
                let stats = store.upsert_batch(std::mem::take(&mut batch)).await?;
                totals.merge(stats);
                tracing::info!(
                    "{}: committed chunk ({} new, {} changed, {} unchanged)",
                    resource,
                    stats.inserted,
                    stats.updated,
                    stats.unchanged
                );
            }
        }

        if !batch.is_empty() {
            let stats = store.upsert_batch(batch).await?;
            totals.merge(stats);
        }

        response.inserted = totals.inserted;
        response.updated = totals.updated;
        response.unchanged = totals.unchanged;

        tracing::info!(
            "Sync of {} finished in {:.1}s: {} fetched over {} pages, {} new, {} changed, {} unchanged, {} skipped",
            resource,
            started.elapsed().as_secs_f64(),
            response.fetched,
            pager.pages_fetched(),
            response.inserted,
            response.updated,
            response.unchanged,
            response.skipped
        );

        Ok(response)
    }
}

fn preview(raw: &str) -> String {
    let head: String = raw.chars().take(120).collect();
    if head.len() < raw.len() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::RemoteConfig;
    use crate::shared::data::db::connect_in_memory;
    use async_trait::async_trait;
    use contracts::domain::a001_product::Product;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Arc<CatalogApiClient> {
        Arc::new(
            CatalogApiClient::new(&RemoteConfig {
                base_url: server.uri(),
                store_id: "42".to_string(),
                token: String::new(),
                page_size: 100,
                timeout_secs: 5,
            })
            .unwrap(),
        )
    }

    fn page(ids: std::ops::RangeInclusive<i64>, total: i64) -> serde_json::Value {
        let items: Vec<_> = ids
            .map(|id| serde_json::json!({ "id": id, "name": format!("item {}", id), "enabled": true }))
            .collect();
        serde_json::json!({ "items": items, "count": items.len(), "total": total })
    }

    /// Хранилище в памяти: запоминает размеры пачек и может выставить отмену
    #[derive(Default)]
    struct RecordingStore {
        batches: Mutex<Vec<usize>>,
        cancel_after_first: Option<CancelFlag>,
    }

    #[async_trait]
    impl UpsertStore for RecordingStore {
        type Entity = Product;

        async fn upsert_batch(&self, records: Vec<RawRecord<Product>>) -> SyncResult<UpsertStats> {
            self.batches.lock().unwrap().push(records.len());
            if let Some(cancel) = &self.cancel_after_first {
                cancel.cancel();
            }
            Ok(UpsertStats {
                inserted: records.len() as u64,
                ..Default::default()
            })
        }

        async fn get_by_id(&self, _id: i64) -> SyncResult<Option<Product>> {
            Ok(None)
        }

        async fn scan_page(&self, _after: Option<i64>, _limit: u64) -> SyncResult<Vec<Product>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_sync_products_then_resync_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/42/products"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1..=2, 3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/42/products"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(3..=3, 3)))
            .mount(&server)
            .await;

        let db = connect_in_memory().await;
        let executor = CatalogSyncExecutor::new(client_for(&server), db.clone(), 2);
        let request = SyncRequest {
            resources: vec![CatalogResource::Products],
            page_size: None,
        };

        let first = executor.sync(&request, &CancelFlag::new()).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].fetched, 3);
        assert_eq!(first[0].inserted, 3);

        let second = executor.sync(&request, &CancelFlag::new()).await.unwrap();
        assert_eq!(second[0].inserted, 0);
        assert_eq!(second[0].updated, 0);
        assert_eq!(second[0].unchanged, 3);

        assert_eq!(ProductStore::new(db).count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_records_without_id_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/42/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"items":[{"id":1,"name":"A"},{"name":"no id"},{"id":-4},{"id":2,"parentId":1,"name":"B"}],"count":4}"#,
            ))
            .mount(&server)
            .await;

        let db = connect_in_memory().await;
        let executor = CatalogSyncExecutor::new(client_for(&server), db.clone(), 100);
        let request = SyncRequest {
            resources: vec![CatalogResource::Categories],
            page_size: None,
        };

        let result = executor.sync(&request, &CancelFlag::new()).await.unwrap();
        assert_eq!(result[0].fetched, 4);
        assert_eq!(result[0].skipped, 2);
        assert_eq!(result[0].inserted, 2);
        assert_eq!(CategoryStore::new(db).count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_flushes_every_batch_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/42/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1..=450, 450)))
            .mount(&server)
            .await;

        let executor =
            CatalogSyncExecutor::new(client_for(&server), connect_in_memory().await, 500);
        let store = RecordingStore::default();

        let response = executor
            .sync_resource(
                CatalogResource::Products,
                500,
                &store,
                map_product,
                &CancelFlag::new(),
            )
            .await
            .unwrap();
        assert_eq!(response.inserted, 450);
        assert_eq!(*store.batches.lock().unwrap(), vec![200, 200, 50]);
    }

    #[tokio::test]
    async fn test_cancel_keeps_committed_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/42/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1..=450, 450)))
            .mount(&server)
            .await;

        let executor =
            CatalogSyncExecutor::new(client_for(&server), connect_in_memory().await, 500);
        let cancel = CancelFlag::new();
        let store = RecordingStore {
            cancel_after_first: Some(cancel.clone()),
            ..Default::default()
        };

        let err = executor
            .sync_resource(CatalogResource::Products, 500, &store, map_product, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Cancelled { committed: 200 }));
        assert_eq!(*store.batches.lock().unwrap(), vec![200]);
    }

    #[tokio::test]
    async fn test_pre_cancelled_sync_makes_no_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1..=1, 1)))
            .expect(0)
            .mount(&server)
            .await;

        let executor = CatalogSyncExecutor::new(client_for(&server), connect_in_memory().await, 10);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = executor
            .sync(&SyncRequest::all(), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_transport_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let executor = CatalogSyncExecutor::new(client_for(&server), connect_in_memory().await, 10);
        let err = executor
            .sync(&SyncRequest::all(), &CancelFlag::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Transport { status: 502, .. }));
    }
}
