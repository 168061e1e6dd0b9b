use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use contracts::enums::CatalogResource;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::shared::config::RemoteConfig;
use crate::shared::errors::{SyncError, SyncResult};

/// Способ передачи токена удалённому API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Заголовок `Authorization: Bearer <token>`
    Bearer,
    /// Параметр запроса `token=<token>`
    QueryToken,
}

/// Состояние авторизации одного клиента.
///
/// Начинает с `Bearer`; после первого 401/403 навсегда переходит на
/// `QueryToken`. Обратного перехода нет.
#[derive(Debug, Default)]
pub struct AuthSession {
    query_token: AtomicBool,
}

impl AuthSession {
    pub fn mode(&self) -> AuthMode {
        if self.query_token.load(Ordering::SeqCst) {
            AuthMode::QueryToken
        } else {
            AuthMode::Bearer
        }
    }

    /// Перейти на токен в параметре запроса. true, если переход случился сейчас.
    fn downgrade(&self) -> bool {
        !self.query_token.swap(true, Ordering::SeqCst)
    }
}

/// Одна страница коллекции
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    /// Исходный JSON каждого элемента, дословно
    pub items: Vec<String>,
    pub count: i64,
    /// 0: всего неизвестно
    pub total: i64,
}

#[derive(Debug, Deserialize)]
struct PageEnvelope<'a> {
    #[serde(borrow, default)]
    items: Option<&'a RawValue>,
    #[serde(default)]
    count: Option<Value>,
    #[serde(default)]
    total: Option<Value>,
}

/// HTTP-клиент каталога удалённого магазина (только чтение)
pub struct CatalogApiClient {
    client: reqwest::Client,
    base_url: String,
    store_id: String,
    token: String,
    auth: AuthSession,
}

impl CatalogApiClient {
    pub fn new(config: &RemoteConfig) -> SyncResult<Self> {
        let store_id = config.store_id.trim();
        if store_id.is_empty() {
            return Err(SyncError::Configuration(
                "remote.store_id is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store_id: store_id.to_string(),
            token: config.token.trim().to_string(),
            auth: AuthSession::default(),
        })
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth.mode()
    }

    fn url(&self, segment: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.store_id, segment)
    }

    /// Получить одну страницу коллекции
    pub async fn fetch_page(
        &self,
        resource: CatalogResource,
        offset: i64,
        limit: u32,
    ) -> SyncResult<CatalogPage> {
        let url = self.url(resource.path());
        let query = [("offset", offset.to_string()), ("limit", limit.to_string())];

        let body = self.get_with_auth_retry(&url, &query).await?;
        let page = parse_page(&body)?;

        tracing::debug!(
            "{}: offset {} -> {} items (total {})",
            resource,
            offset,
            page.items.len(),
            page.total
        );
        Ok(page)
    }

    /// Ленивая последовательность всех элементов коллекции.
    /// Каждый вызов начинает с offset 0.
    pub fn pages(&self, resource: CatalogResource, page_size: u32) -> CatalogPager<'_> {
        CatalogPager {
            client: self,
            resource,
            page_size: page_size.max(1),
            offset: 0,
            pages_fetched: 0,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    /// Название магазина из профиля (`generalInfo.storeName`)
    pub async fn fetch_store_name(&self) -> SyncResult<Option<String>> {
        let body = self.get_with_auth_retry(&self.url("profile"), &[]).await?;
        let profile: Value = serde_json::from_str(&body)?;
        Ok(profile
            .pointer("/generalInfo/storeName")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn get_with_auth_retry(&self, url: &str, query: &[(&str, String)]) -> SyncResult<String> {
        let mode = self.auth.mode();
        let mut response = self.send(url, query, mode).await?;

        if mode == AuthMode::Bearer
            && matches!(
                response.status(),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            )
        {
            if self.auth.downgrade() {
                tracing::warn!(
                    "Bearer auth rejected with {}, switching to token query parameter",
                    response.status()
                );
            }
            response = self.send(url, query, AuthMode::QueryToken).await?;
        }

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Remote API request {} failed with {}: {}", url, status, body);
            return Err(SyncError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn send(
        &self,
        url: &str,
        query: &[(&str, String)],
        mode: AuthMode,
    ) -> SyncResult<reqwest::Response> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query);

        if !self.token.is_empty() {
            request = match mode {
                AuthMode::Bearer => request.bearer_auth(&self.token),
                AuthMode::QueryToken => request.query(&[("token", self.token.as_str())]),
            };
        }

        tracing::debug!("GET {} ({:?})", url, mode);
        Ok(request.send().await?)
    }
}

fn parse_page(body: &str) -> SyncResult<CatalogPage> {
    let envelope: PageEnvelope = serde_json::from_str(body)?;

    let items: Vec<String> = envelope
        .items
        .and_then(|raw| serde_json::from_str::<Vec<&RawValue>>(raw.get()).ok())
        .map(|items| items.into_iter().map(|i| i.get().to_string()).collect())
        .unwrap_or_default();

    let count = envelope
        .count
        .as_ref()
        .and_then(Value::as_i64)
        .unwrap_or(items.len() as i64);
    let total = envelope
        .total
        .as_ref()
        .and_then(Value::as_i64)
        .unwrap_or(0);

    Ok(CatalogPage {
        items,
        count,
        total,
    })
}

/// Постраничная выгрузка коллекции.
///
/// Остановка: страница пуста, страница короче `page_size`, или смещение
/// достигло известного `total`.
pub struct CatalogPager<'a> {
    client: &'a CatalogApiClient,
    resource: CatalogResource,
    page_size: u32,
    offset: i64,
    pages_fetched: u32,
    buffer: VecDeque<String>,
    finished: bool,
}

impl CatalogPager<'_> {
    pub async fn next(&mut self) -> SyncResult<Option<String>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.finished {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    async fn fetch_next_page(&mut self) -> SyncResult<()> {
        let page = match self
            .client
            .fetch_page(self.resource, self.offset, self.page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };

        let received = page.items.len();
        self.offset += received as i64;
        self.pages_fetched += 1;

        if received == 0
            || received < self.page_size as usize
            || (page.total > 0 && self.offset >= page.total)
        {
            self.finished = true;
        }

        self.buffer.extend(page.items);
        Ok(())
    }
}
