//! 派发下游：调用数据源并缓存结果
//!
//! 行数据刷新与标签目录查询各有一个 sink；交付时再检查一次访问门，门已关闭的挂起调用直接丢弃。
//! 数据源失败只记录日志与最近错误，不触碰分面状态。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::SourceError;
use crate::source::{DataSource, RefreshConfig, RowSet, TagCatalog, TagCatalogQuery};

use super::{DispatchHandle, DispatchSink};

/// 一次行数据刷新；`tag_query` 为 Some 时刷新成功后把它交给标签目录派发器
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshRequest {
    pub config: RefreshConfig,
    pub tag_query: Option<TagCatalogQuery>,
}

/// 最近一次成功的结果与最近一次错误
#[derive(Debug, Clone, Default)]
pub struct ToolbarResults {
    pub rows: Option<RowSet>,
    pub tag_catalog: Option<TagCatalog>,
    pub last_error: Option<SourceError>,
}

/// 行数据刷新与标签目录查询的共同执行体
#[derive(Clone)]
pub struct Refresher {
    source: Arc<dyn DataSource>,
    gate: Arc<AtomicBool>,
    results: Arc<RwLock<ToolbarResults>>,
}

impl Refresher {
    pub fn new(source: Arc<dyn DataSource>, gate: Arc<AtomicBool>) -> Self {
        Self {
            source,
            gate,
            results: Arc::new(RwLock::new(ToolbarResults::default())),
        }
    }

    pub fn results(&self) -> Arc<RwLock<ToolbarResults>> {
        Arc::clone(&self.results)
    }

    fn is_open(&self) -> bool {
        self.gate.load(Ordering::SeqCst)
    }

    /// 刷新行数据，成功时返回 true；访问门关闭时不调用数据源
    pub async fn refresh(&self, config: RefreshConfig) -> bool {
        if !self.is_open() {
            tracing::debug!("Access gate closed, refresh dropped");
            return false;
        }
        match self.source.refresh(config).await {
            Ok(rows) => {
                tracing::debug!(total = rows.total, "Rows refreshed");
                let mut results = self.results.write().await;
                results.rows = Some(rows);
                results.last_error = None;
                true
            }
            Err(e) => {
                tracing::warn!("Refresh failed: {}", e);
                self.results.write().await.last_error = Some(e);
                false
            }
        }
    }

    /// 查询标签目录；访问门关闭时不调用数据源
    pub async fn fetch_tags(&self, query: TagCatalogQuery) {
        if !self.is_open() {
            tracing::debug!("Access gate closed, tag catalog query dropped");
            return;
        }
        match self.source.fetch_tag_catalog(query).await {
            Ok(catalog) => {
                self.results.write().await.tag_catalog = Some(catalog);
            }
            Err(e) => {
                tracing::warn!("Tag catalog fetch failed: {}", e);
                self.results.write().await.last_error = Some(e);
            }
        }
    }
}

/// 行数据派发器的下游；顺带的标签目录查询转交标签目录派发器，不在这里等待
pub struct RowRefreshSink {
    refresher: Refresher,
    tag_catalog: DispatchHandle<TagCatalogQuery>,
}

impl RowRefreshSink {
    pub fn new(refresher: Refresher, tag_catalog: DispatchHandle<TagCatalogQuery>) -> Self {
        Self {
            refresher,
            tag_catalog,
        }
    }
}

#[async_trait]
impl DispatchSink<RefreshRequest> for RowRefreshSink {
    async fn deliver(&self, request: RefreshRequest) {
        let RefreshRequest { config, tag_query } = request;
        if self.refresher.refresh(config).await {
            if let Some(query) = tag_query {
                self.tag_catalog.dispatch_now(query);
            }
        }
    }
}

/// 标签目录派发器的下游
pub struct TagCatalogSink(pub Refresher);

#[async_trait]
impl DispatchSink<TagCatalogQuery> for TagCatalogSink {
    async fn deliver(&self, query: TagCatalogQuery) {
        self.0.fetch_tags(query).await;
    }
}
