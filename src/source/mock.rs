//! Mock 数据源（用于测试与演示，无需后端）
//!
//! 记录每一次调用，返回预置的行数据 / 标签目录；可切换为失败模式以验证失败时状态不变，
//! 也可给每类调用加上延迟以模拟慢后端。

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::SourceError;
use crate::facets::ChipDescriptor;

use super::{DataSource, DeleteEvent, RefreshConfig, RowSet, TagCatalog, TagCatalogQuery, ToolbarHooks};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 记录调用的内存数据源
#[derive(Debug, Default)]
pub struct MockDataSource {
    rows: RowSet,
    catalog: TagCatalog,
    refresh_delay: Duration,
    tag_delay: Duration,
    failing: AtomicBool,
    refreshes: Mutex<Vec<RefreshConfig>>,
    tag_queries: Mutex<Vec<TagCatalogQuery>>,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, rows: RowSet) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_catalog(mut self, catalog: TagCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn with_tag_delay(mut self, delay: Duration) -> Self {
        self.tag_delay = delay;
        self
    }

    /// 之后的调用全部返回 Unavailable
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn refreshes(&self) -> Vec<RefreshConfig> {
        lock(&self.refreshes).clone()
    }

    pub fn refresh_count(&self) -> usize {
        lock(&self.refreshes).len()
    }

    pub fn tag_queries(&self) -> Vec<TagCatalogQuery> {
        lock(&self.tag_queries).clone()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn refresh(&self, config: RefreshConfig) -> Result<RowSet, SourceError> {
        tracing::debug!(page = config.page, filters = config.filters.len(), "Mock refresh");
        lock(&self.refreshes).push(config);
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("mock failure".to_string()));
        }
        Ok(self.rows.clone())
    }

    async fn fetch_tag_catalog(&self, query: TagCatalogQuery) -> Result<TagCatalog, SourceError> {
        tracing::debug!(search = %query.search, "Mock tag catalog");
        lock(&self.tag_queries).push(query);
        if !self.tag_delay.is_zero() {
            tokio::time::sleep(self.tag_delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("mock failure".to_string()));
        }
        Ok(self.catalog.clone())
    }
}

/// 记录回调的 hooks
#[derive(Debug, Default)]
pub struct RecordingHooks {
    clears: AtomicUsize,
    deletes: Mutex<Vec<(DeleteEvent, Vec<ChipDescriptor>, bool)>>,
}

impl RecordingHooks {
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> Vec<(DeleteEvent, Vec<ChipDescriptor>, bool)> {
        lock(&self.deletes).clone()
    }
}

impl ToolbarHooks for RecordingHooks {
    fn on_clear_filters(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }

    fn on_delete(&self, event: &DeleteEvent, deleted: &[ChipDescriptor], is_all: bool) {
        lock(&self.deletes).push((event.clone(), deleted.to_vec(), is_all));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_and_fails() {
        let source = MockDataSource::new().with_rows(RowSet {
            total: 1,
            results: vec![serde_json::json!({"id": "host-1"})],
        });
        let rows = source.refresh(RefreshConfig::default()).await.unwrap();
        assert_eq!(rows.total, 1);

        source.set_failing(true);
        let err = source.refresh(RefreshConfig::default()).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
        assert_eq!(source.refresh_count(), 2);
    }
}
