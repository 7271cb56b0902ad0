//! 协作方抽象
//!
//! DataSource：刷新行数据、查询标签目录（异步，失败由调用方记录，不重试）。
//! ToolbarHooks：全部清除的副作用通知、删除事件的旁路观察（不能否决删除）。

use async_trait::async_trait;

use crate::core::SourceError;
use crate::facets::ChipDescriptor;

use super::{RefreshConfig, RowSet, TagCatalog, TagCatalogQuery};

/// 分页数据源
#[async_trait]
pub trait DataSource: Send + Sync {
    /// 按筛选与分页刷新行数据
    async fn refresh(&self, config: RefreshConfig) -> Result<RowSet, SourceError>;

    /// 查询可选标签
    async fn fetch_tag_catalog(&self, query: TagCatalogQuery) -> Result<TagCatalog, SourceError>;
}

/// 渲染层传入的删除事件（引擎不解释，原样转交 on_delete 回调）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteEvent {
    pub origin: Option<String>,
}

impl DeleteEvent {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
        }
    }
}

/// 工具栏对外回调，默认均为空实现
pub trait ToolbarHooks: Send + Sync {
    /// 全部清除后通知外部重置其持久化的筛选
    fn on_clear_filters(&self) {}

    /// 删除路由完成后调用
    fn on_delete(&self, _event: &DeleteEvent, _deleted: &[ChipDescriptor], _is_all: bool) {}
}

/// 不做任何事的回调
#[derive(Debug, Default)]
pub struct NoopHooks;

impl ToolbarHooks for NoopHooks {}
