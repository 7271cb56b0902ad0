//! 外部协作方：数据源与工具栏回调
//!
//! 引擎只调用这些接口，不关心其传输方式；测试与演示使用 `MockDataSource`。

pub mod mock;
pub mod traits;

use serde::{Deserialize, Serialize};

use crate::filters::ActiveFilters;

pub use mock::{MockDataSource, RecordingHooks};
pub use traits::{DataSource, DeleteEvent, NoopHooks, ToolbarHooks};

/// 行数据刷新参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshConfig {
    pub page: u32,
    /// 全部清除时不携带，沿用数据源当前值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    pub filters: ActiveFilters,
}

/// 一页行数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub total: usize,
    pub results: Vec<serde_json::Value>,
}

/// 标签目录查询
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCatalogQuery {
    /// 搜索词（filter_tags_by）
    pub search: String,
    pub filters: ActiveFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_filters: Option<serde_json::Value>,
}

/// 单个标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub key: String,
    pub value: Option<String>,
    pub count: usize,
}

/// 同一命名空间下的标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub namespace: String,
    pub tags: Vec<TagEntry>,
}

/// 可选标签目录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCatalog {
    pub groups: Vec<TagGroup>,
    /// 超出本页的额外标签数
    pub additional: usize,
}
