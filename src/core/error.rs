//! 错误类型
//!
//! 引擎内没有致命错误：数据源失败只记录日志并保持分面状态不变；访问门关闭时的派发是静默丢弃。

use thiserror::Error;

/// 数据源（刷新 / 标签目录）调用失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Request timeout")]
    Timeout,
}

/// 活动筛选集合解析失败（仅非法 JSON；未知形状会透传）
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Filter collection parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 工具栏运行时错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolbarError {
    /// 命令通道已关闭（工具栏已卸载）
    #[error("Toolbar closed")]
    Closed,
}
