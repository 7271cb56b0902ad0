//! Filterbar - 多分面筛选同步引擎
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 分面状态与 reducer、工具栏编排、生命周期监管、后台运行时
//! - **dispatch**: 防抖派发器与数据源下游
//! - **facets**: 分面存储（文本、陈旧状态、注册来源、标签）与 chip 描述
//! - **filters**: 活动筛选集合及其描述格式
//! - **observability**: 日志初始化
//! - **source**: 外部协作方接口（数据源、回调）与 Mock 实现
//! - **toolbar**: chip 聚合、删除路由、分面控件

pub mod config;
pub mod core;
pub mod dispatch;
pub mod facets;
pub mod filters;
pub mod observability;
pub mod source;
pub mod toolbar;

pub use crate::core::{spawn_toolbar, Toolbar, ToolbarContext, ToolbarHandle};
pub use crate::filters::ActiveFilters;
