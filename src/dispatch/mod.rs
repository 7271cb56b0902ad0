//! 派发层：防抖派发器与数据源下游

pub mod debounce;
pub mod sink;

pub use debounce::{Debouncer, DispatchHandle, DispatchSink};
pub use sink::{RefreshRequest, Refresher, RowRefreshSink, TagCatalogSink, ToolbarResults};
