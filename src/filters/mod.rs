//! 筛选数据模型：枚举取值与活动筛选集合

pub mod descriptor;
pub mod tokens;

pub use descriptor::{
    selected_only, ActiveFilters, BuiltinFilter, FilterDescriptor, ReducedFilters, TagSelection,
};
pub use tokens::{FilterToken, RegisteredWith, StaleToken};
