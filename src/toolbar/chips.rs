//! chip 聚合
//!
//! 每次调用都从当前分面状态重新计算，自身不持有状态。顺序固定：
//! 标签 → 文本 → 陈旧状态 → 注册来源 → 外部静态 chip。

use crate::core::{EnabledFacets, FilterState, ToolbarContext};
use crate::facets::{ChipDescriptor, FacetStore};

/// 聚合所需的外部条件
#[derive(Debug, Clone, Copy)]
pub struct ChipContext<'a> {
    pub enabled: EnabledFacets,
    pub show_tags: bool,
    pub has_items: bool,
    pub static_chips: &'a [ChipDescriptor],
}

impl<'a> ChipContext<'a> {
    pub fn from_toolbar(ctx: &'a ToolbarContext) -> Self {
        Self {
            enabled: ctx.enabled(),
            show_tags: ctx.show_tags,
            has_items: ctx.has_items,
            static_chips: &ctx.static_chips,
        }
    }
}

pub fn build_chips(state: &FilterState, ctx: &ChipContext<'_>) -> Vec<ChipDescriptor> {
    let own = !ctx.has_items;
    let mut chips = Vec::new();
    if ctx.show_tags && own && ctx.enabled.tags {
        chips.extend(state.tags.chip());
    }
    if own && ctx.enabled.text {
        chips.extend(state.text.chip());
    }
    if own && ctx.enabled.staleness {
        chips.extend(state.staleness.chip());
    }
    if own && ctx.enabled.registered_with {
        chips.extend(state.registered_with.chip());
    }
    chips.extend(ctx.static_chips.iter().cloned());
    chips
}

/// 是否有任何筛选生效（决定是否展示 chip 区域）
pub fn is_filter_selected(state: &FilterState, ctx: &ChipContext<'_>) -> bool {
    !state.text.is_identity()
        || state.tags.selected_count() > 0
        || !state.staleness.is_identity()
        || !state.registered_with.is_identity()
        || !ctx.static_chips.is_empty()
}
