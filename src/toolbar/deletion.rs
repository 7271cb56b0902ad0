//! 删除路由：把被删除的 chip 映射回负责的分面动作
//!
//! 文本 chip 清空文本；陈旧状态 / 注册来源只移除匹配的那个值；标签只移除匹配的 (分组, 条目)。
//! 外部 chip 不产生动作，只由 on_delete 回调观察。

use crate::core::reducer::{FacetAction, SetAction, TagsAction, TextAction};
use crate::facets::{ChipDescriptor, ChipKind};
use crate::filters::{FilterToken, RegisteredWith, StaleToken};

pub fn route_deletion(deleted: &[ChipDescriptor]) -> Vec<FacetAction> {
    deleted.iter().flat_map(route_one).collect()
}

fn route_one(descriptor: &ChipDescriptor) -> Vec<FacetAction> {
    match &descriptor.kind {
        ChipKind::Text => vec![FacetAction::Text(TextAction::Clear)],
        ChipKind::Stale => tokens::<StaleToken>(descriptor)
            .map(|t| FacetAction::Staleness(SetAction::Remove(t)))
            .collect(),
        ChipKind::RegisteredWith => tokens::<RegisteredWith>(descriptor)
            .map(|t| FacetAction::RegisteredWith(SetAction::Remove(t)))
            .collect(),
        ChipKind::Tag => {
            let group = descriptor.key.as_deref().unwrap_or(&descriptor.category);
            descriptor
                .chips
                .iter()
                .map(|chip| {
                    FacetAction::Tags(TagsAction::RemoveEntry {
                        group: group.to_string(),
                        entry: chip.value.clone(),
                    })
                })
                .collect()
        }
        ChipKind::Other(kind) => {
            tracing::debug!(kind = %kind, "External chip deleted, no facet handler");
            Vec::new()
        }
    }
}

fn tokens<T: FilterToken>(descriptor: &ChipDescriptor) -> impl Iterator<Item = T> + '_ {
    descriptor.chips.iter().filter_map(|chip| {
        let token = T::from_value(&chip.value);
        if token.is_none() {
            tracing::debug!(value = %chip.value, "Unknown chip value ignored");
        }
        token
    })
}
