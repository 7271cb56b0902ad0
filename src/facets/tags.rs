//! 标签分面
//!
//! 规范取值是两层映射（分组 -> 条目 -> 是否选中），只保存选中的条目；chip 按分组展开，
//! 每个有选中条目的分组一组 chip。删除单个条目时不影响同组或其他分组的条目。
//! 另外携带标签目录的搜索词（filter_tags_by），它不属于取值，也不产生 chip。

use std::collections::BTreeMap;

use crate::filters::{selected_only, TagSelection};

use super::{Chip, ChipDescriptor, ChipKind, Facet, FacetStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsFacet {
    value: TagSelection,
    filter_tags_by: String,
}

impl TagsFacet {
    pub fn is_selected(&self, group: &str, entry: &str) -> bool {
        self.value
            .get(group)
            .and_then(|entries| entries.get(entry))
            .copied()
            .unwrap_or(false)
    }

    /// 选中或取消单个条目
    pub fn select(&mut self, group: &str, entry: &str, selected: bool) -> bool {
        if selected {
            if self.is_selected(group, entry) {
                return false;
            }
            self.value
                .entry(group.to_string())
                .or_default()
                .insert(entry.to_string(), true);
            true
        } else {
            self.remove_entry(group, entry)
        }
    }

    /// 移除单个条目；分组因此变空时一并移除
    pub fn remove_entry(&mut self, group: &str, entry: &str) -> bool {
        let Some(entries) = self.value.get_mut(group) else {
            return false;
        };
        let removed = entries.remove(entry).is_some();
        if entries.is_empty() {
            self.value.remove(group);
        }
        removed
    }

    pub fn search(&self) -> &str {
        &self.filter_tags_by
    }

    pub fn set_search(&mut self, query: String) -> bool {
        if self.filter_tags_by == query {
            return false;
        }
        self.filter_tags_by = query;
        true
    }

    /// 选中条目总数
    pub fn selected_count(&self) -> usize {
        self.value.values().map(BTreeMap::len).sum()
    }
}

impl FacetStore for TagsFacet {
    type Value = TagSelection;

    const FACET: Facet = Facet::Tags;

    fn read(&self) -> &TagSelection {
        &self.value
    }

    fn write(&mut self, value: TagSelection) -> bool {
        let value = selected_only(&value);
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    fn chip(&self) -> Vec<ChipDescriptor> {
        self.value
            .iter()
            .map(|(group, entries)| ChipDescriptor {
                kind: ChipKind::Tag,
                category: group.clone(),
                key: Some(group.clone()),
                chips: entries.keys().map(|entry| Chip::new(entry, entry)).collect(),
            })
            .collect()
    }
}
