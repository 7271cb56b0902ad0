//! 分面 reducer
//!
//! 每个分面一个动作命名空间，`FacetAction` 是它们的带标签联合；`reduce` 按标签分发到对应的子 reducer，
//! 子 reducer 只拿到自己分面的可变引用，因此更新一个分面不可能读写其他分面。

use std::collections::BTreeSet;

use crate::facets::{Facet, FacetStore, TagsFacet, TextFacet, TokenSetFacet};
use crate::filters::{FilterToken, RegisteredWith, StaleToken, TagSelection};

use super::FilterState;

/// 文本分面动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAction {
    Set(String),
    Clear,
}

/// 集合型分面动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetAction<T> {
    Set(BTreeSet<T>),
    Insert(T),
    /// 只移除这一个值
    Remove(T),
    Toggle(T),
    Clear,
}

/// 标签分面动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsAction {
    Set(TagSelection),
    Select {
        group: String,
        entry: String,
        selected: bool,
    },
    RemoveEntry {
        group: String,
        entry: String,
    },
    /// 更新标签目录搜索词（不改变取值）
    Search(String),
    Clear,
}

/// 分面更新动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetAction {
    Text(TextAction),
    Staleness(SetAction<StaleToken>),
    RegisteredWith(SetAction<RegisteredWith>),
    Tags(TagsAction),
}

impl FacetAction {
    pub fn facet(&self) -> Facet {
        match self {
            Self::Text(_) => Facet::Text,
            Self::Staleness(_) => Facet::Staleness,
            Self::RegisteredWith(_) => Facet::RegisteredWith,
            Self::Tags(_) => Facet::Tags,
        }
    }

    /// 把分面恢复为恒等值的动作
    pub fn reset(facet: Facet) -> Self {
        match facet {
            Facet::Text => Self::Text(TextAction::Clear),
            Facet::Staleness => Self::Staleness(SetAction::Clear),
            Facet::RegisteredWith => Self::RegisteredWith(SetAction::Clear),
            Facet::Tags => Self::Tags(TagsAction::Clear),
        }
    }
}

/// 一次 reduce 实际造成的变化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetChange {
    /// 分面取值变化
    Value(Facet),
    /// 仅标签搜索词变化
    TagSearch,
}

/// 应用动作；无变化时返回 None
pub fn reduce(state: &mut FilterState, action: FacetAction) -> Option<FacetChange> {
    match action {
        FacetAction::Text(action) => reduce_text(&mut state.text, action).then_some(FacetChange::Value(Facet::Text)),
        FacetAction::Staleness(action) => {
            reduce_set(&mut state.staleness, action).then_some(FacetChange::Value(Facet::Staleness))
        }
        FacetAction::RegisteredWith(action) => {
            reduce_set(&mut state.registered_with, action).then_some(FacetChange::Value(Facet::RegisteredWith))
        }
        FacetAction::Tags(action) => reduce_tags(&mut state.tags, action),
    }
}

fn reduce_text(facet: &mut TextFacet, action: TextAction) -> bool {
    match action {
        TextAction::Set(value) => facet.write(value),
        TextAction::Clear => facet.reset(),
    }
}

fn reduce_set<T: FilterToken>(facet: &mut TokenSetFacet<T>, action: SetAction<T>) -> bool {
    match action {
        SetAction::Set(value) => facet.write(value),
        SetAction::Insert(token) => facet.insert(token),
        SetAction::Remove(token) => facet.remove(token),
        SetAction::Toggle(token) => facet.toggle(token),
        SetAction::Clear => facet.reset(),
    }
}

fn reduce_tags(facet: &mut TagsFacet, action: TagsAction) -> Option<FacetChange> {
    let changed = match action {
        TagsAction::Search(query) => {
            return facet.set_search(query).then_some(FacetChange::TagSearch);
        }
        TagsAction::Set(value) => facet.write(value),
        TagsAction::Select { group, entry, selected } => facet.select(&group, &entry, selected),
        TagsAction::RemoveEntry { group, entry } => facet.remove_entry(&group, &entry),
        TagsAction::Clear => facet.reset(),
    };
    changed.then_some(FacetChange::Value(Facet::Tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> FilterState {
        let mut state = FilterState::default();
        reduce(&mut state, FacetAction::Text(TextAction::Set("prod".into())));
        reduce(&mut state, FacetAction::Staleness(SetAction::Insert(StaleToken::Fresh)));
        reduce(&mut state, FacetAction::RegisteredWith(SetAction::Insert(RegisteredWith::Insights)));
        reduce(
            &mut state,
            FacetAction::Tags(TagsAction::Select {
                group: "A".into(),
                entry: "x".into(),
                selected: true,
            }),
        );
        state
    }

    #[test]
    fn test_facet_isolation() {
        let actions = vec![
            FacetAction::Text(TextAction::Set("db".into())),
            FacetAction::Text(TextAction::Clear),
            FacetAction::Staleness(SetAction::Toggle(StaleToken::Stale)),
            FacetAction::Staleness(SetAction::Clear),
            FacetAction::RegisteredWith(SetAction::Remove(RegisteredWith::Insights)),
            FacetAction::Tags(TagsAction::RemoveEntry {
                group: "A".into(),
                entry: "x".into(),
            }),
            FacetAction::Tags(TagsAction::Search("env".into())),
        ];

        for action in actions {
            let before = populated();
            let mut after = before.clone();
            let touched = action.facet();
            reduce(&mut after, action);

            if touched != Facet::Text {
                assert_eq!(after.text, before.text);
            }
            if touched != Facet::Staleness {
                assert_eq!(after.staleness, before.staleness);
            }
            if touched != Facet::RegisteredWith {
                assert_eq!(after.registered_with, before.registered_with);
            }
            if touched != Facet::Tags {
                assert_eq!(after.tags, before.tags);
            }
        }
    }

    #[test]
    fn test_no_change_returns_none() {
        let mut state = populated();
        assert_eq!(reduce(&mut state, FacetAction::Text(TextAction::Set("prod".into()))), None);
        assert_eq!(
            reduce(&mut state, FacetAction::Staleness(SetAction::Remove(StaleToken::Unknown))),
            None
        );
    }

    #[test]
    fn test_search_change_is_reported_separately() {
        let mut state = FilterState::default();
        assert_eq!(
            reduce(&mut state, FacetAction::Tags(TagsAction::Search("env".into()))),
            Some(FacetChange::TagSearch)
        );
        assert!(state.tags.is_identity());
    }

    #[test]
    fn test_reset_action_per_facet() {
        for facet in Facet::ALL {
            let mut state = populated();
            assert_eq!(reduce(&mut state, FacetAction::reset(facet)), Some(FacetChange::Value(facet)));
            assert!(state.is_identity(facet));
        }
    }
}
