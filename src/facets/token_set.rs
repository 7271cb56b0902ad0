//! 集合型分面：陈旧状态与注册来源共用

use std::collections::BTreeSet;

use crate::filters::FilterToken;

use super::{Chip, ChipDescriptor, ChipKind, Facet, FacetStore};

/// 一组枚举 token；chip 按 token 的声明顺序列出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSetFacet<T: FilterToken> {
    value: BTreeSet<T>,
}

impl<T: FilterToken> Default for TokenSetFacet<T> {
    fn default() -> Self {
        Self {
            value: BTreeSet::new(),
        }
    }
}

impl<T: FilterToken> TokenSetFacet<T> {
    pub fn contains(&self, token: T) -> bool {
        self.value.contains(&token)
    }

    pub fn insert(&mut self, token: T) -> bool {
        self.value.insert(token)
    }

    /// 只移除这一个 token，其余保留
    pub fn remove(&mut self, token: T) -> bool {
        self.value.remove(&token)
    }

    pub fn toggle(&mut self, token: T) -> bool {
        if !self.value.remove(&token) {
            self.value.insert(token);
        }
        true
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.value.iter().copied().collect()
    }
}

impl<T: FilterToken> FacetStore for TokenSetFacet<T> {
    type Value = BTreeSet<T>;

    const FACET: Facet = T::FACET;

    fn read(&self) -> &BTreeSet<T> {
        &self.value
    }

    fn write(&mut self, value: BTreeSet<T>) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    fn chip(&self) -> Vec<ChipDescriptor> {
        if self.value.is_empty() {
            return Vec::new();
        }
        vec![ChipDescriptor {
            kind: ChipKind::from(T::FACET),
            category: T::CATEGORY.to_string(),
            key: None,
            chips: self
                .value
                .iter()
                .map(|t| Chip::new(t.label(), t.value()))
                .collect(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{RegisteredWith, StaleToken};

    #[test]
    fn test_chip_lists_tokens_in_order() {
        let mut facet = TokenSetFacet::<StaleToken>::default();
        facet.insert(StaleToken::Stale);
        facet.insert(StaleToken::Fresh);
        let chips = facet.chip();
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].kind, ChipKind::Stale);
        let values: Vec<_> = chips[0].chips.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["fresh", "stale"]);
    }

    #[test]
    fn test_remove_keeps_siblings() {
        let mut facet = TokenSetFacet::<RegisteredWith>::default();
        facet.write(BTreeSet::from([RegisteredWith::Insights, RegisteredWith::Satellite]));
        assert!(facet.remove(RegisteredWith::Insights));
        assert!(!facet.remove(RegisteredWith::Insights));
        assert_eq!(facet.to_vec(), vec![RegisteredWith::Satellite]);
    }

    #[test]
    fn test_toggle() {
        let mut facet = TokenSetFacet::<StaleToken>::default();
        facet.toggle(StaleToken::Unknown);
        assert!(facet.contains(StaleToken::Unknown));
        facet.toggle(StaleToken::Unknown);
        assert!(facet.is_identity());
    }
}
