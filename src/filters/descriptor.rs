//! 活动筛选集合（Active Filters Collection）
//!
//! 与外部数据源共享的有序筛选描述列表：内置类型（TEXT / STALE / REGISTERED_WITH / TAGS）各至多一条，
//! 外部传入的未知描述原样透传（可重复），保证前向兼容。
//! 内置描述里无法识别的单个取值被丢弃，其余取值照常生效。

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::FilterError;
use crate::facets::Facet;
use crate::filters::{FilterToken, RegisteredWith, StaleToken};

/// 标签选择：分组 -> (条目 -> 是否选中)
pub type TagSelection = BTreeMap<String, BTreeMap<String, bool>>;

/// 内置筛选描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuiltinFilter {
    #[serde(rename = "TEXT")]
    Text { filter: String },
    #[serde(rename = "STALE")]
    Stale {
        #[serde(rename = "staleFilter", deserialize_with = "lenient_tokens")]
        stale_filter: Vec<StaleToken>,
    },
    #[serde(rename = "REGISTERED_WITH")]
    RegisteredWith {
        #[serde(rename = "registeredWithFilter", deserialize_with = "lenient_tokens")]
        registered_with_filter: Vec<RegisteredWith>,
    },
    #[serde(rename = "TAGS")]
    Tags {
        #[serde(rename = "tagFilters")]
        tag_filters: TagSelection,
    },
}

impl BuiltinFilter {
    pub fn facet(&self) -> Facet {
        match self {
            Self::Text { .. } => Facet::Text,
            Self::Stale { .. } => Facet::Staleness,
            Self::RegisteredWith { .. } => Facet::RegisteredWith,
            Self::Tags { .. } => Facet::Tags,
        }
    }

    /// 分面对应的 `type` 字段
    pub fn wire_type(facet: Facet) -> &'static str {
        match facet {
            Facet::Text => "TEXT",
            Facet::Staleness => "STALE",
            Facet::RegisteredWith => "REGISTERED_WITH",
            Facet::Tags => "TAGS",
        }
    }
}

fn lenient_tokens<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FilterToken,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(token) => Some(token),
            Err(_) => {
                tracing::debug!(facet = ?T::FACET, %value, "Unknown filter value dropped");
                None
            }
        })
        .collect())
}

/// 单条筛选描述：内置类型或外部透传
///
/// 反序列化时先尝试内置类型，形状不符（未知 type、字段缺失、非法取值）的一律落入 `External`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterDescriptor {
    Builtin(BuiltinFilter),
    External(serde_json::Value),
}

impl FilterDescriptor {
    pub fn facet(&self) -> Option<Facet> {
        match self {
            Self::Builtin(builtin) => Some(builtin.facet()),
            Self::External(_) => None,
        }
    }

    /// 占用的内置分面槽位；`type` 是内置类型但形状不符的外部描述也算
    pub fn slot(&self) -> Option<Facet> {
        match self {
            Self::Builtin(builtin) => Some(builtin.facet()),
            Self::External(value) => {
                let kind = value.get("type")?.as_str()?;
                Facet::ALL
                    .into_iter()
                    .find(|facet| BuiltinFilter::wire_type(*facet) == kind)
            }
        }
    }
}

impl From<BuiltinFilter> for FilterDescriptor {
    fn from(builtin: BuiltinFilter) -> Self {
        Self::Builtin(builtin)
    }
}

/// 从集合中解析出的各分面取值（挂载时引导分面状态用）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReducedFilters {
    pub text: String,
    pub stale: BTreeSet<StaleToken>,
    pub registered_with: BTreeSet<RegisteredWith>,
    pub tags: TagSelection,
}

/// 活动筛选集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilters(Vec<FilterDescriptor>);

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 JSON 数组；未知形状的条目不会报错，只有非法 JSON 才返回 Err
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let mut filters: Self = serde_json::from_str(json)?;
        filters.dedup_builtins();
        Ok(filters)
    }

    pub fn to_json(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.0.iter()
    }

    /// 外部透传的描述（按原顺序）
    pub fn externals(&self) -> impl Iterator<Item = &serde_json::Value> {
        self.0.iter().filter_map(|d| match d {
            FilterDescriptor::External(value) => Some(value),
            FilterDescriptor::Builtin(_) => None,
        })
    }

    pub fn get(&self, facet: Facet) -> Option<&BuiltinFilter> {
        self.0.iter().find_map(|d| match d {
            FilterDescriptor::Builtin(b) if b.facet() == facet => Some(b),
            _ => None,
        })
    }

    pub fn push_external(&mut self, value: serde_json::Value) {
        self.0.push(FilterDescriptor::External(value));
    }

    /// 替换某一分面的描述：槽位中第一条原位替换，其余同槽位的条目移除，没有则追加
    ///
    /// `None` 只移除内置描述；同 `type` 的外部描述留到分面下次写入时再被替换。
    pub fn set(&mut self, facet: Facet, builtin: Option<BuiltinFilter>) {
        let Some(builtin) = builtin else {
            self.0.retain(|d| d.facet() != Some(facet));
            return;
        };
        let mut replacement = Some(FilterDescriptor::Builtin(builtin));
        let mut kept = Vec::with_capacity(self.0.len() + 1);
        for descriptor in self.0.drain(..) {
            if descriptor.slot() != Some(facet) {
                kept.push(descriptor);
            } else if let Some(next) = replacement.take() {
                kept.push(next);
            }
        }
        kept.extend(replacement);
        self.0 = kept;
    }

    /// 一次遍历解析出所有内置分面的取值
    pub fn reduce(&self) -> ReducedFilters {
        let mut reduced = ReducedFilters::default();
        for descriptor in &self.0 {
            let FilterDescriptor::Builtin(builtin) = descriptor else {
                continue;
            };
            match builtin {
                BuiltinFilter::Text { filter } => reduced.text = filter.trim().to_string(),
                BuiltinFilter::Stale { stale_filter } => {
                    reduced.stale = stale_filter.iter().copied().collect();
                }
                BuiltinFilter::RegisteredWith { registered_with_filter } => {
                    reduced.registered_with = registered_with_filter.iter().copied().collect();
                }
                BuiltinFilter::Tags { tag_filters } => reduced.tags = selected_only(tag_filters),
            }
        }
        reduced
    }

    /// 同类内置描述只保留第一条
    fn dedup_builtins(&mut self) {
        let mut seen = BTreeSet::new();
        self.0.retain(|d| match d.facet() {
            Some(facet) => seen.insert(facet),
            None => true,
        });
    }
}

impl FromIterator<FilterDescriptor> for ActiveFilters {
    fn from_iter<I: IntoIterator<Item = FilterDescriptor>>(iter: I) -> Self {
        let mut filters = Self(iter.into_iter().collect());
        filters.dedup_builtins();
        filters
    }
}

/// 去掉未选中条目与空分组
pub fn selected_only(tags: &TagSelection) -> TagSelection {
    tags.iter()
        .filter_map(|(group, entries)| {
            let selected: BTreeMap<String, bool> = entries
                .iter()
                .filter(|(_, on)| **on)
                .map(|(entry, _)| (entry.clone(), true))
                .collect();
            (!selected.is_empty()).then(|| (group.clone(), selected))
        })
        .collect()
}
