//! 分面状态：文本、陈旧状态、注册来源、标签
//!
//! 每个分面只持有自己的取值，并由取值纯函数地推导出 chip；取值处于恒等值（空串 / 空集 / 空映射）时没有 chip。

pub mod tags;
pub mod text;
pub mod token_set;

use serde::{Deserialize, Serialize};

pub use tags::TagsFacet;
pub use text::TextFacet;
pub use token_set::TokenSetFacet;

/// 分面名
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    Text,
    Staleness,
    RegisteredWith,
    Tags,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Text, Facet::Staleness, Facet::RegisteredWith, Facet::Tags];

    /// 控件标签
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Name",
            Self::Staleness => "Status",
            Self::RegisteredWith => "Data collector",
            Self::Tags => "Tags",
        }
    }
}

/// chip 类型：删除时据此路由到负责的分面
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipKind {
    Text,
    Stale,
    RegisteredWith,
    Tag,
    /// 外部传入的静态 chip，引擎不解释
    Other(String),
}

impl ChipKind {
    pub fn facet(&self) -> Option<Facet> {
        match self {
            Self::Text => Some(Facet::Text),
            Self::Stale => Some(Facet::Staleness),
            Self::RegisteredWith => Some(Facet::RegisteredWith),
            Self::Tag => Some(Facet::Tags),
            Self::Other(_) => None,
        }
    }
}

impl From<Facet> for ChipKind {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::Text => Self::Text,
            Facet::Staleness => Self::Stale,
            Facet::RegisteredWith => Self::RegisteredWith,
            Facet::Tags => Self::Tag,
        }
    }
}

/// 单个可删除的值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub name: String,
    pub value: String,
}

impl Chip {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 一组 chip（同一分类），也是删除事件的载体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipDescriptor {
    pub kind: ChipKind,
    pub category: String,
    /// 标签分组名；其他分面为 None
    pub key: Option<String>,
    pub chips: Vec<Chip>,
}

impl ChipDescriptor {
    /// 外部静态 chip
    pub fn external(kind: impl Into<String>, category: impl Into<String>, chips: Vec<Chip>) -> Self {
        Self {
            kind: ChipKind::Other(kind.into()),
            category: category.into(),
            key: None,
            chips,
        }
    }

    /// 只保留一个值的副本（删除单个值时使用）
    pub fn single(&self, chip: &Chip) -> Self {
        Self {
            chips: vec![chip.clone()],
            ..self.clone()
        }
    }
}

/// 分面存储的统一契约
pub trait FacetStore {
    type Value: Clone + PartialEq + Default;

    const FACET: Facet;

    fn read(&self) -> &Self::Value;

    /// 写入新值，返回是否发生变化
    fn write(&mut self, value: Self::Value) -> bool;

    /// 由当前取值推导 chip；恒等值时为空
    fn chip(&self) -> Vec<ChipDescriptor>;

    fn reset(&mut self) -> bool {
        self.write(Self::Value::default())
    }

    fn is_identity(&self) -> bool {
        *self.read() == Self::Value::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{RegisteredWith, StaleToken};

    #[test]
    fn test_identity_has_no_chip() {
        assert!(TextFacet::default().chip().is_empty());
        assert!(TokenSetFacet::<StaleToken>::default().chip().is_empty());
        assert!(TokenSetFacet::<RegisteredWith>::default().chip().is_empty());
        assert!(TagsFacet::default().chip().is_empty());
    }

    #[test]
    fn test_reset_returns_to_identity() {
        let mut text = TextFacet::default();
        text.write("prod".into());
        assert!(text.reset());
        assert!(text.is_identity());
        assert!(text.chip().is_empty());
        assert!(!text.reset());
    }

    #[test]
    fn test_chip_kind_routes_to_facet() {
        for facet in Facet::ALL {
            assert_eq!(ChipKind::from(facet).facet(), Some(facet));
        }
        assert_eq!(ChipKind::Other("os".into()).facet(), None);
    }
}
