//! 枚举型筛选值：陈旧状态（staleness）与注册来源（registered with）
//!
//! 两类分面共用 `FilterToken` trait，chip 的标签、序列化值与分类名都由 token 自己给出。

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::facets::Facet;

/// 可放入集合型分面的筛选值
pub trait FilterToken:
    Copy + Ord + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// 所属分面
    const FACET: Facet;

    /// chip 分类名（如 "Status"）
    const CATEGORY: &'static str;

    /// 展示用标签
    fn label(&self) -> &'static str;

    /// 与数据源约定的字符串值
    fn value(&self) -> &'static str;

    /// 全部候选值（按展示顺序）
    fn all() -> &'static [Self];

    fn from_value(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.value() == value)
    }
}

/// 主机陈旧状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleToken {
    Fresh,
    StaleWarning,
    Stale,
    Unknown,
}

impl FilterToken for StaleToken {
    const FACET: Facet = Facet::Staleness;
    const CATEGORY: &'static str = "Status";

    fn label(&self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::StaleWarning => "Stale warning",
            Self::Stale => "Stale",
            Self::Unknown => "Unknown",
        }
    }

    fn value(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::StaleWarning => "stale_warning",
            Self::Stale => "stale",
            Self::Unknown => "unknown",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Fresh, Self::StaleWarning, Self::Stale, Self::Unknown]
    }
}

/// 主机注册来源（reporter）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegisteredWith {
    Insights,
    Yupana,
    Puptoo,
    RhsmConduit,
    CloudConnector,
    Satellite,
    Discovery,
}

impl FilterToken for RegisteredWith {
    const FACET: Facet = Facet::RegisteredWith;
    const CATEGORY: &'static str = "Source";

    fn label(&self) -> &'static str {
        match self {
            Self::Insights => "Insights",
            Self::Yupana => "Yupana",
            Self::Puptoo => "Puptoo",
            Self::RhsmConduit => "Subscription Manager",
            Self::CloudConnector => "Cloud Connector",
            Self::Satellite => "Satellite",
            Self::Discovery => "Discovery",
        }
    }

    fn value(&self) -> &'static str {
        match self {
            Self::Insights => "insights",
            Self::Yupana => "yupana",
            Self::Puptoo => "puptoo",
            Self::RhsmConduit => "rhsm-conduit",
            Self::CloudConnector => "cloud-connector",
            Self::Satellite => "satellite",
            Self::Discovery => "discovery",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Insights,
            Self::Yupana,
            Self::Puptoo,
            Self::RhsmConduit,
            Self::CloudConnector,
            Self::Satellite,
            Self::Discovery,
        ]
    }
}
