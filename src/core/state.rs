//! 状态定义：分面状态树、外部上下文快照、渲染投影
//!
//! FilterState 是固定形状的记录（四个分面各一个字段），由 reducer 按分面作用域更新；
//! ToolbarContext 是挂载时对外部集合、访问门等的快照，之后通过 ContextUpdate 显式更新；
//! ToolbarView 是交给渲染方的只读投影。

use serde::Serialize;

use crate::config::{HideFilters, ToolbarSection};
use crate::core::reducer::{self, FacetAction, FacetChange};
use crate::facets::{ChipDescriptor, Facet, FacetStore, TagsFacet, TextFacet, TokenSetFacet};
use crate::filters::{ActiveFilters, BuiltinFilter, RegisteredWith, StaleToken};
use crate::toolbar::FacetControl;

/// 四个分面组成的状态树
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub text: TextFacet,
    pub staleness: TokenSetFacet<StaleToken>,
    pub registered_with: TokenSetFacet<RegisteredWith>,
    pub tags: TagsFacet,
}

impl FilterState {
    /// 从活动筛选集合引导（只填充启用的分面）
    pub fn from_filters(filters: &ActiveFilters, enabled: &EnabledFacets) -> Self {
        let reduced = filters.reduce();
        let mut state = Self::default();
        if enabled.text {
            state.text.write(reduced.text);
        }
        if enabled.staleness {
            state.staleness.write(reduced.stale);
        }
        if enabled.registered_with {
            state.registered_with.write(reduced.registered_with);
        }
        if enabled.tags {
            state.tags.write(reduced.tags);
        }
        state
    }

    /// 作用域更新：只读写 action 所属的分面
    pub fn apply_facet_update(&mut self, action: FacetAction) -> Option<FacetChange> {
        reducer::reduce(self, action)
    }

    pub fn reset(&mut self, facet: Facet) -> bool {
        self.apply_facet_update(FacetAction::reset(facet)).is_some()
    }

    /// 重置所有启用的分面，返回实际发生变化的分面
    pub fn reset_all(&mut self, enabled: &EnabledFacets) -> Vec<Facet> {
        Facet::ALL
            .into_iter()
            .filter(|facet| enabled.is_enabled(*facet))
            .filter(|facet| self.reset(*facet))
            .collect()
    }

    pub fn is_identity(&self, facet: Facet) -> bool {
        match facet {
            Facet::Text => self.text.is_identity(),
            Facet::Staleness => self.staleness.is_identity(),
            Facet::RegisteredWith => self.registered_with.is_identity(),
            Facet::Tags => self.tags.is_identity(),
        }
    }

    /// 分面对应的筛选描述；恒等值时为 None
    pub fn builtin(&self, facet: Facet) -> Option<BuiltinFilter> {
        if self.is_identity(facet) {
            return None;
        }
        Some(match facet {
            Facet::Text => BuiltinFilter::Text {
                filter: self.text.trimmed().to_string(),
            },
            Facet::Staleness => BuiltinFilter::Stale {
                stale_filter: self.staleness.to_vec(),
            },
            Facet::RegisteredWith => BuiltinFilter::RegisteredWith {
                registered_with_filter: self.registered_with.to_vec(),
            },
            Facet::Tags => BuiltinFilter::Tags {
                tag_filters: self.tags.read().clone(),
            },
        })
    }

    /// 把单个分面写回集合（原位替换 / 追加 / 移除）
    pub fn sync_facet(&self, facet: Facet, filters: &mut ActiveFilters) {
        filters.set(facet, self.builtin(facet));
    }

    /// 以 base 为底重建集合：外部描述原样保留，启用分面按当前取值写回
    pub fn to_filters(&self, base: &ActiveFilters, enabled: &EnabledFacets) -> ActiveFilters {
        let mut filters = base.clone();
        for facet in Facet::ALL {
            if enabled.is_enabled(facet) {
                self.sync_facet(facet, &mut filters);
            }
        }
        filters
    }
}

/// 各分面是否启用（由 hide_filters 推导，与取值无关）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnabledFacets {
    pub text: bool,
    pub staleness: bool,
    pub registered_with: bool,
    pub tags: bool,
}

impl Default for EnabledFacets {
    fn default() -> Self {
        Self::from_hide(&HideFilters::default())
    }
}

impl EnabledFacets {
    /// `all` 隐藏全部，除非某分面显式设为 false；分面自身为 true 时总是隐藏
    pub fn from_hide(hide: &HideFilters) -> Self {
        let all = hide.all.unwrap_or(false);
        let enabled = |own: Option<bool>| !(all && own != Some(false)) && own != Some(true);
        Self {
            text: enabled(hide.name),
            staleness: enabled(hide.stale),
            registered_with: enabled(hide.registered_with),
            tags: enabled(hide.tags),
        }
    }

    pub fn is_enabled(&self, facet: Facet) -> bool {
        match facet {
            Facet::Text => self.text,
            Facet::Staleness => self.staleness,
            Facet::RegisteredWith => self.registered_with,
            Facet::Tags => self.tags,
        }
    }
}

/// 挂载时的外部上下文快照
#[derive(Debug, Clone)]
pub struct ToolbarContext {
    /// 外部持久化的活动筛选集合
    pub filters: ActiveFilters,
    /// 访问门
    pub has_access: bool,
    /// 首次数据加载是否完成
    pub loaded: bool,
    /// 行数据由外部直接提供（短路）
    pub has_items: bool,
    /// 外部提供的行数据是否已到位
    pub items_loaded: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub show_tags: bool,
    pub hide_filters: HideFilters,
    /// 外部静态 chip，排在最后原样透传
    pub static_chips: Vec<ChipDescriptor>,
    /// 随标签目录查询一起下发的外部条件
    pub custom_filters: Option<serde_json::Value>,
}

impl Default for ToolbarContext {
    fn default() -> Self {
        Self::from_config(&ToolbarSection::default())
    }
}

impl ToolbarContext {
    pub fn from_config(cfg: &ToolbarSection) -> Self {
        Self {
            filters: ActiveFilters::new(),
            has_access: true,
            loaded: false,
            has_items: false,
            items_loaded: false,
            page: Some(1),
            per_page: Some(cfg.per_page),
            show_tags: cfg.show_tags,
            hide_filters: cfg.hide_filters.clone(),
            static_chips: Vec::new(),
            custom_filters: None,
        }
    }

    pub fn with_filters(mut self, filters: ActiveFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_access(mut self, has_access: bool) -> Self {
        self.has_access = has_access;
        self
    }

    pub fn with_loaded(mut self, loaded: bool) -> Self {
        self.loaded = loaded;
        self
    }

    pub fn with_static_chips(mut self, chips: Vec<ChipDescriptor>) -> Self {
        self.static_chips = chips;
        self
    }

    pub fn enabled(&self) -> EnabledFacets {
        EnabledFacets::from_hide(&self.hide_filters)
    }

    /// 页码、每页条数已定义，外部行数据（如有）已到位，且首次加载完成
    pub fn should_reload(&self) -> bool {
        self.page.is_some()
            && self.per_page.is_some()
            && (!self.has_items || self.items_loaded)
            && self.loaded
    }

    pub fn apply(&mut self, update: ContextUpdate) {
        if let Some(has_access) = update.has_access {
            self.has_access = has_access;
        }
        if let Some(loaded) = update.loaded {
            self.loaded = loaded;
        }
        if let Some(items_loaded) = update.items_loaded {
            self.items_loaded = items_loaded;
        }
        if let Some(page) = update.page {
            self.page = Some(page);
        }
        if let Some(per_page) = update.per_page {
            self.per_page = Some(per_page);
        }
        if let Some(chips) = update.static_chips {
            self.static_chips = chips;
        }
        if let Some(custom) = update.custom_filters {
            self.custom_filters = Some(custom);
        }
    }
}

/// 外部上下文的增量更新；None 表示不变
#[derive(Debug, Clone, Default)]
pub struct ContextUpdate {
    pub has_access: Option<bool>,
    pub loaded: Option<bool>,
    pub items_loaded: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub static_chips: Option<Vec<ChipDescriptor>>,
    pub custom_filters: Option<serde_json::Value>,
}

/// 渲染方看到的投影
#[derive(Clone, Debug, Default, Serialize)]
pub struct ToolbarView {
    /// 有筛选且有访问权限时才有 chip
    pub chips: Option<Vec<ChipDescriptor>>,
    pub controls: Vec<FacetControl>,
    pub filters: ActiveFilters,
    pub is_disabled: bool,
    pub loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reducer::{SetAction, TagsAction, TextAction};
    use std::collections::BTreeSet;

    fn hide(all: Option<bool>, name: Option<bool>) -> HideFilters {
        HideFilters {
            all,
            name,
            ..HideFilters::default()
        }
    }

    #[test]
    fn test_enabled_truth_table() {
        assert!(EnabledFacets::from_hide(&hide(None, None)).text);
        assert!(!EnabledFacets::from_hide(&hide(None, Some(true))).text);
        assert!(!EnabledFacets::from_hide(&hide(Some(true), None)).text);
        assert!(EnabledFacets::from_hide(&hide(Some(true), Some(false))).text);
        assert!(!EnabledFacets::from_hide(&hide(Some(true), Some(false))).tags);
        assert!(EnabledFacets::from_hide(&hide(Some(false), None)).staleness);
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let enabled = EnabledFacets::default();
        let mut base = ActiveFilters::new();
        base.push_external(serde_json::json!({"type": "OS", "osFilter": ["8"]}));

        let mut state = FilterState::default();
        state.apply_facet_update(FacetAction::Text(TextAction::Set(" web ".into())));
        state.apply_facet_update(FacetAction::Staleness(SetAction::Insert(StaleToken::Fresh)));
        state.apply_facet_update(FacetAction::Tags(TagsAction::Select {
            group: "A".into(),
            entry: "x".into(),
            selected: true,
        }));

        let once = state.to_filters(&base, &enabled);
        let reseeded = FilterState::from_filters(&once, &enabled);
        let twice = reseeded.to_filters(&once, &enabled);
        assert_eq!(once, twice);
        assert_eq!(FilterState::from_filters(&twice, &enabled), reseeded);
        assert_eq!(once.externals().count(), 1);
    }

    #[test]
    fn test_identity_facets_are_omitted() {
        let enabled = EnabledFacets::default();
        let filters = FilterState::default().to_filters(&ActiveFilters::new(), &enabled);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_disabled_facet_not_seeded() {
        let filters = ActiveFilters::from_json(
            r#"[{"type": "TEXT", "filter": "db"}, {"type": "STALE", "staleFilter": ["stale"]}]"#,
        )
        .unwrap();
        let enabled = EnabledFacets::from_hide(&hide(None, Some(true)));
        let state = FilterState::from_filters(&filters, &enabled);
        assert!(state.is_identity(Facet::Text));
        assert_eq!(*state.staleness.read(), BTreeSet::from([StaleToken::Stale]));
    }

    #[test]
    fn test_reset_all_only_enabled() {
        let mut state = FilterState::default();
        state.apply_facet_update(FacetAction::Text(TextAction::Set("a".into())));
        state.apply_facet_update(FacetAction::Staleness(SetAction::Insert(StaleToken::Stale)));
        let enabled = EnabledFacets::from_hide(&hide(None, Some(true)));

        let changed = state.reset_all(&enabled);
        assert_eq!(changed, vec![Facet::Staleness]);
        assert_eq!(state.text.read(), "a");
    }

    #[test]
    fn test_should_reload_gate() {
        let mut ctx = ToolbarContext::default();
        assert!(!ctx.should_reload());
        ctx.apply(ContextUpdate {
            loaded: Some(true),
            ..ContextUpdate::default()
        });
        assert!(ctx.should_reload());
        ctx.has_items = true;
        assert!(!ctx.should_reload());
        ctx.items_loaded = true;
        assert!(ctx.should_reload());
        ctx.per_page = None;
        assert!(!ctx.should_reload());
    }
}
