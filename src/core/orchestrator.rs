//! 工具栏编排器
//!
//! 挂载时从外部活动筛选集合引导分面状态，并立即刷新一次；之后每个分面一个观察者：
//! 分面取值变化、分面启用、且「可重新加载」时，经防抖派发器刷新行数据（标签分面另走标签目录派发器）。
//! 删除 chip 时经删除路由重置对应分面；全部清除走立即刷新路径，不经过防抖窗口。
//! 所有操作都不等待数据源：立即刷新也由行数据派发器的 worker 执行，标签目录查询只在自己的 worker 里等待。
//! 访问门关闭时所有派发都是静默丢弃，不会在门重新打开后补发。

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::config::DispatchSection;
use crate::core::reducer::{FacetAction, FacetChange, SetAction, TagsAction, TextAction};
use crate::core::{ContextUpdate, EnabledFacets, FilterState, ToolbarContext, ToolbarSupervisor, ToolbarView};
use crate::dispatch::{Debouncer, RefreshRequest, Refresher, RowRefreshSink, TagCatalogSink, ToolbarResults};
use crate::facets::{ChipDescriptor, Facet};
use crate::filters::{ActiveFilters, RegisteredWith, StaleToken, TagSelection};
use crate::source::{DataSource, DeleteEvent, RefreshConfig, TagCatalogQuery, ToolbarHooks};
use crate::toolbar::{self, ChipContext, FacetControl};

/// 单个工具栏实例；分面状态树由它独占
pub struct Toolbar {
    context: ToolbarContext,
    enabled: EnabledFacets,
    state: FilterState,
    /// 本地维护的活动筛选集合（挂载时取快照，之后随分面变化更新）
    filters: ActiveFilters,
    gate: Arc<AtomicBool>,
    refresher: Refresher,
    rows: Debouncer<RefreshRequest>,
    tag_catalog: Debouncer<TagCatalogQuery>,
    hooks: Arc<dyn ToolbarHooks>,
    supervisor: ToolbarSupervisor,
}

impl Toolbar {
    /// 挂载：引导分面状态（不发请求），再立即刷新一次；须在 tokio runtime 内调用
    pub fn mount(
        context: ToolbarContext,
        source: Arc<dyn DataSource>,
        hooks: Arc<dyn ToolbarHooks>,
        dispatch: &DispatchSection,
    ) -> Self {
        let supervisor = ToolbarSupervisor::new();
        let enabled = context.enabled();
        let gate = Arc::new(AtomicBool::new(context.has_access));
        let refresher = Refresher::new(source, Arc::clone(&gate));

        let tag_catalog = Debouncer::spawn(
            "tag-catalog",
            dispatch.tag_catalog_window(),
            Arc::new(TagCatalogSink(refresher.clone())),
            supervisor.child_token(),
        );
        let rows = Debouncer::spawn(
            "rows",
            dispatch.refresh_window(),
            Arc::new(RowRefreshSink::new(refresher.clone(), tag_catalog.handle())),
            supervisor.child_token(),
        );

        let state = if !context.has_items && context.has_access {
            FilterState::from_filters(&context.filters, &enabled)
        } else {
            FilterState::default()
        };
        let filters = state.to_filters(&context.filters, &enabled);

        tracing::info!(
            toolbar = %supervisor.id(),
            filters = filters.len(),
            has_access = context.has_access,
            "Toolbar mounted"
        );

        let toolbar = Self {
            context,
            enabled,
            state,
            filters,
            gate,
            refresher,
            rows,
            tag_catalog,
            hooks,
            supervisor,
        };

        let config = RefreshConfig {
            page: toolbar.context.page.unwrap_or(1),
            per_page: toolbar.context.per_page,
            filters: toolbar.filters.clone(),
        };
        toolbar.update_data(config);
        toolbar
    }

    pub fn id(&self) -> Uuid {
        self.supervisor.id()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    pub fn context(&self) -> &ToolbarContext {
        &self.context
    }

    pub fn enabled(&self) -> EnabledFacets {
        self.enabled
    }

    /// 最近一次数据源结果（快照）
    pub async fn results(&self) -> ToolbarResults {
        self.refresher.results().read().await.clone()
    }

    // ---- 分面更新 ----

    /// 应用一个分面动作；取值有变化时触发该分面的观察者
    pub fn apply(&mut self, action: FacetAction) -> bool {
        if self.supervisor.is_torn_down() {
            return false;
        }
        match self.state.apply_facet_update(action) {
            Some(change) => {
                self.observe(change);
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        self.apply(FacetAction::Text(TextAction::Set(value.into())))
    }

    pub fn set_staleness(&mut self, tokens: impl IntoIterator<Item = StaleToken>) -> bool {
        let value: BTreeSet<_> = tokens.into_iter().collect();
        self.apply(FacetAction::Staleness(SetAction::Set(value)))
    }

    pub fn toggle_staleness(&mut self, token: StaleToken) -> bool {
        self.apply(FacetAction::Staleness(SetAction::Toggle(token)))
    }

    pub fn set_registered_with(&mut self, tokens: impl IntoIterator<Item = RegisteredWith>) -> bool {
        let value: BTreeSet<_> = tokens.into_iter().collect();
        self.apply(FacetAction::RegisteredWith(SetAction::Set(value)))
    }

    pub fn toggle_registered_with(&mut self, token: RegisteredWith) -> bool {
        self.apply(FacetAction::RegisteredWith(SetAction::Toggle(token)))
    }

    pub fn set_selected_tags(&mut self, selection: TagSelection) -> bool {
        self.apply(FacetAction::Tags(TagsAction::Set(selection)))
    }

    pub fn toggle_tag(&mut self, group: &str, entry: &str) -> bool {
        let selected = !self.state.tags.is_selected(group, entry);
        self.apply(FacetAction::Tags(TagsAction::Select {
            group: group.to_string(),
            entry: entry.to_string(),
            selected,
        }))
    }

    /// 标签目录搜索词（只触发标签目录查询）
    pub fn set_tag_search(&mut self, query: impl Into<String>) -> bool {
        self.apply(FacetAction::Tags(TagsAction::Search(query.into())))
    }

    /// 每个分面的观察者
    fn observe(&mut self, change: FacetChange) {
        match change {
            FacetChange::Value(facet) => {
                if !self.enabled.is_enabled(facet) {
                    tracing::debug!(toolbar = %self.id(), ?facet, "Facet disabled, change not dispatched");
                    return;
                }
                self.state.sync_facet(facet, &mut self.filters);
                if !self.context.should_reload() {
                    tracing::debug!(toolbar = %self.id(), ?facet, "Not ready to reload, refresh suppressed");
                    return;
                }
                if facet == Facet::Tags && !self.context.show_tags {
                    return;
                }
                self.schedule_refresh(RefreshConfig {
                    page: 1,
                    per_page: self.context.per_page,
                    filters: self.filters.clone(),
                });
                if facet == Facet::Tags {
                    self.schedule_tag_catalog();
                }
            }
            FacetChange::TagSearch => {
                if self.enabled.tags && self.context.show_tags && self.context.should_reload() {
                    self.schedule_tag_catalog();
                }
            }
        }
    }

    // ---- 派发 ----

    fn tags_on_refresh(&self, filters: &ActiveFilters) -> Option<TagCatalogQuery> {
        (self.context.show_tags && !self.context.has_items).then(|| self.tag_query(filters))
    }

    fn tag_query(&self, filters: &ActiveFilters) -> TagCatalogQuery {
        TagCatalogQuery {
            search: self.state.tags.search().to_string(),
            filters: filters.clone(),
            custom_filters: self.context.custom_filters.clone(),
        }
    }

    fn schedule_refresh(&self, config: RefreshConfig) {
        if !self.gate.load(Ordering::SeqCst) {
            tracing::debug!(toolbar = %self.id(), "Access gate closed, refresh not scheduled");
            return;
        }
        let tag_query = self.tags_on_refresh(&config.filters);
        self.rows.schedule(RefreshRequest { config, tag_query });
    }

    fn schedule_tag_catalog(&self) {
        if !self.gate.load(Ordering::SeqCst) || self.context.has_items {
            return;
        }
        self.tag_catalog.schedule(self.tag_query(&self.filters));
    }

    /// 立即刷新（绕过防抖窗口）；不等待数据源
    pub fn update_data(&self, config: RefreshConfig) {
        if self.supervisor.is_torn_down() || !self.gate.load(Ordering::SeqCst) {
            tracing::debug!(toolbar = %self.id(), "Immediate refresh suppressed");
            return;
        }
        let tag_query = self.tags_on_refresh(&config.filters);
        self.rows.dispatch_now(RefreshRequest { config, tag_query });
    }

    /// 立即交付两个派发器中挂起的请求，并等待已排队的交付完成
    pub async fn flush(&self) {
        self.rows.flush().await;
        self.tag_catalog.flush().await;
    }

    // ---- 删除 ----

    /// 删除 chip；`is_all` 为 true 时全部清除
    pub fn on_delete(&mut self, event: &DeleteEvent, deleted: &[ChipDescriptor], is_all: bool) {
        if self.supervisor.is_torn_down() {
            return;
        }
        if is_all {
            self.clear_all();
        } else {
            for action in toolbar::route_deletion(deleted) {
                self.apply(action);
            }
        }
        self.hooks.on_delete(event, deleted, is_all);
    }

    /// 重置所有启用分面（不触发观察者），丢弃两个派发器的挂起值，通知外部，再立即以空集合刷新第 1 页
    fn clear_all(&mut self) {
        let reset = self.state.reset_all(&self.enabled);
        self.rows.cancel();
        self.tag_catalog.cancel();
        self.filters = ActiveFilters::new();
        tracing::info!(toolbar = %self.id(), facets = reset.len(), "All filters cleared");

        self.hooks.on_clear_filters();
        self.update_data(RefreshConfig {
            page: 1,
            per_page: None,
            filters: ActiveFilters::new(),
        });
    }

    // ---- 外部同步 ----

    /// 外部上下文变化（访问门、加载状态、分页等）；访问门关闭时丢弃挂起请求
    pub fn update_context(&mut self, update: ContextUpdate) {
        self.context.apply(update);
        let open = self.context.has_access;
        if self.gate.swap(open, Ordering::SeqCst) == open {
            return;
        }
        tracing::debug!(toolbar = %self.id(), has_access = open, "Access gate changed");
        if !open {
            self.rows.cancel();
            self.tag_catalog.cancel();
        }
    }

    /// 外部推送新的活动筛选集合：重新引导分面状态，不发请求
    pub fn sync_filters(&mut self, filters: ActiveFilters) {
        let search = self.state.tags.search().to_string();
        self.state = FilterState::from_filters(&filters, &self.enabled);
        self.state.tags.set_search(search);
        self.filters = self.state.to_filters(&filters, &self.enabled);
    }

    // ---- 渲染投影 ----

    pub fn chips(&self) -> Vec<ChipDescriptor> {
        toolbar::build_chips(&self.state, &ChipContext::from_toolbar(&self.context))
    }

    /// 有筛选且有访问权限时返回 chip，否则 None
    pub fn active_filters_config(&self) -> Option<Vec<ChipDescriptor>> {
        let ctx = ChipContext::from_toolbar(&self.context);
        (self.context.has_access && toolbar::is_filter_selected(&self.state, &ctx))
            .then(|| toolbar::build_chips(&self.state, &ctx))
    }

    pub fn controls(&self) -> Vec<FacetControl> {
        toolbar::controls(&self.context)
    }

    pub fn view(&self) -> ToolbarView {
        ToolbarView {
            chips: self.active_filters_config(),
            controls: self.controls(),
            filters: self.filters.clone(),
            is_disabled: !self.context.has_access,
            loaded: self.context.loaded,
        }
    }

    /// 卸载：停止所有挂起的定时器
    pub fn unmount(&self) {
        self.supervisor.teardown();
        tracing::info!(toolbar = %self.id(), "Toolbar unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.supervisor.is_torn_down()
    }
}
