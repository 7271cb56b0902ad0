//! 工具栏集成测试：经后台运行时驱动，检查防抖、删除与访问门

use std::sync::Arc;
use std::time::Duration;

use filterbar::config::AppConfig;
use filterbar::core::{
    spawn_with, Command, ContextUpdate, FacetAction, SetAction, TagsAction, TextAction,
    ToolbarContext,
};
use filterbar::facets::ChipKind;
use filterbar::filters::{ActiveFilters, RegisteredWith, StaleToken};
use filterbar::source::{DeleteEvent, MockDataSource, RecordingHooks};
use tokio::time::sleep;

fn settled() -> Duration {
    Duration::from_millis(2000)
}

fn tags_context() -> ToolbarContext {
    let mut context = ToolbarContext::default().with_loaded(true);
    context.show_tags = true;
    context
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_then_bulk_clear() {
    let source = Arc::new(MockDataSource::new());
    let hooks = Arc::new(RecordingHooks::default());
    let handle = spawn_with(tags_context(), source.clone(), hooks.clone(), &AppConfig::default());
    handle.flush().await.unwrap();
    assert_eq!(source.refresh_count(), 1);

    for text in ["p", "pr", "pro", "prod"] {
        handle.apply(FacetAction::Text(TextAction::Set(text.into()))).unwrap();
        sleep(Duration::from_millis(100)).await;
    }
    handle
        .apply(FacetAction::RegisteredWith(SetAction::Insert(RegisteredWith::Puptoo)))
        .unwrap();
    sleep(settled()).await;

    let refreshes = source.refreshes();
    assert_eq!(refreshes.len(), 2);
    let reduced = refreshes[1].filters.reduce();
    assert_eq!(reduced.text, "prod");
    assert!(reduced.registered_with.contains(&RegisteredWith::Puptoo));

    let chips = handle.view().chips.unwrap();
    let kinds: Vec<_> = chips.iter().map(|c| c.kind.clone()).collect();
    assert_eq!(kinds, vec![ChipKind::Text, ChipKind::RegisteredWith]);

    handle
        .send(Command::Delete {
            event: DeleteEvent::new("clear-all"),
            deleted: chips,
            is_all: true,
        })
        .unwrap();
    handle.flush().await.unwrap();
    sleep(settled()).await;

    let refreshes = source.refreshes();
    assert_eq!(refreshes.len(), 3);
    assert!(refreshes[2].filters.is_empty());
    assert_eq!(refreshes[2].per_page, None);
    assert_eq!(hooks.clear_count(), 1);
    assert!(handle.view().chips.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_external_filters_survive_edits() {
    let filters = ActiveFilters::from_json(
        r#"[{"type": "OS", "osFilter": {"rhel": ["8.4"]}}, {"type": "STALE", "staleFilter": ["stale"]}]"#,
    )
    .unwrap();
    let source = Arc::new(MockDataSource::new());
    let context = ToolbarContext::default().with_loaded(true).with_filters(filters);
    let handle = spawn_with(context, source.clone(), Arc::new(RecordingHooks::default()), &AppConfig::default());

    handle
        .apply(FacetAction::Staleness(SetAction::Toggle(StaleToken::Stale)))
        .unwrap();
    handle.flush().await.unwrap();

    let last = source.refreshes().pop().unwrap();
    assert_eq!(last.filters.externals().count(), 1);
    assert!(last.filters.reduce().stale.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_access_revoked_mid_session() {
    let source = Arc::new(MockDataSource::new());
    let handle = spawn_with(tags_context(), source.clone(), Arc::new(RecordingHooks::default()), &AppConfig::default());
    handle.flush().await.unwrap();
    let tag_queries = source.tag_queries().len();

    handle
        .apply(FacetAction::Tags(TagsAction::Search("env".into())))
        .unwrap();
    handle
        .send(Command::UpdateContext(ContextUpdate {
            has_access: Some(false),
            ..ContextUpdate::default()
        }))
        .unwrap();
    handle
        .apply(FacetAction::Text(TextAction::Set("db".into())))
        .unwrap();
    sleep(settled()).await;

    assert_eq!(source.refresh_count(), 1);
    assert_eq!(source.tag_queries().len(), tag_queries);
    let view = handle.view();
    assert!(view.is_disabled);
    assert!(view.chips.is_none());
}
