//! Filterbar 演示入口
//!
//! 初始化日志，用 Mock 数据源挂载一个工具栏，模拟几次输入与删除，打印最终视图。

use std::sync::Arc;

use anyhow::Context;
use filterbar::core::{spawn_toolbar, Command, FacetAction, SetAction, TagsAction, TextAction};
use filterbar::filters::{ActiveFilters, StaleToken};
use filterbar::observability;
use filterbar::source::{DeleteEvent, MockDataSource, NoopHooks, RowSet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let initial = ActiveFilters::from_json(r#"[{"type": "STALE", "staleFilter": ["fresh", "stale_warning"]}]"#)
        .context("Invalid initial filters")?;
    let source = Arc::new(MockDataSource::new().with_rows(RowSet {
        total: 2,
        results: vec![
            serde_json::json!({"id": "host-1", "display_name": "web-01"}),
            serde_json::json!({"id": "host-2", "display_name": "web-02"}),
        ],
    }));

    let handle = spawn_toolbar(None, initial, source.clone(), Arc::new(NoopHooks));

    // 连续输入只产生一次刷新
    for text in ["w", "we", "web"] {
        handle.apply(FacetAction::Text(TextAction::Set(text.to_string())))?;
    }
    handle.apply(FacetAction::Staleness(SetAction::Remove(StaleToken::StaleWarning)))?;
    handle.apply(FacetAction::Tags(TagsAction::Select {
        group: "insights-client".to_string(),
        entry: "env=prod".to_string(),
        selected: true,
    }))?;
    handle.flush().await?;

    let view = handle.view();
    println!("{}", serde_json::to_string_pretty(&view).context("Failed to render view")?);

    // 全部清除
    let chips = view.chips.unwrap_or_default();
    handle.send(Command::Delete {
        event: DeleteEvent::new("demo"),
        deleted: chips,
        is_all: true,
    })?;
    handle.flush().await?;

    println!(
        "refreshes: {}, active filters after clear: {}",
        source.refresh_count(),
        handle.view().filters.len()
    );

    handle.unmount()?;
    Ok(())
}
