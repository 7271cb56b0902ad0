//! 工具栏运行时：把 Toolbar 放进后台任务，通过命令通道驱动
//!
//! 渲染方持有 `ToolbarHandle`：发送命令，订阅 `ToolbarView` 快照（每条命令处理完后推送一次）。
//! 命令循环本身不等待数据源，只有 Flush / Results 会等待派发器。

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::config::{load_config, AppConfig};
use crate::core::reducer::FacetAction;
use crate::core::{ContextUpdate, Toolbar, ToolbarContext, ToolbarError, ToolbarView};
use crate::dispatch::ToolbarResults;
use crate::facets::ChipDescriptor;
use crate::filters::ActiveFilters;
use crate::source::{DataSource, DeleteEvent, ToolbarHooks};

/// 从渲染方发往工具栏的命令
#[derive(Debug)]
pub enum Command {
    /// 分面动作（输入、勾选、标签搜索）
    Apply(FacetAction),
    /// 删除 chip；`is_all` 为 true 时全部清除
    Delete {
        event: DeleteEvent,
        deleted: Vec<ChipDescriptor>,
        is_all: bool,
    },
    /// 外部上下文变化
    UpdateContext(ContextUpdate),
    /// 外部推送新的活动筛选集合
    SyncFilters(ActiveFilters),
    /// 立即交付挂起的派发
    Flush(oneshot::Sender<()>),
    /// 读取最近一次数据源结果
    Results(oneshot::Sender<ToolbarResults>),
    /// 卸载并退出
    Unmount,
}

/// 后台工具栏的句柄
#[derive(Clone)]
pub struct ToolbarHandle {
    tx: mpsc::UnboundedSender<Command>,
    view_rx: watch::Receiver<ToolbarView>,
}

impl ToolbarHandle {
    pub fn send(&self, cmd: Command) -> Result<(), ToolbarError> {
        self.tx.send(cmd).map_err(|_| ToolbarError::Closed)
    }

    pub fn apply(&self, action: FacetAction) -> Result<(), ToolbarError> {
        self.send(Command::Apply(action))
    }

    pub async fn flush(&self) -> Result<(), ToolbarError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(Command::Flush(ack_tx))?;
        ack_rx.await.map_err(|_| ToolbarError::Closed)
    }

    pub async fn results(&self) -> Result<ToolbarResults, ToolbarError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Results(tx))?;
        rx.await.map_err(|_| ToolbarError::Closed)
    }

    /// 当前视图快照
    pub fn view(&self) -> ToolbarView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ToolbarView> {
        self.view_rx.clone()
    }

    pub fn unmount(&self) -> Result<(), ToolbarError> {
        self.send(Command::Unmount)
    }
}

/// 按配置构造上下文并挂载工具栏；配置加载失败时退回默认值
pub fn spawn_toolbar(
    config_path: Option<PathBuf>,
    filters: ActiveFilters,
    source: Arc<dyn DataSource>,
    hooks: Arc<dyn ToolbarHooks>,
) -> ToolbarHandle {
    let cfg = load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    let context = ToolbarContext::from_config(&cfg.toolbar)
        .with_filters(filters)
        .with_loaded(true);
    spawn_with(context, source, hooks, &cfg)
}

/// 用现成的上下文挂载工具栏
pub fn spawn_with(
    context: ToolbarContext,
    source: Arc<dyn DataSource>,
    hooks: Arc<dyn ToolbarHooks>,
    cfg: &AppConfig,
) -> ToolbarHandle {
    let mut toolbar = Toolbar::mount(context, source, hooks, &cfg.dispatch);

    let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
    let (view_tx, view_rx) = watch::channel(toolbar.view());

    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            match cmd {
                Command::Apply(action) => {
                    toolbar.apply(action);
                }
                Command::Delete {
                    event,
                    deleted,
                    is_all,
                } => {
                    toolbar.on_delete(&event, &deleted, is_all);
                }
                Command::UpdateContext(update) => toolbar.update_context(update),
                Command::SyncFilters(filters) => toolbar.sync_filters(filters),
                Command::Flush(ack) => {
                    toolbar.flush().await;
                    let _ = ack.send(());
                }
                Command::Results(reply) => {
                    let _ = reply.send(toolbar.results().await);
                }
                Command::Unmount => break,
            }
            let _ = view_tx.send(toolbar.view());
        }
        // 命令通道关闭或收到 Unmount
        toolbar.unmount();
    });

    ToolbarHandle { tx, view_rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reducer::TextAction;
    use crate::source::{MockDataSource, NoopHooks};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_handle_drives_toolbar() {
        let source = Arc::new(MockDataSource::new());
        let context = ToolbarContext::default().with_loaded(true);
        let handle = spawn_with(context, source.clone(), Arc::new(NoopHooks), &AppConfig::default());

        handle
            .apply(FacetAction::Text(TextAction::Set("web".into())))
            .unwrap();
        handle.flush().await.unwrap();

        assert_eq!(source.refresh_count(), 2);
        assert_eq!(handle.view().filters.reduce().text, "web");
        assert!(handle.results().await.unwrap().rows.is_some());

        handle.unmount().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(matches!(
            handle.apply(FacetAction::Text(TextAction::Clear)),
            Err(ToolbarError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_clear_does_not_stall_commands() {
        let source = Arc::new(MockDataSource::new().with_refresh_delay(Duration::from_secs(10)));
        let context = ToolbarContext::default().with_loaded(true);
        let handle = spawn_with(context, source.clone(), Arc::new(NoopHooks), &AppConfig::default());
        handle
            .apply(FacetAction::Text(TextAction::Set("web".into())))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let deleted = handle.view().chips.unwrap();
        handle
            .send(Command::Delete {
                event: DeleteEvent::default(),
                deleted,
                is_all: true,
            })
            .unwrap();
        handle
            .apply(FacetAction::Text(TextAction::Set("x".into())))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // 数据源仍在处理挂载刷新，命令已全部生效
        let view = handle.view();
        assert_eq!(view.filters.reduce().text, "x");
        let chips = view.chips.unwrap();
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].chips[0].value, "x");
    }
}
