//! 工具栏生命周期监管
//!
//! 持有根 CancellationToken，每个防抖派发器拿一个子 token；卸载时取消根 token，
//! 所有挂起的定时器随之停止，之后不会再有任何派发。

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// 单个工具栏实例的生命周期：实例 ID 与取消令牌
#[derive(Debug)]
pub struct ToolbarSupervisor {
    id: Uuid,
    cancel_token: CancellationToken,
}

impl ToolbarSupervisor {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancel_token: CancellationToken::new(),
        }
    }

    /// 实例 ID（用于日志）
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 创建子 token（用于单个派发器）
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// 卸载：取消全部子任务
    pub fn teardown(&self) {
        if !self.cancel_token.is_cancelled() {
            tracing::debug!(toolbar = %self.id, "Toolbar teardown");
            self.cancel_token.cancel();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Default for ToolbarSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ToolbarSupervisor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teardown_cancels_children() {
        let supervisor = ToolbarSupervisor::new();
        let child = supervisor.child_token();
        assert!(!child.is_cancelled());
        supervisor.teardown();
        assert!(child.is_cancelled());
        assert!(supervisor.is_torn_down());
    }

    #[test]
    fn test_drop_cancels_children() {
        let child = {
            let supervisor = ToolbarSupervisor::new();
            supervisor.child_token()
        };
        assert!(child.is_cancelled());
    }
}
