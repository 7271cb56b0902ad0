//! 防抖派发器
//!
//! 每个实例持有一个后台 worker：`schedule` 只记录最新值并重置静默窗口，窗口到期时把最后一个值交给 sink；
//! `dispatch_now` 立即交付一个值（不等待交付完成，挂起值与其窗口不受影响），`flush` 立即交付挂起值并等待，`cancel` 丢弃挂起值。
//! 交付在 worker 内串行等待，跨窗口的交付顺序与调度顺序一致；调用方从不等待 sink。
//! 生命周期 token 被取消（或派发器被 drop）后 worker 退出，挂起值不再交付。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// 防抖后的下游
#[async_trait]
pub trait DispatchSink<T>: Send + Sync {
    async fn deliver(&self, value: T);
}

enum Message<T> {
    Schedule(T),
    Now(T),
    Flush(oneshot::Sender<()>),
    Cancel,
}

/// 派发器的发送端，可克隆；不持有 worker 的生命周期
pub struct DispatchHandle<T> {
    name: &'static str,
    tx: mpsc::UnboundedSender<Message<T>>,
    token: CancellationToken,
}

impl<T> Clone for DispatchHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
            token: self.token.clone(),
        }
    }
}

impl<T: Send + 'static> DispatchHandle<T> {
    fn send(&self, msg: Message<T>) {
        if self.token.is_cancelled() {
            return;
        }
        if self.tx.send(msg).is_err() {
            tracing::debug!(dispatcher = self.name, "Dispatcher closed, value dropped");
        }
    }

    /// 记录最新值并重新开始静默窗口
    pub fn schedule(&self, value: T) {
        self.send(Message::Schedule(value));
    }

    /// 绕过静默窗口立即交付
    pub fn dispatch_now(&self, value: T) {
        self.send(Message::Now(value));
    }
}

/// 持有定时器的防抖派发器
pub struct Debouncer<T> {
    handle: DispatchHandle<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// 启动 worker；须在 tokio runtime 内调用
    pub fn spawn(
        name: &'static str,
        window: Duration,
        sink: Arc<dyn DispatchSink<T>>,
        token: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(name, window, sink, rx, token.clone()));
        Self {
            handle: DispatchHandle { name, tx, token },
        }
    }

    pub fn handle(&self) -> DispatchHandle<T> {
        self.handle.clone()
    }

    pub fn schedule(&self, value: T) {
        self.handle.schedule(value);
    }

    pub fn dispatch_now(&self, value: T) {
        self.handle.dispatch_now(value);
    }

    /// 立即交付挂起值（若有），并等待此前排队的交付全部完成
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.handle.tx.send(Message::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// 丢弃挂起值
    pub fn cancel(&self) {
        let _ = self.handle.tx.send(Message::Cancel);
    }

    pub fn is_closed(&self) -> bool {
        self.handle.token.is_cancelled() || self.handle.tx.is_closed()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.handle.token.cancel();
    }
}

async fn run_worker<T: Send + 'static>(
    name: &'static str,
    window: Duration,
    sink: Arc<dyn DispatchSink<T>>,
    mut rx: mpsc::UnboundedReceiver<Message<T>>,
    token: CancellationToken,
) {
    let mut pending: Option<T> = None;
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                if pending.is_some() {
                    tracing::debug!(dispatcher = name, "Pending dispatch dropped on teardown");
                }
                break;
            }
            msg = rx.recv() => match msg {
                Some(Message::Schedule(value)) => {
                    if pending.replace(value).is_some() {
                        tracing::trace!(dispatcher = name, "Superseded pending dispatch");
                    }
                    deadline.as_mut().reset(Instant::now() + window);
                }
                Some(Message::Now(value)) => {
                    if !deliver(&sink, value, &token).await {
                        break;
                    }
                }
                Some(Message::Flush(ack)) => {
                    if let Some(value) = pending.take() {
                        if !deliver(&sink, value, &token).await {
                            break;
                        }
                    }
                    let _ = ack.send(());
                }
                Some(Message::Cancel) => {
                    pending = None;
                }
                None => break,
            },
            () = &mut deadline, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    tracing::debug!(dispatcher = name, "Debounce window settled");
                    if !deliver(&sink, value, &token).await {
                        break;
                    }
                }
            }
        }
    }
}

/// 交付一个值；交付途中被取消时返回 false
async fn deliver<T>(sink: &Arc<dyn DispatchSink<T>>, value: T, token: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = sink.deliver(value) => true,
    }
}
