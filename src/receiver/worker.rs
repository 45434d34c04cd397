//! The single consumer of the receiver's event queue.
//!
//! The worker drains the queue one item at a time. Each item's side effects
//! complete before the next item is dequeued, so two notifications arriving
//! back to back can never race to start and stop the service out of order.
//!
//! 接收器事件队列的唯一消费者。
//! 工作线程一次处理一个条目，每个条目的副作用在下一个条目出队之前完成。

use super::{command::QueuedItem, stats::ReceiverStats};
use crate::state::Decision;
use futures::FutureExt;
use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, error, info, trace, warn};

/// The worker's state. Runs on the receiver's dedicated thread.
///
/// 工作线程的状态，运行在接收器的专用线程上。
pub(crate) struct ReceiverWorker {
    pub(crate) queue_rx: mpsc::UnboundedReceiver<QueuedItem>,
    pub(crate) stats: Arc<ReceiverStats>,
    /// Set by `close()` under `ShutdownPolicy::Discard`.
    pub(crate) discarding: Arc<AtomicBool>,
    pub(crate) slow_item_threshold: Duration,
}

impl ReceiverWorker {
    /// Runs until the queue is closed and empty.
    ///
    /// 运行直到队列关闭且为空。
    pub(crate) async fn run(mut self) {
        info!("Receiver worker started");

        while let Some(item) = self.queue_rx.recv().await {
            if self.discarding.load(Ordering::Acquire) {
                debug!(seq = item.seq, state = %item.state, "Discarding item pending at shutdown");
                self.stats.record_discarded();
                continue;
            }
            self.process(item).await;
        }

        info!(stats = %self.stats.snapshot(), "Receiver worker stopped");
    }

    /// Processes one item. Never fails: every collaborator error, and any
    /// panic raised while calling a collaborator, stops here.
    ///
    /// 处理一个条目。永不失败：所有协作者错误以及调用协作者时的 panic 都在此处终止。
    pub(crate) async fn process(&self, item: QueuedItem) {
        let started = Instant::now();
        let seq = item.seq;

        apply(&item, &self.stats).await;
        self.stats.record_processed();

        let elapsed = started.elapsed();
        if elapsed > self.slow_item_threshold {
            warn!(seq, ?elapsed, "Handling USB state was slow");
        } else {
            trace!(seq, ?elapsed, "Handled USB state");
        }
    }
}

/// Runs the decision for one snapshot and performs its side effects.
///
/// The data-layer notification runs whatever the service call did,
/// including when it panicked.
async fn apply(item: &QueuedItem, stats: &ReceiverStats) {
    let ctx = &item.context;
    let seq = item.seq;
    debug!(seq, state = %item.state, "Handling USB state");

    match item.state.decide() {
        Decision::Start(request) => {
            match contained(seq, "start", stats, ctx.services().start(request)).await {
                Some(Ok(())) => debug!(seq, ?request, "Transfer service started"),
                Some(Err(e)) => {
                    error!(seq, error = %e, "Failed to start transfer service");
                    stats.record_start_failure();
                }
                None => stats.record_start_failure(),
            }
            // Lets the data layer bind to the service.
            let notified = contained(
                seq,
                "notify_connected",
                stats,
                ctx.data_sink().notify_connected(),
            );
            if let Some(Err(e)) = notified.await {
                warn!(seq, error = %e, "Failed to notify data layer of connect");
                stats.record_sink_failure();
            }
        }
        Decision::Stop => {
            match contained(seq, "stop", stats, ctx.services().stop()).await {
                Some(Ok(stopped)) => debug!(seq, stopped, "Transfer service stop requested"),
                Some(Err(e)) => {
                    warn!(seq, error = %e, "Failed to stop transfer service");
                    stats.record_stop_failure();
                }
                None => stats.record_stop_failure(),
            }
            let notified = contained(
                seq,
                "notify_disconnected",
                stats,
                ctx.data_sink().notify_disconnected(),
            );
            if let Some(Err(e)) = notified.await {
                warn!(seq, error = %e, "Failed to notify data layer of disconnect");
                stats.record_sink_failure();
            }
        }
    }
}

/// Awaits one collaborator call. A panic is logged, counted and turned into `None`.
///
/// 等待一次协作者调用。panic 会被记录、计数并转换为 `None`。
async fn contained<T>(
    seq: u64,
    call: &'static str,
    stats: &ReceiverStats,
    fut: impl Future<Output = T>,
) -> Option<T> {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(output) => Some(output),
        Err(_) => {
            error!(seq, call, "Collaborator panicked while handling USB state");
            stats.record_panic();
            None
        }
    }
}
