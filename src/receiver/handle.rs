//! The user-facing receiver handle.
//!
//! `MtpReceiver` owns the event queue and the worker thread. Notifications go
//! in through [`MtpReceiver::on_receive`], which only validates and enqueues;
//! everything slow happens on the worker.
//!
//! 面向用户的接收器句柄。`MtpReceiver` 拥有事件队列和工作线程。

use super::{
    command::QueuedItem,
    stats::{ReceiverStats, StatsSnapshot},
    worker::ReceiverWorker,
};
use crate::{
    config::{ReceiverConfig, ShutdownPolicy},
    context::ReceiverContext,
    error::{Error, Result},
    notification::{Action, Notification},
    state::UsbState,
};
use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// What `on_receive` did with a notification.
///
/// `on_receive` 对通知的处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A snapshot was queued with the given sequence number.
    /// 快照已以给定序号入队。
    Enqueued(u64),
    /// Nothing was queued: unrelated action, or no state available at boot.
    /// 未入队：无关的 action，或启动时没有可用状态。
    Ignored,
}

/// Lifecycle of the event queue.
#[derive(Debug)]
enum QueueState {
    /// `start()` has not been called.
    Idle,
    Open(mpsc::UnboundedSender<QueuedItem>),
    /// Closed for good. A receiver is never restarted.
    Closed,
}

/// A USB state receiver that keeps the transfer service in step with the link.
///
/// Call [`start`](Self::start) once, feed notifications through
/// [`on_receive`](Self::on_receive), and call [`shutdown`](Self::shutdown)
/// when done. Dropping the receiver shuts it down.
///
/// 使传输服务与 USB 链路保持同步的接收器。
pub struct MtpReceiver {
    config: ReceiverConfig,
    queue: Mutex<QueueState>,
    worker: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<ReceiverStats>,
    discarding: Arc<AtomicBool>,
    next_seq: AtomicU64,
}

impl MtpReceiver {
    /// Creates a receiver. No thread is started until [`start`](Self::start).
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            config,
            queue: Mutex::new(QueueState::Idle),
            worker: Mutex::new(None),
            stats: Arc::new(ReceiverStats::default()),
            discarding: Arc::new(AtomicBool::new(false)),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Opens the queue and spawns the worker thread.
    ///
    /// The thread is spawned without holding the queue lock, so concurrent
    /// dispatches and `close()` never wait on thread creation. If another
    /// caller started or closed the receiver meanwhile, the fresh worker is
    /// torn down and the matching error is returned.
    ///
    /// 打开队列并启动工作线程。
    pub fn start(&self) -> Result<()> {
        Self::check_idle(&self.lock_queue())?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let worker = ReceiverWorker {
            queue_rx,
            stats: self.stats.clone(),
            discarding: self.discarding.clone(),
            slow_item_threshold: self.config.slow_item_threshold,
        };

        let handle = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || runtime.block_on(worker.run()))?;

        let mut queue = self.lock_queue();
        if let Err(e) = Self::check_idle(&queue) {
            drop(queue);
            // The worker exits as soon as its sender is gone.
            drop(queue_tx);
            if handle.join().is_err() {
                warn!("Redundant receiver worker panicked");
            }
            debug!(error = %e, "Lost start() race, redundant worker joined");
            return Err(e);
        }
        *self.lock_worker() = Some(handle);
        *queue = QueueState::Open(queue_tx);
        drop(queue);

        info!(
            thread = %self.config.thread_name,
            policy = ?self.config.shutdown_policy,
            "MtpReceiver started"
        );
        Ok(())
    }

    /// Dispatch entry point. Never blocks and performs no I/O.
    ///
    /// * `BOOT_COMPLETED`: pulls the current state from the context's sticky
    ///   source and queues it, or does nothing if there is none yet.
    /// * `USB_STATE`: queues the state carried in the extras.
    /// * Anything else is ignored.
    ///
    /// 分派入口。从不阻塞，也不执行 I/O。
    pub fn on_receive(
        &self,
        notification: &Notification,
        context: &ReceiverContext,
    ) -> Result<DispatchOutcome> {
        trace!(action = %notification.action, "on_receive");

        let state = match &notification.action {
            Action::BootCompleted => match context.sticky().current_usb_state() {
                Some(current) => UsbState::from_extras(&current.extras),
                None => {
                    debug!("No USB state available at boot, nothing to do");
                    return Ok(self.ignore());
                }
            },
            Action::UsbState => UsbState::from_extras(&notification.extras),
            Action::Other(action) => {
                trace!(%action, "Ignoring unrelated action");
                return Ok(self.ignore());
            }
        };

        self.enqueue(state, context)
    }

    /// Closes the queue. Idempotent and callable from any thread.
    ///
    /// Items already queued are drained or discarded according to the
    /// configured [`ShutdownPolicy`]. Later dispatches fail with
    /// [`Error::ReceiverClosed`].
    ///
    /// 关闭队列。幂等，可从任意线程调用。
    pub fn close(&self) {
        let mut queue = self.lock_queue();
        match std::mem::replace(&mut *queue, QueueState::Closed) {
            QueueState::Open(queue_tx) => {
                if self.config.shutdown_policy == ShutdownPolicy::Discard {
                    // Must be visible before the worker can observe the closed channel.
                    self.discarding.store(true, Ordering::Release);
                }
                drop(queue_tx);
                info!(policy = ?self.config.shutdown_policy, "MtpReceiver queue closed");
            }
            QueueState::Idle => debug!("MtpReceiver closed before it was started"),
            QueueState::Closed => {}
        }
    }

    /// Closes the queue and joins the worker thread.
    ///
    /// Returns the final statistics the first time the worker is joined and
    /// `None` on every later call. When called from the worker thread itself
    /// (e.g. by a collaborator) the queue is closed but the thread is not
    /// joined, leaving the join to a later call from another thread.
    ///
    /// 关闭队列并等待工作线程结束。
    pub fn shutdown(&self) -> Result<Option<StatsSnapshot>> {
        self.close();

        let mut worker = self.lock_worker();
        let Some(handle) = worker.take() else {
            return Ok(None);
        };

        if handle.thread().id() == thread::current().id() {
            debug!("shutdown() called on the worker thread, not joining");
            *worker = Some(handle);
            return Ok(None);
        }
        drop(worker);

        handle.join().map_err(|_| Error::WorkerPanicked)?;
        let stats = self.stats.snapshot();
        info!(%stats, "MtpReceiver shut down");
        Ok(Some(stats))
    }

    /// Whether the queue is open and accepting notifications.
    pub fn is_running(&self) -> bool {
        matches!(*self.lock_queue(), QueueState::Open(_))
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    fn enqueue(&self, state: UsbState, context: &ReceiverContext) -> Result<DispatchOutcome> {
        let queue = self.lock_queue();
        let queue_tx = match &*queue {
            QueueState::Open(queue_tx) => queue_tx,
            QueueState::Idle => return Err(Error::NotStarted),
            QueueState::Closed => return Err(Error::ReceiverClosed),
        };

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        queue_tx
            .send(QueuedItem {
                seq,
                state,
                context: context.clone(),
            })
            .map_err(|_| Error::ReceiverClosed)?;
        self.stats.record_enqueued();

        debug!(seq, %state, "Queued USB state");
        Ok(DispatchOutcome::Enqueued(seq))
    }

    fn ignore(&self) -> DispatchOutcome {
        self.stats.record_ignored();
        DispatchOutcome::Ignored
    }

    fn check_idle(queue: &QueueState) -> Result<()> {
        match queue {
            QueueState::Idle => Ok(()),
            QueueState::Open(_) => Err(Error::AlreadyStarted),
            QueueState::Closed => Err(Error::ReceiverClosed),
        }
    }

    fn lock_queue(&self) -> MutexGuard<'_, QueueState> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn lock_worker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MtpReceiver {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}

impl Drop for MtpReceiver {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "MtpReceiver shutdown on drop failed");
        }
    }
}

impl std::fmt::Debug for MtpReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MtpReceiver")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
