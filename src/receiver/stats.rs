//! 接收器统计信息
//! Receiver statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the dispatching side and the worker.
///
/// 分派端与工作线程共享的计数器。
#[derive(Debug, Default)]
pub struct ReceiverStats {
    enqueued: AtomicU64,
    ignored: AtomicU64,
    processed: AtomicU64,
    discarded: AtomicU64,
    start_failures: AtomicU64,
    stop_failures: AtomicU64,
    sink_failures: AtomicU64,
    panics: AtomicU64,
}

impl ReceiverStats {
    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_start_failure(&self) {
        self.start_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stop_failure(&self) {
        self.stop_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_panic(&self) {
        self.panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of all counters.
    ///
    /// 获取所有计数器的时间点副本。
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Acquire),
            discarded: self.discarded.load(Ordering::Acquire),
            start_failures: self.start_failures.load(Ordering::Relaxed),
            stop_failures: self.stop_failures.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
        }
    }
}

/// 接收器统计快照
/// Receiver statistics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// 入队的条目数
    /// Items accepted into the queue
    pub enqueued: u64,
    /// 未入队即被忽略的通知数
    /// Notifications dropped at dispatch without enqueueing
    pub ignored: u64,
    /// 已处理的条目数
    /// Items the worker ran the decision and side effects for
    pub processed: u64,
    /// 关闭时丢弃的条目数
    /// Items dropped at shutdown under `ShutdownPolicy::Discard`
    pub discarded: u64,
    pub start_failures: u64,
    pub stop_failures: u64,
    pub sink_failures: u64,
    /// 协作者 panic 的次数
    /// Collaborator panics caught by the worker
    pub panics: u64,
}

impl StatsSnapshot {
    /// Items enqueued but not yet processed or discarded.
    pub fn pending(&self) -> u64 {
        self.enqueued
            .saturating_sub(self.processed)
            .saturating_sub(self.discarded)
    }
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ReceiverStats {{ enqueued: {}, ignored: {}, processed: {}, discarded: {}, failures: start={} stop={} sink={}, panics: {} }}",
            self.enqueued,
            self.ignored,
            self.processed,
            self.discarded,
            self.start_failures,
            self.stop_failures,
            self.sink_failures,
            self.panics
        )
    }
}
