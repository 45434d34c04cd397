//! 定义了接收器的可配置参数。
//! Defines configurable parameters for the receiver.

use std::time::Duration;

/// What the worker does with items still queued when shutdown begins.
///
/// 关闭开始时，工作线程如何处理仍在队列中的条目。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownPolicy {
    /// Process every item that was enqueued before the queue closed, then exit.
    /// 处理队列关闭前入队的所有条目，然后退出。
    #[default]
    Drain,
    /// Drop every item that has not started processing yet, then exit.
    /// The item in flight (if any) always runs to completion.
    ///
    /// 丢弃所有尚未开始处理的条目，然后退出。
    /// 正在处理的条目（如果有）总会执行完毕。
    Discard,
}

/// A structure containing all configurable parameters for an `MtpReceiver`.
///
/// 包含 `MtpReceiver` 所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Name given to the dedicated worker thread.
    /// 专用工作线程的名称。
    pub thread_name: String,

    /// Behaviour for pending items at shutdown.
    /// 关闭时对待处理条目的行为。
    pub shutdown_policy: ShutdownPolicy,

    /// Processing an item for longer than this is logged as a warning.
    /// 处理单个条目超过此时间会记录警告。
    pub slow_item_threshold: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            thread_name: "MtpReceiverThread".to_string(),
            shutdown_policy: ShutdownPolicy::default(),
            slow_item_threshold: Duration::from_millis(500),
        }
    }
}

impl ReceiverConfig {
    /// Returns a copy of this config using the given shutdown policy.
    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }
}
