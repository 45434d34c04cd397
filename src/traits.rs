//! Traits for the collaborators the receiver drives.
//!
//! These are the only seams to the outside world: the service manager that
//! owns the transfer service, the data layer that binds to it, and the
//! platform's record of the latest USB state.
//!
//! 接收器所驱动的外部协作者的 trait。
use crate::{error::Result, notification::Notification, state::StartRequest};
use async_trait::async_trait;

/// Owner of the dependent transfer service.
///
/// Both operations may be called repeatedly with no call of the other in
/// between; implementations must treat a redundant start or stop as a no-op.
///
/// 依赖的传输服务的拥有者。两个操作都可能被重复调用，实现必须将多余的启动或停止视为空操作。
#[async_trait]
pub trait ServiceLifecycle: Send + Sync + 'static {
    /// Starts (or re-configures) the transfer service.
    async fn start(&self, request: StartRequest) -> Result<()>;

    /// Stops the transfer service. Returns whether a running instance was stopped.
    async fn stop(&self) -> Result<bool>;
}

/// The shared data layer, told when it may bind to or unbind from the service.
///
/// 共享数据层，在其可以绑定或解绑服务时得到通知。
#[async_trait]
pub trait DataNotificationSink: Send + Sync + 'static {
    async fn notify_connected(&self) -> Result<()>;

    async fn notify_disconnected(&self) -> Result<()>;
}

/// Source of the most recent USB state notification, queried at boot.
///
/// Called on the dispatching thread, so it must not block.
///
/// 最近一次 USB 状态通知的来源，在启动完成时查询。它在分派线程上调用，因此不能阻塞。
pub trait StickyStateSource: Send + Sync + 'static {
    fn current_usb_state(&self) -> Option<Notification>;
}
