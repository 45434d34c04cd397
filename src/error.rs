//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use thiserror::Error;

/// The primary error type for the MTP receiver library.
/// MTP 接收器库的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// A notification was dispatched before `start()` was called.
    /// 在调用 `start()` 之前分派了通知。
    #[error("receiver has not been started")]
    NotStarted,

    /// `start()` was called on a receiver that already owns a worker.
    /// 对已经拥有工作线程的接收器调用了 `start()`。
    #[error("receiver is already started")]
    AlreadyStarted,

    /// The event queue has been closed; no further items are accepted.
    /// 事件队列已关闭，不再接受新的条目。
    #[error("receiver is shutting down or has been shut down")]
    ReceiverClosed,

    /// The worker thread or its runtime could not be created.
    /// 无法创建工作线程或其运行时。
    #[error("failed to spawn receiver worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    /// The worker thread terminated by panicking.
    /// 工作线程因 panic 而终止。
    #[error("receiver worker panicked")]
    WorkerPanicked,

    /// The service lifecycle manager failed to start the transfer service.
    /// 服务生命周期管理器启动传输服务失败。
    #[error("failed to start transfer service: {0}")]
    ServiceStart(String),

    /// The service lifecycle manager failed to stop the transfer service.
    /// 服务生命周期管理器停止传输服务失败。
    #[error("failed to stop transfer service: {0}")]
    ServiceStop(String),

    /// The data notification sink rejected a connect/disconnect signal.
    /// 数据通知接收端拒绝了连接/断开信号。
    #[error("data notification sink error: {0}")]
    DataSink(String),
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::WorkerSpawn(e) => e,
            Error::NotStarted => ErrorKind::NotConnected.into(),
            Error::AlreadyStarted => ErrorKind::AlreadyExists.into(),
            Error::ReceiverClosed => ErrorKind::BrokenPipe.into(),
            Error::WorkerPanicked => std::io::Error::other("receiver worker panicked"),
            Error::ServiceStart(msg) | Error::ServiceStop(msg) | Error::DataSink(msg) => {
                std::io::Error::other(msg)
            }
        }
    }
}
