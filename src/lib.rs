#![deny(clippy::expect_used, clippy::unwrap_used)]

//! Keeps an MTP/PTP transfer service in step with the USB link state.
//! 使 MTP/PTP 传输服务与 USB 链路状态保持同步。
//!
//! Platform notifications are handed to [`MtpReceiver::on_receive`], which
//! validates them into a [`UsbState`] snapshot and queues it without blocking.
//! A dedicated worker thread drains the queue in order and starts or stops the
//! service through the [`ServiceLifecycle`] and [`DataNotificationSink`] traits.

pub mod config;
pub mod context;
pub mod error;
pub mod notification;
pub mod receiver;
pub mod state;
pub mod traits;

mod testing;

pub use config::{ReceiverConfig, ShutdownPolicy};
pub use context::ReceiverContext;
pub use error::{Error, Result};
pub use notification::{Action, ExtraValue, Extras, Notification};
pub use receiver::{DispatchOutcome, MtpReceiver, StatsSnapshot};
pub use state::{Decision, StartRequest, UsbState};
pub use traits::{DataNotificationSink, ServiceLifecycle, StickyStateSource};
