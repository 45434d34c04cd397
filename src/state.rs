//! The USB state snapshot and the start/stop decision derived from it.
//!
//! USB 状态快照，以及由其导出的启动/停止决策。

use crate::notification::{
    EXTRA_CONFIGURED, EXTRA_DATA_UNLOCKED, EXTRA_FUNCTION_MTP, EXTRA_FUNCTION_PTP, Extras,
};

/// An immutable record of the USB flags observed at one instant.
///
/// The fields are private and there are no setters: once built, a snapshot
/// is exactly what was captured when the notification arrived.
///
/// 某一时刻观察到的 USB 标志的不可变记录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UsbState {
    connected: bool,
    mtp: bool,
    ptp: bool,
    unlocked: bool,
}

impl UsbState {
    pub const fn new(connected: bool, mtp: bool, ptp: bool, unlocked: bool) -> Self {
        Self {
            connected,
            mtp,
            ptp,
            unlocked,
        }
    }

    /// Extracts a snapshot from notification extras.
    /// Missing or non-boolean values are read as `false`.
    ///
    /// 从通知 extras 中提取快照。缺失或非布尔值按 `false` 处理。
    pub fn from_extras(extras: &Extras) -> Self {
        Self {
            connected: extras.get_bool(EXTRA_CONFIGURED),
            mtp: extras.get_bool(EXTRA_FUNCTION_MTP),
            ptp: extras.get_bool(EXTRA_FUNCTION_PTP),
            unlocked: extras.get_bool(EXTRA_DATA_UNLOCKED),
        }
    }

    pub const fn connected(&self) -> bool {
        self.connected
    }

    pub const fn mtp(&self) -> bool {
        self.mtp
    }

    pub const fn ptp(&self) -> bool {
        self.ptp
    }

    pub const fn unlocked(&self) -> bool {
        self.unlocked
    }

    /// Maps this snapshot to a start or stop decision.
    ///
    /// The transfer service runs iff the link is configured and at least one
    /// of MTP/PTP is enabled. No history is consulted.
    ///
    /// 将此快照映射为启动或停止决策。仅当链路已配置且 MTP/PTP 至少启用一个时才运行传输服务。
    pub const fn decide(&self) -> Decision {
        if self.connected && (self.mtp || self.ptp) {
            Decision::Start(StartRequest {
                unlocked: self.unlocked,
                ptp: self.ptp,
            })
        } else {
            Decision::Stop
        }
    }
}

impl std::fmt::Display for UsbState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "connected = {}, mtpEnabled = {}, ptpEnabled = {}, unlocked = {}",
            self.connected, self.mtp, self.ptp, self.unlocked
        )
    }
}

/// Parameters handed to the service lifecycle manager on start.
///
/// 启动时传递给服务生命周期管理器的参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartRequest {
    /// User data may be exposed.
    pub unlocked: bool,
    /// Run in PTP mode rather than MTP.
    pub ptp: bool,
}

/// Outcome of the state transition logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Start(StartRequest),
    Stop,
}
