//! Raw notifications as delivered by the platform, before validation.
//!
//! A notification is an action identifier plus a loosely typed bag of extras.
//! Nothing here is trusted: `UsbState::from_extras` reads the flags it needs
//! and treats anything missing or mistyped as `false`.
//!
//! 平台投递的原始通知（尚未校验）。

use std::collections::HashMap;

/// Action broadcast once the system has finished booting.
pub const ACTION_BOOT_COMPLETED: &str = "android.intent.action.BOOT_COMPLETED";
/// Action broadcast whenever the USB state changes.
pub const ACTION_USB_STATE: &str = "android.hardware.usb.action.USB_STATE";

/// Extra: the USB link is configured by the host.
pub const EXTRA_CONFIGURED: &str = "configured";
/// Extra: the MTP function is enabled.
pub const EXTRA_FUNCTION_MTP: &str = "mtp";
/// Extra: the PTP function is enabled.
pub const EXTRA_FUNCTION_PTP: &str = "ptp";
/// Extra: user data is unlocked and may be exposed over USB.
pub const EXTRA_DATA_UNLOCKED: &str = "unlocked";

/// The kind of notification, parsed from its action string.
///
/// 通知的类型，由其 action 字符串解析而来。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The system is ready; current state must be pulled.
    /// 系统就绪，需要主动拉取当前状态。
    BootCompleted,
    /// The USB state changed; the new state is in the extras.
    /// USB 状态已改变，新状态在 extras 中。
    UsbState,
    /// Anything else. Ignored by the receiver.
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::BootCompleted => ACTION_BOOT_COMPLETED,
            Action::UsbState => ACTION_USB_STATE,
            Action::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            ACTION_BOOT_COMPLETED => Action::BootCompleted,
            ACTION_USB_STATE => Action::UsbState,
            other => Action::Other(other.to_string()),
        }
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        Action::from(s.as_str())
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extra value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for ExtraValue {
    fn from(v: bool) -> Self {
        ExtraValue::Bool(v)
    }
}

impl From<i64> for ExtraValue {
    fn from(v: i64) -> Self {
        ExtraValue::Int(v)
    }
}

impl From<&str> for ExtraValue {
    fn from(v: &str) -> Self {
        ExtraValue::Str(v.to_string())
    }
}

/// Key/value attributes attached to a notification.
///
/// 附加在通知上的键值属性。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extras {
    values: HashMap<String, ExtraValue>,
}

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ExtraValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw access to an extra, whatever its type.
    pub fn get(&self, key: &str) -> Option<&ExtraValue> {
        self.values.get(key)
    }

    /// Reads a boolean extra. Missing keys and non-boolean values yield `false`.
    ///
    /// 读取布尔类型的 extra。缺失的键和非布尔值都返回 `false`。
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(ExtraValue::Bool(true)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A raw notification: action plus extras.
///
/// 原始通知：action 加上 extras。
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub action: Action,
    pub extras: Extras,
}

impl Notification {
    pub fn new(action: impl Into<Action>, extras: Extras) -> Self {
        Self {
            action: action.into(),
            extras,
        }
    }

    /// A `BOOT_COMPLETED` notification. It carries no payload.
    pub fn boot_completed() -> Self {
        Self::new(Action::BootCompleted, Extras::new())
    }

    /// A `USB_STATE` notification with the four standard flags set.
    pub fn usb_state(connected: bool, mtp: bool, ptp: bool, unlocked: bool) -> Self {
        let extras = Extras::new()
            .with(EXTRA_CONFIGURED, connected)
            .with(EXTRA_FUNCTION_MTP, mtp)
            .with(EXTRA_FUNCTION_PTP, ptp)
            .with(EXTRA_DATA_UNLOCKED, unlocked);
        Self::new(Action::UsbState, extras)
    }
}
