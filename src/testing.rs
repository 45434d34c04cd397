//! 测试辅助工具模块
//! Test utilities module

#![cfg(test)]

use crate::{
    context::ReceiverContext,
    error::{Error, Result},
    notification::Notification,
    state::StartRequest,
    traits::{DataNotificationSink, ServiceLifecycle, StickyStateSource},
};
use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

/// A call observed by the mock collaborators, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(StartRequest),
    Stop,
    NotifyConnected,
    NotifyDisconnected,
}

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<Call>>,
    running: AtomicBool,
    fail_start: AtomicBool,
    fail_stop: AtomicBool,
    fail_sink: AtomicBool,
    panic_on_start: AtomicBool,
    panic_on_stop: AtomicBool,
    sticky: Mutex<Option<Notification>>,
}

/// Mock service manager, data sink and sticky source sharing one call log.
#[derive(Clone, Default)]
pub struct MockEnv {
    inner: Arc<Inner>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> ReceiverContext {
        let env = Arc::new(self.clone());
        ReceiverContext::new(env.clone(), env.clone(), env)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn fail_start(&self, fail: bool) {
        self.inner.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn fail_stop(&self, fail: bool) {
        self.inner.fail_stop.store(fail, Ordering::SeqCst);
    }

    /// Makes both data-layer notifications fail after being recorded.
    pub fn fail_sink(&self, fail: bool) {
        self.inner.fail_sink.store(fail, Ordering::SeqCst);
    }

    /// The call is recorded, then the mock panics.
    pub fn panic_on_start(&self, panic: bool) {
        self.inner.panic_on_start.store(panic, Ordering::SeqCst);
    }

    pub fn panic_on_stop(&self, panic: bool) {
        self.inner.panic_on_stop.store(panic, Ordering::SeqCst);
    }

    pub fn set_sticky(&self, notification: Option<Notification>) {
        *self.inner.sticky.lock().unwrap() = notification;
    }

    fn record(&self, call: Call) {
        self.inner.calls.lock().unwrap().push(call);
    }

    fn sink_result(&self) -> Result<()> {
        if self.inner.fail_sink.load(Ordering::SeqCst) {
            return Err(Error::DataSink("mock sink failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceLifecycle for MockEnv {
    async fn start(&self, request: StartRequest) -> Result<()> {
        self.record(Call::Start(request));
        if self.inner.panic_on_start.load(Ordering::SeqCst) {
            panic!("mock service panicked on start");
        }
        if self.inner.fail_start.load(Ordering::SeqCst) {
            return Err(Error::ServiceStart("mock start failure".into()));
        }
        self.inner.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<bool> {
        self.record(Call::Stop);
        if self.inner.panic_on_stop.load(Ordering::SeqCst) {
            panic!("mock service panicked on stop");
        }
        if self.inner.fail_stop.load(Ordering::SeqCst) {
            return Err(Error::ServiceStop("mock stop failure".into()));
        }
        Ok(self.inner.running.swap(false, Ordering::SeqCst))
    }
}

#[async_trait]
impl DataNotificationSink for MockEnv {
    async fn notify_connected(&self) -> Result<()> {
        self.record(Call::NotifyConnected);
        self.sink_result()
    }

    async fn notify_disconnected(&self) -> Result<()> {
        self.record(Call::NotifyDisconnected);
        self.sink_result()
    }
}

impl StickyStateSource for MockEnv {
    fn current_usb_state(&self) -> Option<Notification> {
        self.inner.sticky.lock().unwrap().clone()
    }
}
