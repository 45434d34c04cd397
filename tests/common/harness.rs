//! tests/common/harness.rs
#![allow(dead_code)]

use async_trait::async_trait;
use mtp_receiver::{
    DataNotificationSink, Notification, ReceiverContext, Result, ServiceLifecycle, StartRequest,
    StickyStateSource,
};
use std::sync::{Arc, Mutex, Once, mpsc};
use std::time::Duration;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "mtp_receiver=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Start(StartRequest),
    Stop,
    NotifyConnected,
    NotifyDisconnected,
}

/// A call plus the tag of the context it was made through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    pub tag: usize,
    pub call: Call,
}

pub type CallLog = Arc<Mutex<Vec<Recorded>>>;

/// Blocks the first `start` call until the test releases it.
pub struct Gate {
    entered_tx: mpsc::Sender<()>,
    release_rx: mpsc::Receiver<()>,
}

/// Test side of a [`Gate`].
pub struct GateControl {
    entered_rx: mpsc::Receiver<()>,
    release_tx: mpsc::Sender<()>,
}

impl GateControl {
    /// Waits until the worker is blocked inside `start`.
    pub fn wait_entered(&self) {
        self.entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker never reached the gated start call");
    }

    pub fn release(&self) {
        self.release_tx.send(()).expect("gate dropped");
    }
}

pub fn gate() -> (Gate, GateControl) {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    (
        Gate {
            entered_tx,
            release_rx,
        },
        GateControl {
            entered_rx,
            release_tx,
        },
    )
}

/// Records every collaborator call into a shared log.
pub struct Recorder {
    tag: usize,
    log: CallLog,
    delay: Duration,
    gate: Mutex<Option<Gate>>,
    sticky: Option<Notification>,
}

impl Recorder {
    pub fn new(tag: usize, log: CallLog) -> Self {
        Self {
            tag,
            log,
            delay: Duration::ZERO,
            gate: Mutex::new(None),
            sticky: None,
        }
    }

    /// Every `start` and `stop` sleeps for `delay` first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_gate(self, gate: Gate) -> Self {
        *self.gate.lock().unwrap() = Some(gate);
        self
    }

    pub fn with_sticky(mut self, sticky: Notification) -> Self {
        self.sticky = Some(sticky);
        self
    }

    pub fn into_context(self) -> ReceiverContext {
        let this = Arc::new(self);
        ReceiverContext::new(this.clone(), this.clone(), this)
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(Recorded {
            tag: self.tag,
            call,
        });
    }

    async fn slow_down(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ServiceLifecycle for Recorder {
    async fn start(&self, request: StartRequest) -> Result<()> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.entered_tx.send(());
            let _ = gate.release_rx.recv();
        }
        self.slow_down().await;
        self.record(Call::Start(request));
        Ok(())
    }

    async fn stop(&self) -> Result<bool> {
        self.slow_down().await;
        self.record(Call::Stop);
        Ok(false)
    }
}

#[async_trait]
impl DataNotificationSink for Recorder {
    async fn notify_connected(&self) -> Result<()> {
        self.record(Call::NotifyConnected);
        Ok(())
    }

    async fn notify_disconnected(&self) -> Result<()> {
        self.record(Call::NotifyDisconnected);
        Ok(())
    }
}

impl StickyStateSource for Recorder {
    fn current_usb_state(&self) -> Option<Notification> {
        self.sticky.clone()
    }
}

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().iter().map(|r| r.call).collect()
}
