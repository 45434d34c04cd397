//! The receiver: dispatch entry point, event queue and background worker.
pub mod command;
pub mod handle;
pub mod stats;
mod worker;

pub use command::QueuedItem;
pub use handle::{DispatchOutcome, MtpReceiver};
pub use stats::{ReceiverStats, StatsSnapshot};
