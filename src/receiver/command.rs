//! Items carried by the receiver's event queue.

use crate::{context::ReceiverContext, state::UsbState};

/// One unit of work for the worker: a snapshot plus the context to act on it in.
///
/// Owned by the queue until dequeued, then by the worker until processed.
///
/// 工作线程的一个工作单元：一个快照加上处理它所需的上下文。
#[derive(Debug)]
pub struct QueuedItem {
    /// Enqueue order, assigned under the queue lock.
    /// 入队顺序，在队列锁内分配。
    pub seq: u64,
    pub state: UsbState,
    pub context: ReceiverContext,
}
