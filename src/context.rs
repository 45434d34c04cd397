//! The caller context handed in with every notification.

use crate::traits::{DataNotificationSink, ServiceLifecycle, StickyStateSource};
use std::sync::Arc;

/// Handles to the environment a notification should be acted on in.
///
/// Cloning is cheap (three `Arc` increments); each queued item owns its own copy.
///
/// 应在其中处理通知的环境句柄。克隆开销很小，每个排队条目拥有自己的副本。
#[derive(Clone)]
pub struct ReceiverContext {
    services: Arc<dyn ServiceLifecycle>,
    data_sink: Arc<dyn DataNotificationSink>,
    sticky: Arc<dyn StickyStateSource>,
}

impl ReceiverContext {
    pub fn new(
        services: Arc<dyn ServiceLifecycle>,
        data_sink: Arc<dyn DataNotificationSink>,
        sticky: Arc<dyn StickyStateSource>,
    ) -> Self {
        Self {
            services,
            data_sink,
            sticky,
        }
    }

    pub fn services(&self) -> &dyn ServiceLifecycle {
        self.services.as_ref()
    }

    pub fn data_sink(&self) -> &dyn DataNotificationSink {
        self.data_sink.as_ref()
    }

    pub fn sticky(&self) -> &dyn StickyStateSource {
        self.sticky.as_ref()
    }
}

impl std::fmt::Debug for ReceiverContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverContext").finish_non_exhaustive()
    }
}
