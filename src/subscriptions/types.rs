//! Subscription types for view updates.

use crate::types::ViewSnapshot;

/// Configuration for a channel subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 64
    pub buffer_size: usize,

    /// Only deliver these kinds of change (None = all).
    pub changes: Option<Vec<ViewChange>>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64,
            changes: None,
        }
    }
}

impl SubscriptionConfig {
    /// Subscribe to specific kinds of change.
    pub fn changes(changes: Vec<ViewChange>) -> Self {
        Self {
            changes: Some(changes),
            ..Default::default()
        }
    }

    pub(crate) fn wants(&self, change: ViewChange) -> bool {
        self.changes
            .as_ref()
            .map_or(true, |changes| changes.contains(&change))
    }
}

/// What caused a view to be recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewChange {
    Created,
    Updated,
    Deleted,
    Filtered,
    Sorted,
    Paged,
}

/// Events delivered to channel subscribers.
#[derive(Clone, Debug)]
pub enum ViewEvent {
    /// The visible view changed.
    Changed {
        change: ViewChange,
        snapshot: ViewSnapshot,
    },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver went away.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to a channel subscription.
pub struct ViewSubscription {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<ViewEvent>,
}

impl ViewSubscription {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<ViewEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<ViewEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<ViewEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<ViewEvent> {
        self.receiver.try_iter().collect()
    }
}
