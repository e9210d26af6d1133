//! Subscription manager for broadcasting view changes.

use crate::types::ViewSnapshot;
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{
    DropReason, SubscriptionConfig, SubscriptionId, ViewChange, ViewEvent, ViewSubscription,
};

/// Callback invoked with every new view.
pub type ViewListener = Box<dyn FnMut(ViewChange, &ViewSnapshot) + Send>;

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<ViewEvent>,
}

impl Subscription {
    /// Try to send an event. On failure, returns why the subscriber must go.
    fn try_send(&self, event: ViewEvent) -> Option<DropReason> {
        match self.sender.try_send(event) {
            Ok(()) => None,
            Err(TrySendError::Full(_)) => Some(DropReason::BufferOverflow),
            Err(TrySendError::Disconnected(_)) => Some(DropReason::Disconnected),
        }
    }
}

/// Delivers view changes to callbacks and channel subscribers.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Registered callbacks, invoked in registration order.
    listeners: Mutex<Vec<ViewListener>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new channel subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> ViewSubscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        ViewSubscription { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(sub) = self.subscriptions.write().remove(&id) {
            let _ = sub.sender.try_send(ViewEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Register a callback.
    pub fn add_listener(&self, listener: ViewListener) {
        self.listeners.lock().push(listener);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver a new view. Drops subscribers that fail to receive.
    pub fn broadcast(&self, change: ViewChange, snapshot: &ViewSnapshot) {
        for listener in self.listeners.lock().iter_mut() {
            listener(change, snapshot);
        }

        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if !sub.config.wants(change) {
                    continue;
                }
                let event = ViewEvent::Changed {
                    change,
                    snapshot: snapshot.clone(),
                };
                if let Some(reason) = sub.try_send(event) {
                    to_remove.push((*id, reason));
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for (id, reason) in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    debug!(?id, ?reason, "dropping view subscriber");
                    // Might fail when the buffer is still full.
                    let _ = sub.sender.try_send(ViewEvent::Dropped { reason });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
