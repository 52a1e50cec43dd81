// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Store events: how UI surfaces learn that search history changed.
//!
//! A history widget and a suggestion dropdown both watch the same store, so
//! mutations broadcast to every subscriber. Delivery rules:
//!
//! - listeners run in registration order, on the thread that mutated,
//! - a panicking listener is logged and skipped, never poisoning the others
//!   or the mutating call,
//! - unsubscribing takes effect for the next event.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;

use crate::types::HistoryEntry;

/// What changed in the history store.
///
/// `HistoryUpdated` carries the full post-mutation snapshot (newest first):
/// at 50 entries max, handing subscribers the list beats making each of them
/// call back into the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    HistoryUpdated { history: Vec<HistoryEntry> },
    HistoryCleared,
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
///
/// Ids are never reused within a bus, so a stale handle unsubscribes nothing
/// instead of someone else's listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Ordered broadcast list with panic isolation.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    /// Register a listener; it will see every event emitted after this call.
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    /// How many listeners are currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Deliver `event` to every subscriber in registration order.
    ///
    /// The subscriber list is snapshotted before delivery, so listeners may
    /// subscribe or unsubscribe from inside their callback without
    /// deadlocking; such changes apply from the next event on.
    pub fn emit(&self, event: &StoreEvent) {
        let listeners: Vec<Listener> = self
            .inner
            .lock()
            .subscribers
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener(event)
            })) {
                error!(
                    "store event listener panicked: {:?}",
                    e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
                );
            }
        }
    }
}
