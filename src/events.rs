//! Change-notification hub over the record collections.
//!
//! The hosted document store this service replaces pushed live snapshots
//! at its subscribers. Here the store is local, so writes publish an
//! explicit `StoreEvent` through `StoreHub` instead: the lifecycle
//! controller and any embedding UI stay decoupled from the persistence
//! layer and can be tested without a real store.
//!
//! Subscribers hold a bounded mpsc receiver. A slow subscriber loses
//! events (try_send drop) rather than blocking the write path; closed
//! receivers are pruned on the next publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::mpsc;

/// Per-subscriber channel capacity before events are dropped.
const SUBSCRIBER_QUEUE_CAPACITY: usize = 64;

/// The three record collections that publish changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Profiles,
    Appointments,
    Reports,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Profiles => write!(f, "profiles"),
            Self::Appointments => write!(f, "appointments"),
            Self::Reports => write!(f, "reports"),
        }
    }
}

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// A single change notification.
#[derive(Debug, Clone, Serialize)]
pub struct StoreEvent {
    pub collection: Collection,
    pub record_id: String,
    pub action: ChangeAction,
}

struct Subscriber {
    filter: Option<Collection>,
    tx: mpsc::Sender<StoreEvent>,
}

/// Publish/subscribe hub for store changes.
pub struct StoreHub {
    subscribers: Mutex<HashMap<u64, Subscriber>>,
    next_id: AtomicU64,
}

impl StoreHub {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to changes, optionally filtered to one collection.
    ///
    /// Returns the subscription id (for `unsubscribe`) and the receiver.
    pub fn subscribe(
        &self,
        filter: Option<Collection>,
    ) -> (u64, mpsc::Receiver<StoreEvent>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.insert(id, Subscriber { filter, tx });
        }
        (id, rx)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&self, id: u64) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.remove(&id);
        }
    }

    /// Publish a change to every matching subscriber.
    pub fn publish(&self, collection: Collection, record_id: &str, action: ChangeAction) {
        let event = StoreEvent {
            collection,
            record_id: record_id.to_string(),
            action,
        };

        let mut closed = Vec::new();
        if let Ok(subs) = self.subscribers.lock() {
            for (id, sub) in subs.iter() {
                if let Some(filter) = sub.filter {
                    if filter != collection {
                        continue;
                    }
                }
                match sub.tx.try_send(event.clone()) {
                    Ok(()) => (),
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::debug!(subscriber = *id, %collection, "subscriber queue full, event dropped");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*id),
                }
            }
        }

        if !closed.is_empty() {
            if let Ok(mut subs) = self.subscribers.lock() {
                for id in closed {
                    subs.remove(&id);
                }
            }
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for StoreHub {
    fn default() -> Self {
        Self::new()
    }
}
