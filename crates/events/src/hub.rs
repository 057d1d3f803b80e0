//! In-process fan-out of inventory snapshots to live subscribers.
//!
//! - No IO: delivery goes through [`Subscriber`] sinks
//! - Best-effort fan-out; no ordering promise across subscribers
//! - Dead subscribers are pruned lazily, on the first failed delivery

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc};

use crate::subscriber::{Subscriber, Subscription};

/// Opaque handle of one subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl core::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome of one broadcast round.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers that accepted the payload.
    pub delivered: usize,
    /// Subscribers dropped because delivery failed.
    pub pruned: usize,
}

type Sink<M> = Arc<dyn Subscriber<M>>;

/// Concurrently guarded set of subscribers plus a broadcast primitive.
pub struct NotificationHub<M> {
    subscribers: Mutex<HashMap<SubscriberId, Sink<M>>>,
    next_id: AtomicU64,
}

impl<M> core::fmt::Debug for NotificationHub<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<M> Default for NotificationHub<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<M> NotificationHub<M> {
    pub fn new() -> Self {
        Self::default()
    }

    // The map is only ever inserted into or removed from, so a poisoned lock
    // still guards a usable set.
    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriberId, Sink<M>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a sink; it receives every broadcast issued after this returns.
    pub fn subscribe(&self, sink: Arc<dyn Subscriber<M>>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(id, sink);
        tracing::debug!(subscriber = %id, "subscriber added");
        id
    }

    /// Remove a subscriber. Unknown or already-removed ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            tracing::debug!(subscriber = %id, "subscriber removed");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Send `payload` to every current subscriber.
    ///
    /// The set is snapshotted first and the lock released before any
    /// delivery, so subscribers joining mid-broadcast are left out of this
    /// round rather than blocking it. A failing sink never stops delivery to
    /// the others; it is removed afterwards.
    pub fn broadcast(&self, payload: &M) -> BroadcastReport {
        let targets: Vec<(SubscriberId, Sink<M>)> = self
            .lock()
            .iter()
            .map(|(id, sink)| (*id, sink.clone()))
            .collect();

        let mut report = BroadcastReport::default();
        let mut dead = Vec::new();
        for (id, sink) in targets {
            match sink.deliver(payload) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::debug!(subscriber = %id, error = %e, "delivery failed");
                    dead.push(id);
                }
            }
        }

        if !dead.is_empty() {
            let mut subs = self.lock();
            for id in dead {
                if subs.remove(&id).is_some() {
                    report.pruned += 1;
                }
            }
        }

        tracing::debug!(
            delivered = report.delivered,
            pruned = report.pruned,
            "broadcast complete"
        );
        report
    }
}

impl<M> NotificationHub<M>
where
    M: Clone + Send + 'static,
{
    /// Subscribe through an in-process channel.
    pub fn subscribe_channel(&self) -> (SubscriberId, Subscription<M>) {
        let (tx, rx) = mpsc::channel();
        let id = self.subscribe(Arc::new(tx));
        (id, Subscription::new(rx))
    }
}
