//! Rental use cases (application-level orchestration).
//!
//! The coordinator sequences calls into the stores and owns no inventory state.
//! Mutating inventory use cases follow one pattern:
//!
//! ```text
//! use case
//!   ↓
//! 1. Inventory store transition (atomic, lock released on return)
//!   ↓
//! 2. On success, under the publish lock:
//!      serialize the full asset snapshot, then hub broadcast
//!      (best effort, result only logged)
//! ```
//!
//! The use case result is decided by step 1 alone. Step 2 is serialized so a
//! snapshot taken earlier is never delivered after one taken later; the last
//! payload a subscriber receives always matches the committed state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pedalshare_auth::IdentityStore;
use pedalshare_core::{AssetId, Username};
use pedalshare_events::{NotificationHub, Subscriber, SubscriberId};
use pedalshare_inventory::{Asset, AssetSpec, InventoryStore, RemoveError, ReservationRecord};

use crate::codec::{Codec, CodecError, JsonCodec};

/// Broadcast payload: serialized snapshot of every asset.
pub type SnapshotPayload = Arc<str>;

/// Hub type carrying inventory snapshots.
pub type SnapshotHub = NotificationHub<SnapshotPayload>;

/// Façade over the inventory store, identity store and notification hub.
#[derive(Debug)]
pub struct RentalCoordinator<C = JsonCodec> {
    inventory: Arc<InventoryStore>,
    identities: Arc<IdentityStore>,
    hub: Arc<SnapshotHub>,
    codec: C,
    // Orders snapshot-then-broadcast rounds. Never held across a store mutation.
    publish: Mutex<()>,
}

impl RentalCoordinator<JsonCodec> {
    pub fn new(
        inventory: Arc<InventoryStore>,
        identities: Arc<IdentityStore>,
        hub: Arc<SnapshotHub>,
    ) -> Self {
        Self::with_codec(inventory, identities, hub, JsonCodec)
    }
}

impl<C: Codec> RentalCoordinator<C> {
    pub fn with_codec(
        inventory: Arc<InventoryStore>,
        identities: Arc<IdentityStore>,
        hub: Arc<SnapshotHub>,
        codec: C,
    ) -> Self {
        Self {
            inventory,
            identities,
            hub,
            codec,
            publish: Mutex::new(()),
        }
    }

    pub fn hub(&self) -> &Arc<SnapshotHub> {
        &self.hub
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────

    pub fn login(&self, username: &Username, secret: &str) -> bool {
        let ok = self.identities.verify_credentials(username, secret);
        if !ok {
            tracing::info!(username = %username, "login rejected");
        }
        ok
    }

    pub fn register(&self, username: &Username, secret: &str) -> bool {
        self.identities.register(username, secret)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inventory (mutating)
    // ─────────────────────────────────────────────────────────────────────

    pub fn list_asset(&self, owner: Username, spec: AssetSpec) -> Asset {
        let asset = self.inventory.list(owner, spec);
        tracing::info!(asset_id = %asset.id(), owner = %asset.owner(), "bike listed");
        self.publish_snapshot();
        asset
    }

    pub fn book(&self, asset_id: AssetId, holder: &Username) -> bool {
        let booked = self.inventory.book(asset_id, holder);
        if booked {
            tracing::info!(asset_id = %asset_id, holder = %holder, "bike booked");
            self.publish_snapshot();
        }
        booked
    }

    pub fn return_asset(&self, asset_id: AssetId, holder: &Username) -> bool {
        let returned = self.inventory.return_asset(asset_id, holder);
        if returned {
            tracing::info!(asset_id = %asset_id, holder = %holder, "bike returned");
            self.publish_snapshot();
        }
        returned
    }

    pub fn remove_asset(&self, asset_id: AssetId, requester: &Username) -> Result<(), RemoveError> {
        self.inventory.remove(asset_id, requester)?;
        tracing::info!(asset_id = %asset_id, owner = %requester, "bike removed");
        self.publish_snapshot();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inventory (queries)
    // ─────────────────────────────────────────────────────────────────────

    pub fn all_assets(&self) -> Vec<Asset> {
        self.inventory.all_assets()
    }

    pub fn available_assets(&self) -> Vec<Asset> {
        self.inventory.available_assets()
    }

    pub fn assets_owned_by(&self, owner: &Username) -> Vec<Asset> {
        self.inventory.assets_owned_by(owner)
    }

    pub fn get_asset(&self, asset_id: AssetId) -> Option<Asset> {
        self.inventory.get(asset_id)
    }

    pub fn reservations(&self) -> Vec<ReservationRecord> {
        self.inventory.reservations()
    }

    /// Current inventory serialized the same way broadcasts are.
    pub fn snapshot_payload(&self) -> Result<SnapshotPayload, CodecError> {
        let text = self.codec.serialize(&self.inventory.all_assets())?;
        Ok(Arc::from(text))
    }

    /// Subscribe `sink` and hand it the current snapshot straight away.
    ///
    /// Runs under the publish lock, so the first payload the sink sees is not
    /// older than any broadcast it receives afterwards. A sink that refuses the
    /// first payload is unsubscribed again.
    pub fn attach(&self, sink: Arc<dyn Subscriber<SnapshotPayload>>) -> SubscriberId {
        let _publishing = self.publish_guard();
        let id = self.hub.subscribe(sink.clone());

        match self.snapshot_payload() {
            Ok(payload) => {
                if sink.deliver(&payload).is_err() {
                    self.hub.unsubscribe(id);
                }
            }
            Err(e) => tracing::warn!(subscriber = %id, error = %e, "initial snapshot unavailable"),
        }
        id
    }

    // Guards `()`, so a poisoned lock carries no broken state.
    fn publish_guard(&self) -> MutexGuard<'_, ()> {
        self.publish.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push the full snapshot to every subscriber.
    ///
    /// Called after the store lock is released. Failures are logged and
    /// swallowed.
    fn publish_snapshot(&self) {
        let _publishing = self.publish_guard();
        match self.snapshot_payload() {
            Ok(payload) => {
                let report = self.hub.broadcast(&payload);
                tracing::debug!(
                    delivered = report.delivered,
                    pruned = report.pruned,
                    "inventory snapshot broadcast"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "inventory snapshot could not be serialized");
            }
        }
    }
}
