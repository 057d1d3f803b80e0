//! Concurrent inventory store.
//!
//! Owns every [`Asset`] and the reservation log. All state lives behind one
//! `RwLock`: mutating operations take the write guard for their whole
//! check-then-mutate, snapshot reads share the read guard. Nothing in here
//! performs IO or knows about notifications; callers decide what to do with a
//! committed outcome.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use thiserror::Error;

use pedalshare_core::{AssetId, Username};

use crate::asset::{Asset, AssetSpec, ReservationRecord};

/// First id handed out by an empty store.
pub const FIRST_ASSET_ID: AssetId = AssetId::new(1);

/// Why an asset could not be removed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RemoveError {
    #[error("bike not found")]
    NotFound,

    #[error("you are not the owner of this bike")]
    NotOwner,

    #[error("bike is currently rented and cannot be removed")]
    CurrentlyRented,
}

#[derive(Debug)]
struct Inventory {
    assets: BTreeMap<AssetId, Asset>,
    reservations: Vec<ReservationRecord>,
    next_id: AssetId,
}

/// Thread-safe inventory of rentable assets.
#[derive(Debug)]
pub struct InventoryStore {
    inner: RwLock<Inventory>,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inventory {
                assets: BTreeMap::new(),
                reservations: Vec::new(),
                next_id: FIRST_ASSET_ID,
            }),
        }
    }

    // Every mutation leaves `Inventory` consistent before anything can panic,
    // so a poisoned guard still protects valid data.
    fn read(&self) -> RwLockReadGuard<'_, Inventory> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inventory> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert pre-built assets (bootstrap only).
    ///
    /// The id counter is moved past the highest seeded id so listed assets
    /// never collide with seeded ones.
    pub fn seed(&self, assets: impl IntoIterator<Item = Asset>) {
        let mut inv = self.write();
        for asset in assets {
            let id = asset.id();
            if id >= inv.next_id {
                inv.next_id = id.next();
            }
            inv.assets.insert(id, asset);
        }
        tracing::debug!(count = inv.assets.len(), "inventory seeded");
    }

    /// List a new asset owned by `owner`. Never fails.
    pub fn list(&self, owner: Username, spec: AssetSpec) -> Asset {
        let mut inv = self.write();
        let id = inv.next_id;
        inv.next_id = id.next();

        let asset = Asset::new(id, owner, spec);
        inv.assets.insert(id, asset.clone());
        asset
    }

    /// Book `asset_id` for `holder`.
    ///
    /// Returns `false` when the asset does not exist or is already held.
    pub fn book(&self, asset_id: AssetId, holder: &Username) -> bool {
        let mut inv = self.write();
        let Some(asset) = inv.assets.get_mut(&asset_id) else {
            return false;
        };
        if !asset.is_available() {
            return false;
        }

        asset.mark_booked(holder.clone());
        inv.reservations.push(ReservationRecord {
            holder: holder.clone(),
            asset_id,
            booked_at: Utc::now(),
        });
        true
    }

    /// Return `asset_id`, which must currently be held by `holder`.
    ///
    /// Returns `false` for a missing asset, an available asset, or a different
    /// holder; state is untouched in all three cases.
    pub fn return_asset(&self, asset_id: AssetId, holder: &Username) -> bool {
        let mut inv = self.write();
        match inv.assets.get_mut(&asset_id) {
            Some(asset) if !asset.is_available() && asset.booked_by() == Some(holder) => {
                asset.mark_returned();
                true
            }
            _ => false,
        }
    }

    /// Remove an available asset owned by `requester`.
    pub fn remove(&self, asset_id: AssetId, requester: &Username) -> Result<(), RemoveError> {
        let mut inv = self.write();
        let asset = inv.assets.get(&asset_id).ok_or(RemoveError::NotFound)?;

        if !asset.is_owned_by(requester) {
            return Err(RemoveError::NotOwner);
        }
        if !asset.is_available() {
            return Err(RemoveError::CurrentlyRented);
        }

        inv.assets.remove(&asset_id);
        Ok(())
    }

    pub fn get(&self, asset_id: AssetId) -> Option<Asset> {
        self.read().assets.get(&asset_id).cloned()
    }

    /// Snapshot of every asset, ordered by id.
    pub fn all_assets(&self) -> Vec<Asset> {
        self.read().assets.values().cloned().collect()
    }

    pub fn available_assets(&self) -> Vec<Asset> {
        self.read()
            .assets
            .values()
            .filter(|a| a.is_available())
            .cloned()
            .collect()
    }

    pub fn assets_owned_by(&self, owner: &Username) -> Vec<Asset> {
        self.read()
            .assets
            .values()
            .filter(|a| a.is_owned_by(owner))
            .cloned()
            .collect()
    }

    /// Snapshot of the reservation log in booking order.
    pub fn reservations(&self) -> Vec<ReservationRecord> {
        self.read().reservations.clone()
    }

    pub fn len(&self) -> usize {
        self.read().assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().assets.is_empty()
    }
}
