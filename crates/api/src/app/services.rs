use std::sync::Arc;

use chrono::Duration;

use pedalshare_auth::{Hs256Jwt, IdentityStore, JwtValidator, TokenIssuer};
use pedalshare_infra::{AppConfig, RentalCoordinator, SnapshotHub};
use pedalshare_inventory::{InventoryStore, default_fleet};

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppServices {
    pub coordinator: RentalCoordinator,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl core::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppServices")
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

/// Wire the stores, hub and token service from configuration.
///
/// Returns the validator separately so the auth middleware can own its copy.
pub fn build_services(config: &AppConfig) -> (AppServices, Arc<dyn JwtValidator>) {
    let inventory = Arc::new(InventoryStore::new());
    if config.seed_inventory {
        inventory.seed(default_fleet());
        tracing::info!(assets = inventory.len(), "demo fleet loaded");
    }

    let coordinator = RentalCoordinator::new(
        inventory,
        Arc::new(IdentityStore::with_seed_users()),
        Arc::new(SnapshotHub::new()),
    );

    let jwt = Arc::new(Hs256Jwt::with_ttl(
        config.jwt_secret.as_bytes(),
        Duration::minutes(config.token_ttl_minutes),
    ));

    let tokens: Arc<dyn TokenIssuer> = jwt.clone();
    let validator: Arc<dyn JwtValidator> = jwt;

    (AppServices { coordinator, tokens }, validator)
}
