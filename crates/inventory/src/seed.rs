//! Bootstrap fleet loaded into a fresh inventory.

use pedalshare_core::{AssetId, Username};

use crate::asset::{Asset, AssetSpec};

const DEFAULT_PHOTO: &str = "https://i.imgur.com/83S9Q4q.jpeg";

/// Owner of every seeded bike.
pub const SEED_OWNER: &str = "admin";

/// The four demo bikes (ids 101..=104), all owned by [`SEED_OWNER`] and available.
pub fn default_fleet() -> Vec<Asset> {
    [
        (101, "Mountain Bike", "Alpha", 2023, 25.0, DEFAULT_PHOTO),
        (102, "Electric Bike", "Beta", 2024, 40.0, "https://i.imgur.com/qc3Q1sP.jpeg"),
        (103, "Road Bike", "Gamma", 2022, 30.0, "https://i.imgur.com/fFVLwD9.jpeg"),
        (104, "Mountain Bike", "Delta", 2023, 25.0, DEFAULT_PHOTO),
    ]
    .into_iter()
    .map(|(id, model, location, model_year, rent_rate, photo)| {
        Asset::new(
            AssetId::new(id),
            Username::from(SEED_OWNER),
            AssetSpec {
                model: model.to_string(),
                location: location.to_string(),
                model_year,
                rent_rate,
                contact_number: "555-1234".to_string(),
                photo_url: photo.to_string(),
            },
        )
    })
    .collect()
}
