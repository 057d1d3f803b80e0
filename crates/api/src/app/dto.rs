use serde::Deserialize;

use pedalshare_core::{AssetId, DomainError, DomainResult, Username};
use pedalshare_inventory::AssetSpec;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    /// Registration needs both fields; login simply fails verification.
    pub fn validate(self) -> DomainResult<(Username, String)> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(DomainError::validation("Username and password are required."));
        }
        Ok((Username::from(username), self.password))
    }

    pub fn into_parts(self) -> (Username, String) {
        (Username::from(self.username.trim()), self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeIdRequest {
    pub bike_id: AssetId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBikeRequest {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub model_year: i32,
    #[serde(default)]
    pub rent_rate: f64,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub photo_url: String,
}

impl ListBikeRequest {
    pub fn into_spec(self) -> DomainResult<AssetSpec> {
        if self.model.trim().is_empty() || self.location.trim().is_empty() {
            return Err(DomainError::validation("Model and location are required."));
        }
        if !self.rent_rate.is_finite() || self.rent_rate < 0.0 {
            return Err(DomainError::validation("Rent rate must be a non-negative number."));
        }
        Ok(AssetSpec {
            model: self.model.trim().to_string(),
            location: self.location.trim().to_string(),
            model_year: self.model_year,
            rent_rate: self.rent_rate,
            contact_number: self.contact_number,
            photo_url: self.photo_url,
        })
    }
}
