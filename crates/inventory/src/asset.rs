use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pedalshare_core::{AssetId, Username};

/// Descriptive fields a lister supplies when putting a bike up for rent.
///
/// The owner is deliberately absent: it is always the authenticated caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSpec {
    pub model: String,
    pub location: String,
    pub model_year: i32,
    pub rent_rate: f64,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub photo_url: String,
}

/// A rentable bike.
///
/// `booked_by` and `is_available` always agree: a bike has a holder exactly
/// when it is not available. Only [`crate::InventoryStore`] flips them, through
/// `mark_booked` / `mark_returned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    id: AssetId,
    model: String,
    location: String,
    owner: Username,
    model_year: i32,
    rent_rate: f64,
    contact_number: String,
    photo_url: String,
    is_available: bool,
    booked_by: Option<Username>,
}

impl Asset {
    /// A freshly listed asset: available, no holder.
    pub fn new(id: AssetId, owner: Username, spec: AssetSpec) -> Self {
        Self {
            id,
            model: spec.model,
            location: spec.location,
            owner,
            model_year: spec.model_year,
            rent_rate: spec.rent_rate,
            contact_number: spec.contact_number,
            photo_url: spec.photo_url,
            is_available: true,
            booked_by: None,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn owner(&self) -> &Username {
        &self.owner
    }

    pub fn model_year(&self) -> i32 {
        self.model_year
    }

    pub fn rent_rate(&self) -> f64 {
        self.rent_rate
    }

    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    pub fn photo_url(&self) -> &str {
        &self.photo_url
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn booked_by(&self) -> Option<&Username> {
        self.booked_by.as_ref()
    }

    pub fn is_owned_by(&self, user: &Username) -> bool {
        &self.owner == user
    }

    /// Rebuild the descriptive part of this asset.
    pub fn spec(&self) -> AssetSpec {
        AssetSpec {
            model: self.model.clone(),
            location: self.location.clone(),
            model_year: self.model_year,
            rent_rate: self.rent_rate,
            contact_number: self.contact_number.clone(),
            photo_url: self.photo_url.clone(),
        }
    }

    pub(crate) fn mark_booked(&mut self, holder: Username) {
        self.is_available = false;
        self.booked_by = Some(holder);
    }

    pub(crate) fn mark_returned(&mut self) {
        self.is_available = true;
        self.booked_by = None;
    }
}

/// Append-only log entry written once per successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    pub holder: Username,
    pub asset_id: AssetId,
    pub booked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> AssetSpec {
        AssetSpec {
            model: "Road Bike".to_string(),
            location: "Gamma".to_string(),
            model_year: 2022,
            rent_rate: 30.0,
            contact_number: "555-1234".to_string(),
            photo_url: "https://i.imgur.com/fFVLwD9.jpeg".to_string(),
        }
    }

    #[test]
    fn wire_format_uses_camel_case_field_names() {
        let asset = Asset::new(AssetId::new(103), Username::from("admin"), spec());
        let json = serde_json::to_value(&asset).unwrap();

        assert_eq!(json["id"], 103);
        assert_eq!(json["modelYear"], 2022);
        assert_eq!(json["rentRate"], 30.0);
        assert_eq!(json["contactNumber"], "555-1234");
        assert_eq!(json["isAvailable"], true);
        assert!(json["bookedBy"].is_null());
    }

    #[test]
    fn booking_flags_move_together() {
        let mut asset = Asset::new(AssetId::new(1), Username::from("carol"), spec());

        asset.mark_booked(Username::from("alice"));
        assert!(!asset.is_available());
        assert_eq!(asset.booked_by().map(Username::as_str), Some("alice"));

        asset.mark_returned();
        assert!(asset.is_available());
        assert!(asset.booked_by().is_none());
    }

    #[test]
    fn spec_missing_optional_contact_fields_still_parses() {
        let parsed: AssetSpec = serde_json::from_str(
            r#"{"model":"X","location":"Y","modelYear":2020,"rentRate":12.5}"#,
        )
        .unwrap();
        assert_eq!(parsed.contact_number, "");
        assert_eq!(parsed.photo_url, "");
    }
}
