//! Property types
//!
//! Properties are read-only to the booking flow; only their address is
//! snapshotted onto meetings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{OpenHouseError, Result};

/// Listing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Pending,
    Sold,
    OffMarket,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
            Self::OffMarket => "off_market",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "sold" => Ok(Self::Sold),
            "off_market" => Ok(Self::OffMarket),
            other => {
                Err(OpenHouseError::InvalidInput(format!("unknown property status: {other}")))
            }
        }
    }
}

/// Property record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub address: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft: u32,
    pub media: Vec<String>,
    pub property_type: String,
    pub status: PropertyStatus,
    pub year_built: Option<i32>,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_status() -> PropertyStatus {
    PropertyStatus::Available
}

/// Fields accepted when listing a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub address: String,
    pub price: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f64,
    #[serde(default)]
    pub sqft: u32,
    #[serde(default)]
    pub media: Vec<String>,
    pub property_type: String,
    #[serde(default = "default_status")]
    pub status: PropertyStatus,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl NewProperty {
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(OpenHouseError::InvalidInput("property address is required".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(OpenHouseError::InvalidInput(format!(
                "property price must be non-negative, got {}",
                self.price
            )));
        }
        if !self.bathrooms.is_finite() || self.bathrooms < 0.0 {
            return Err(OpenHouseError::InvalidInput("bathrooms must be non-negative".into()));
        }
        Ok(())
    }

    pub fn into_property(self) -> Property {
        let now = Utc::now();
        Property {
            id: Uuid::new_v4().to_string(),
            address: self.address,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            sqft: self.sqft,
            media: self.media,
            property_type: self.property_type,
            status: self.status,
            year_built: self.year_built,
            features: self.features,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyUpdate {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub sqft: Option<u32>,
    #[serde(default)]
    pub media: Option<Vec<String>>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// List filter for properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyFilter {
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_bedrooms: Option<u32>,
}

/// Slimmed property view embedded in booking responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySummary {
    pub id: String,
    pub address: String,
    pub price: f64,
    pub property_type: String,
    pub status: PropertyStatus,
}

impl From<&Property> for PropertySummary {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            address: property.address.clone(),
            price: property.price,
            property_type: property.property_type.clone(),
            status: property.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> NewProperty {
        NewProperty {
            address: "1 Main St".into(),
            price: 450_000.0,
            bedrooms: 3,
            bathrooms: 2.5,
            sqft: 1800,
            media: vec![],
            property_type: "house".into(),
            status: PropertyStatus::Available,
            year_built: Some(1998),
            features: vec!["garage".into()],
        }
    }

    #[test]
    fn negative_price_rejected() {
        let mut fields = listing();
        fields.price = -1.0;
        assert!(fields.validate().is_err());
    }

    #[test]
    fn valid_listing_accepted() {
        assert!(listing().validate().is_ok());
    }
}
