//! Property service - CRUD
//!
//! The booking engine only ever reads properties; mutation happens here.

use std::sync::Arc;

use chrono::Utc;
use openhouse_domain::{
    NewProperty, OpenHouseError, Page, Property, PropertyFilter, PropertyUpdate, Result,
};
use tracing::info;

use crate::booking::ports::PropertyRepository;

/// Property CRUD service
pub struct PropertyService {
    properties: Arc<dyn PropertyRepository>,
}

impl PropertyService {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    pub async fn create(&self, fields: NewProperty) -> Result<Property> {
        fields.validate()?;
        let property = fields.into_property();
        self.properties.insert(&property).await?;
        info!(property = %property.id, address = %property.address, "property listed");
        Ok(property)
    }

    pub async fn get(&self, id: &str) -> Result<Property> {
        self.properties
            .find_by_id(id)
            .await?
            .ok_or_else(|| OpenHouseError::NotFound(format!("property {id} not found")))
    }

    pub async fn list(&self, filter: &PropertyFilter, page: Page) -> Result<(Vec<Property>, u64)> {
        let rows = self.properties.list(filter, page).await?;
        let total = self.properties.count(filter).await?;
        Ok((rows, total))
    }

    pub async fn update(&self, id: &str, update: PropertyUpdate) -> Result<Property> {
        let mut property = self.get(id).await?;

        if let Some(address) = update.address {
            property.address = address;
        }
        if let Some(price) = update.price {
            if !price.is_finite() || price < 0.0 {
                return Err(OpenHouseError::InvalidInput(format!(
                    "property price must be non-negative, got {price}"
                )));
            }
            property.price = price;
        }
        if let Some(bedrooms) = update.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = update.bathrooms {
            if !bathrooms.is_finite() || bathrooms < 0.0 {
                return Err(OpenHouseError::InvalidInput("bathrooms must be non-negative".into()));
            }
            property.bathrooms = bathrooms;
        }
        if let Some(sqft) = update.sqft {
            property.sqft = sqft;
        }
        if let Some(media) = update.media {
            property.media = media;
        }
        if let Some(property_type) = update.property_type {
            property.property_type = property_type;
        }
        if let Some(status) = update.status {
            property.status = status;
        }
        if let Some(year_built) = update.year_built {
            property.year_built = Some(year_built);
        }
        if let Some(features) = update.features {
            property.features = features;
        }
        property.updated_at = Utc::now();

        self.properties.update(&property).await?;
        Ok(property)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.get(id).await?;
        self.properties.delete(id).await
    }
}
