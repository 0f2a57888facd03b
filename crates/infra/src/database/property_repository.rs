//! SQLite implementation of the PropertyRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use openhouse_domain::{
    OpenHouseError, Page, Property, PropertyFilter, PropertyStatus, Result,
};
use rusqlite::types::Value;
use rusqlite::{params, Row};

use super::{bad_column, datetime_from_ts, DbManager};
use crate::errors::InfraError;

const PROPERTY_COLUMNS: &str = "id, address, price, bedrooms, bathrooms, sqft, media,
     property_type, status, year_built, features, created_at, updated_at";

/// SQLite implementation of PropertyRepository
pub struct SqlitePropertyRepository {
    db: Arc<DbManager>,
}

impl SqlitePropertyRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn row_to_property(row: &Row<'_>) -> rusqlite::Result<Property> {
    let status: String = row.get(8)?;
    let status = PropertyStatus::parse(&status)
        .map_err(|err| bad_column(8, format!("property status: {err}")))?;
    let media: String = row.get(6)?;
    let features: String = row.get(10)?;

    Ok(Property {
        id: row.get(0)?,
        address: row.get(1)?,
        price: row.get(2)?,
        bedrooms: row.get::<_, i64>(3)? as u32,
        bathrooms: row.get(4)?,
        sqft: row.get::<_, i64>(5)? as u32,
        media: serde_json::from_str(&media).unwrap_or_default(),
        property_type: row.get(7)?,
        status,
        year_built: row.get(9)?,
        features: serde_json::from_str(&features).unwrap_or_default(),
        created_at: datetime_from_ts(row.get(11)?),
        updated_at: datetime_from_ts(row.get(12)?),
    })
}

fn filter_clause(filter: &PropertyFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(status) = filter.status {
        values.push(Value::from(status.as_str().to_string()));
        clauses.push(format!("status = ?{}", values.len()));
    }
    if let Some(property_type) = &filter.property_type {
        values.push(Value::from(property_type.clone()));
        clauses.push(format!("property_type = ?{}", values.len()));
    }
    if let Some(min_price) = filter.min_price {
        values.push(Value::from(min_price));
        clauses.push(format!("price >= ?{}", values.len()));
    }
    if let Some(max_price) = filter.max_price {
        values.push(Value::from(max_price));
        clauses.push(format!("price <= ?{}", values.len()));
    }
    if let Some(min_bedrooms) = filter.min_bedrooms {
        values.push(Value::from(i64::from(min_bedrooms)));
        clauses.push(format!("bedrooms >= ?{}", values.len()));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

#[async_trait]
impl openhouse_core::PropertyRepository for SqlitePropertyRepository {
    async fn insert(&self, property: &Property) -> Result<()> {
        let conn = self.db.get()?;
        let media = serde_json::to_string(&property.media)
            .map_err(|err| OpenHouseError::Database(format!("media: {err}")))?;
        let features = serde_json::to_string(&property.features)
            .map_err(|err| OpenHouseError::Database(format!("features: {err}")))?;
        conn.execute(
            "INSERT INTO properties (
                id, address, price, bedrooms, bathrooms, sqft, media, property_type,
                status, year_built, features, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                property.id,
                property.address,
                property.price,
                i64::from(property.bedrooms),
                property.bathrooms,
                i64::from(property.sqft),
                media,
                property.property_type,
                property.status.as_str(),
                property.year_built,
                features,
                property.created_at.timestamp(),
                property.updated_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>> {
        let conn = self.db.get()?;
        let result = conn.query_row(
            &format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1"),
            params![id],
            row_to_property,
        );
        match result {
            Ok(property) => Ok(Some(property)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn list(&self, filter: &PropertyFilter, page: Page) -> Result<Vec<Property>> {
        let conn = self.db.get()?;
        let (where_clause, values) = filter_clause(filter);
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties{where_clause}
             ORDER BY created_at DESC LIMIT {} OFFSET {}",
            page.limit, page.offset,
        );
        let mut statement = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = statement
            .query_map(rusqlite::params_from_iter(values), row_to_property)
            .map_err(InfraError::from)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|err| InfraError::from(err).into())
    }

    async fn count(&self, filter: &PropertyFilter) -> Result<u64> {
        let conn = self.db.get()?;
        let (where_clause, values) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM properties{where_clause}");
        conn.query_row(&sql, rusqlite::params_from_iter(values), |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })
        .map_err(|err| InfraError::from(err).into())
    }

    async fn update(&self, property: &Property) -> Result<()> {
        let conn = self.db.get()?;
        let media = serde_json::to_string(&property.media)
            .map_err(|err| OpenHouseError::Database(format!("media: {err}")))?;
        let features = serde_json::to_string(&property.features)
            .map_err(|err| OpenHouseError::Database(format!("features: {err}")))?;
        let changed = conn
            .execute(
                "UPDATE properties SET
                    address = ?2, price = ?3, bedrooms = ?4, bathrooms = ?5, sqft = ?6,
                    media = ?7, property_type = ?8, status = ?9, year_built = ?10,
                    features = ?11, updated_at = ?12
                 WHERE id = ?1",
                params![
                    property.id,
                    property.address,
                    property.price,
                    i64::from(property.bedrooms),
                    property.bathrooms,
                    i64::from(property.sqft),
                    media,
                    property.property_type,
                    property.status.as_str(),
                    property.year_built,
                    features,
                    property.updated_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;
        if changed == 0 {
            return Err(OpenHouseError::NotFound(format!(
                "property {} not found",
                property.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.db.get()?;
        let changed = conn
            .execute("DELETE FROM properties WHERE id = ?1", params![id])
            .map_err(InfraError::from)?;
        if changed == 0 {
            return Err(OpenHouseError::NotFound(format!("property {id} not found")));
        }
        Ok(())
    }
}
