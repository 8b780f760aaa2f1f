//! Database models for properties and their proximity fields.

use diesel::prelude::*;
use estimo_core::proximity::{PropertyLocation, ProximitySnapshot};
use estimo_core::Result;
use estimo_market_data::Coordinates;
use serde::{Deserialize, Serialize};

use crate::errors::IntoCore;
use crate::utils::{format_timestamp, parse_timestamp};

/// Database model for properties
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::properties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PropertyDB {
    pub id: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub proximity_score: Option<i32>,
    pub has_beach_access: bool,
    pub has_metro_access: bool,
    pub has_shopping_access: bool,
    pub has_hospital_access: bool,
    pub has_school_access: bool,
    pub has_park_access: bool,
    pub proximity_landmarks: Option<String>,
    pub proximity_updated_at: Option<String>,
}

impl TryFrom<PropertyDB> for PropertyLocation {
    type Error = estimo_core::Error;

    fn try_from(db: PropertyDB) -> Result<Self> {
        let coordinates = match (db.lat, db.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };
        let proximity_updated_at = db
            .proximity_updated_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(PropertyLocation {
            id: db.id,
            coordinates,
            proximity_updated_at,
        })
    }
}

/// Proximity columns of a property. `None` values are written as NULL.
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::properties)]
#[diesel(treat_none_as_null = true)]
pub struct ProximityChangesetDB {
    pub proximity_score: Option<i32>,
    pub has_beach_access: bool,
    pub has_metro_access: bool,
    pub has_shopping_access: bool,
    pub has_hospital_access: bool,
    pub has_school_access: bool,
    pub has_park_access: bool,
    pub proximity_landmarks: Option<String>,
    pub proximity_updated_at: Option<String>,
}

impl ProximityChangesetDB {
    pub fn from_snapshot(snapshot: &ProximitySnapshot) -> Result<Self> {
        Ok(Self {
            proximity_score: Some(i32::from(snapshot.proximity_score)),
            has_beach_access: snapshot.has_beach_access,
            has_metro_access: snapshot.has_metro_access,
            has_shopping_access: snapshot.has_shopping_access,
            has_hospital_access: snapshot.has_hospital_access,
            has_school_access: snapshot.has_school_access,
            has_park_access: snapshot.has_park_access,
            proximity_landmarks: Some(serde_json::to_string(&snapshot.landmarks).into_core()?),
            proximity_updated_at: Some(format_timestamp(&snapshot.updated_at)),
        })
    }

    /// Changeset that resets every proximity column.
    pub fn cleared() -> Self {
        Self {
            proximity_score: None,
            has_beach_access: false,
            has_metro_access: false,
            has_shopping_access: false,
            has_hospital_access: false,
            has_school_access: false,
            has_park_access: false,
            proximity_landmarks: None,
            proximity_updated_at: None,
        }
    }
}
