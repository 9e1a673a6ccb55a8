//! Map marker projection.
//!
//! Projects a property list onto the set of renderable map markers. Only
//! properties with both coordinates present produce a marker; the rest are
//! counted so the map view can surface an "n properties not shown" notice.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Property;

/// A single renderable marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub property_id: Uuid,
    pub title: String,
    pub price: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// True when this marker corresponds to the caller's selected listing.
    pub selected: bool,
}

/// The marker overlay for a property list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSet {
    pub markers: Vec<Marker>,
    /// Count of properties omitted for lacking coordinates.
    pub omitted: usize,
}

/// Project `properties` onto markers, flagging `selected` if present.
pub fn project(properties: &[Property], selected: Option<Uuid>) -> MarkerSet {
    let mut markers = Vec::new();
    let mut omitted = 0;

    for property in properties {
        match (property.latitude, property.longitude) {
            (Some(latitude), Some(longitude)) => markers.push(Marker {
                property_id: property.id,
                title: property.title.clone(),
                price: property.price,
                latitude,
                longitude,
                selected: selected == Some(property.id),
            }),
            _ => omitted += 1,
        }
    }

    MarkerSet { markers, omitted }
}
