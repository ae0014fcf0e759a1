//! Map markers for listings with coordinates.

use super::format::format_price;
use crate::models::Property;
use schemars::JsonSchema;
use serde::Serialize;

/// Map center used when no listing has coordinates (San Francisco).
pub const DEFAULT_CENTER: (f64, f64) = (37.7749, -122.4194);

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub location: String,
    pub price: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
pub struct MapView {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub markers: Vec<MapMarker>,
    /// Listings left off the map for lack of coordinates.
    pub unplaced: usize,
}

/// Markers for every listing that has coordinates, centered on their mean.
pub fn map_markers(properties: &[Property]) -> MapView {
    let markers: Vec<MapMarker> = properties
        .iter()
        .filter_map(|p| {
            let (latitude, longitude) = p.coordinates()?;
            Some(MapMarker {
                id: p.id.clone(),
                title: p.title.clone(),
                location: p.display_location(),
                price: format_price(p.price),
                latitude,
                longitude,
            })
        })
        .collect();

    let (center_latitude, center_longitude) = if markers.is_empty() {
        DEFAULT_CENTER
    } else {
        let n = markers.len() as f64;
        (
            markers.iter().map(|m| m.latitude).sum::<f64>() / n,
            markers.iter().map(|m| m.longitude).sum::<f64>() / n,
        )
    };

    MapView {
        center_latitude,
        center_longitude,
        unplaced: properties.len() - markers.len(),
        markers,
    }
}
