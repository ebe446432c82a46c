//! GeoJSON serialization of tile responses for the rendering collaborator.
//!
//! Each cluster becomes one Point feature carrying the aggregate slot
//! counts and the display asset name; the data version rides along as
//! foreign members on the collection.

use crate::error::Result;
use crate::types::{ClusterFeature, TileData};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

/// Converts a tile response into a GeoJSON feature collection.
pub fn tile_to_geojson(tile: &TileData) -> FeatureCollection {
    let features = tile.features.iter().map(cluster_to_feature).collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "dataVersion".to_string(),
        JsonValue::String(tile.version.to_string()),
    );
    foreign_members.insert("hasData".to_string(), JsonValue::Bool(tile.version.has_data));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    }
}

fn cluster_to_feature(cluster: &ClusterFeature) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("free".to_string(), JsonValue::from(cluster.free));
    properties.insert("occupied".to_string(), JsonValue::from(cluster.occupied));
    properties.insert("count".to_string(), JsonValue::from(cluster.count));
    properties.insert("icon".to_string(), JsonValue::from(cluster.asset_name()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            cluster.location.x(),
            cluster.location.y(),
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Serializes a tile response to a GeoJSON string.
pub fn tile_to_geojson_string(tile: &TileData) -> Result<String> {
    Ok(serde_json::to_string(&tile_to_geojson(tile))?)
}
