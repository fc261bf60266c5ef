use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A GeoJSON FeatureCollection as served by both feeds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A single GeoJSON feature
///
/// Properties are left untyped: the earthquake feed and the plate feed carry
/// different keys, and the earthquake feed sends `null` for unknown values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// The subset of GeoJSON geometries the map draws
///
/// Coordinates are `[lon, lat, ...]` positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

/// Errors returned by [`super::FeedClient`]
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// Network/request error
    #[error("Request Error: {0}")]
    Request(String),
    /// Non-success HTTP status
    #[error("HTTP Error ({0}): {1}")]
    Http(u16, String),
    /// Body was not a FeatureCollection
    #[error("Deserialization Error: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_usgs_feature() {
        let raw = r#"{
            "type": "FeatureCollection",
            "metadata": {"count": 1},
            "features": [{
                "type": "Feature",
                "id": "ci40000001",
                "properties": {"mag": 2.3, "place": "10km N of Somewhere, CA", "time": 1717000000000},
                "geometry": {"type": "Point", "coordinates": [-117.5, 35.1, 8.2]}
            }]
        }"#;

        let collection: FeatureCollection = serde_json::from_str(raw).unwrap();
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        assert_eq!(
            feature.geometry,
            Some(Geometry::Point { coordinates: vec![-117.5, 35.1, 8.2] })
        );
        assert_eq!(feature.properties.get("mag").and_then(Value::as_f64), Some(2.3));
    }

    #[test]
    fn test_unknown_geometry_and_null_geometry() {
        let raw = r#"{
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,1],[1,0],[0,0]]]}},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        }"#;

        let collection: FeatureCollection = serde_json::from_str(raw).unwrap();
        assert_eq!(collection.features[0].geometry, Some(Geometry::Unsupported));
        assert_eq!(collection.features[1].geometry, None);
    }

    #[test]
    fn test_missing_features_is_empty() {
        let collection: FeatureCollection = serde_json::from_str("{}").unwrap();
        assert!(collection.features.is_empty());
    }
}
