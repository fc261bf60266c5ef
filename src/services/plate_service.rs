use tracing::debug;

use crate::api::feeds::{FeatureCollection, Geometry};
use crate::models::{LineStyle, PlateLine};

/// Style applied to every plate boundary
pub const PLATE_STYLE: LineStyle = LineStyle {
    weight: 5,
    color: "pink",
};

/// Plate boundary overlay
#[derive(Debug, Clone, Default)]
pub struct PlateLayer {
    pub lines: Vec<PlateLine>,
    /// Features with no line geometry
    pub skipped: usize,
}

/// Turn `[lon, lat, ...]` positions into `[lat, lon]` vertices, dropping short positions
fn to_lat_lon(positions: &[Vec<f64>]) -> Vec<[f64; 2]> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| [p[1], p[0]])
        .collect()
}

/// Extract the boundary polylines from the PB2002 collection
///
/// `LineString` and `MultiLineString` are kept; anything else is skipped.
pub fn build_plate_layer(collection: &FeatureCollection) -> PlateLayer {
    let mut layer = PlateLayer::default();

    for feature in &collection.features {
        let name = feature
            .properties
            .get("Name")
            .or_else(|| feature.properties.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        match &feature.geometry {
            Some(Geometry::LineString { coordinates }) => {
                layer.lines.push(PlateLine {
                    name,
                    points: to_lat_lon(coordinates),
                });
            }
            Some(Geometry::MultiLineString { coordinates }) => {
                for part in coordinates {
                    layer.lines.push(PlateLine {
                        name: name.clone(),
                        points: to_lat_lon(part),
                    });
                }
            }
            _ => layer.skipped += 1,
        }
    }

    layer.lines.retain(|line| line.points.len() >= 2);
    debug!("Plate layer: {} lines, {} skipped features", layer.lines.len(), layer.skipped);
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_line_string_is_flipped_to_lat_lon() {
        let layer = build_plate_layer(&collection(json!({
            "features": [{
                "type": "Feature",
                "properties": {"Name": "AF-AN", "PlateA": "AF"},
                "geometry": {"type": "LineString", "coordinates": [[-0.4, -54.8], [0.1, -54.5]]}
            }]
        })));

        assert_eq!(layer.lines.len(), 1);
        assert_eq!(layer.lines[0].name, "AF-AN");
        assert_eq!(layer.lines[0].points, vec![[-54.8, -0.4], [-54.5, 0.1]]);
    }

    #[test]
    fn test_multi_line_string_splits_into_parts() {
        let layer = build_plate_layer(&collection(json!({
            "features": [{
                "properties": {"Name": "PA-NA"},
                "geometry": {"type": "MultiLineString", "coordinates": [
                    [[179.0, 50.0], [180.0, 50.5]],
                    [[-180.0, 50.5], [-179.0, 51.0]]
                ]}
            }]
        })));

        assert_eq!(layer.lines.len(), 2);
        assert!(layer.lines.iter().all(|l| l.name == "PA-NA"));
    }

    #[test]
    fn test_other_geometries_are_skipped() {
        let layer = build_plate_layer(&collection(json!({
            "features": [
                {"properties": {}, "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
                {"properties": {}, "geometry": null},
                {"properties": {}, "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0]]}}
            ]
        })));

        assert!(layer.lines.is_empty());
        assert_eq!(layer.skipped, 2);
    }

    #[test]
    fn test_fixed_style() {
        assert_eq!(PLATE_STYLE.weight, 5);
        assert_eq!(PLATE_STYLE.color, "pink");
    }
}
