use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::feeds::{Feature, FeatureCollection, Geometry};
use crate::models::{CircleMarker, Quake};
use crate::services::encoder_service::{color_for_magnitude, EncoderSettings};
use crate::utils::escape_html;

/// Why a single earthquake feature could not be turned into a marker
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("missing or non-numeric magnitude")]
    MissingMagnitude,
    #[error("missing point geometry")]
    MissingGeometry,
    #[error("expected at least 2 coordinates, got {0}")]
    ShortCoordinates(usize),
    #[error("missing or non-integer time")]
    MissingTime,
}

/// Earthquake markers ready to draw, plus bookkeeping for the layer status
#[derive(Debug, Clone, Default)]
pub struct QuakeLayer {
    pub markers: Vec<CircleMarker>,
    /// Features that failed to parse or produced a non-drawable radius
    pub skipped: usize,
    pub max_magnitude: f64,
}

/// Read a numeric property that may arrive as a JSON number or a numeric string
fn number_property(properties: &Map<String, Value>, key: &str) -> Option<f64> {
    match properties.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Flatten an earthquake feature into a [`Quake`]
pub fn quake_from_feature(feature: &Feature) -> Result<Quake, FeatureError> {
    let coordinates = match &feature.geometry {
        Some(Geometry::Point { coordinates }) => coordinates,
        _ => return Err(FeatureError::MissingGeometry),
    };
    if coordinates.len() < 2 {
        return Err(FeatureError::ShortCoordinates(coordinates.len()));
    }

    let magnitude = number_property(&feature.properties, "mag")
        .ok_or(FeatureError::MissingMagnitude)?;

    let time_millis = feature
        .properties
        .get("time")
        .and_then(Value::as_i64)
        .ok_or(FeatureError::MissingTime)?;

    let place = feature
        .properties
        .get("place")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Quake {
        latitude: coordinates[1],
        longitude: coordinates[0],
        magnitude,
        place,
        time_millis,
    })
}

/// Popup body shown when a marker is clicked
pub fn popup_html(place: &str, when: &str, magnitude: f64) -> String {
    format!(
        "<h2>{}</h2> <hr> <h3>Time: {}</h3> <h3>Magnitude: {}</h3>",
        escape_html(place),
        escape_html(when),
        magnitude
    )
}

/// Largest magnitude in the set, never below zero
pub fn max_magnitude(quakes: &[Quake]) -> f64 {
    quakes
        .iter()
        .map(|q| q.magnitude)
        .fold(0.0, |max, mag| if mag > max { mag } else { max })
}

/// Encode one quake into a circle marker
pub fn encode_quake(quake: &Quake, settings: &EncoderSettings) -> CircleMarker {
    let when = settings.zone.format(quake.time_millis);
    CircleMarker {
        lat: quake.latitude,
        lon: quake.longitude,
        color: color_for_magnitude(quake.magnitude),
        radius: settings.radius_scale.radius(quake.magnitude),
        popup: popup_html(&quake.place, &when, quake.magnitude),
    }
}

/// Build the earthquake overlay
///
/// A malformed feature is logged and skipped; it never aborts the rest of the batch.
pub fn build_quake_layer(collection: &FeatureCollection, settings: &EncoderSettings) -> QuakeLayer {
    let mut quakes = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;

    for (index, feature) in collection.features.iter().enumerate() {
        match quake_from_feature(feature) {
            Ok(quake) => quakes.push(quake),
            Err(e) => {
                warn!("Skipping earthquake feature #{} ({:?}): {}", index, feature.id, e);
                skipped += 1;
            }
        }
    }

    let max_magnitude = max_magnitude(&quakes);
    debug!("Max magnitude: {}", max_magnitude);

    let mut markers = Vec::with_capacity(quakes.len());
    for quake in &quakes {
        let marker = encode_quake(quake, settings);
        if marker.is_drawable() {
            markers.push(marker);
        } else {
            debug!("Not drawing M{} at {}: radius {}", quake.magnitude, quake.place, marker.radius);
            skipped += 1;
        }
    }

    QuakeLayer {
        markers,
        skipped,
        max_magnitude,
    }
}
