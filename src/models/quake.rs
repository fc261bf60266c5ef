//! Earthquake event models

/// A single observed earthquake, flattened out of its GeoJSON feature
#[derive(Debug, Clone, PartialEq)]
pub struct Quake {
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
    pub place: String,
    /// Milliseconds since the Unix epoch, UTC
    pub time_millis: i64,
}
