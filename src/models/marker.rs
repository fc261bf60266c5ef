//! Renderable map elements

use serde::Serialize;

use super::color::Rgb;

/// A filled circle for one earthquake, sized in meters on the ground
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub lat: f64,
    pub lon: f64,
    pub color: Rgb,
    pub radius: f64,
    pub popup: String,
}

impl CircleMarker {
    /// Zero and negative radii cannot be drawn
    pub fn is_drawable(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }
}

/// A plate boundary polyline as `[lat, lon]` vertices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateLine {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Line style shared by every plate boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub weight: u32,
    pub color: &'static str,
}

/// Lifecycle of an overlay fed by one fetch
#[derive(Debug, Clone, PartialEq)]
pub enum LayerStatus {
    Pending,
    Loaded { count: usize, skipped: usize },
    Failed { reason: String },
}
