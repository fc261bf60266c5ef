//! Data models shared by the feed client, encoder and renderers
//!
//! Each model is plain data; the services in `crate::services` produce and consume them.

pub mod color;
pub mod legend;
pub mod marker;
pub mod quake;

// Re-export commonly used types for convenience
pub use color::Rgb;
pub use legend::LegendEntry;
pub use marker::{CircleMarker, LayerStatus, LineStyle, PlateLine};
pub use quake::Quake;
