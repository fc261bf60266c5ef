//! Legend models

use super::color::Rgb;

/// One row of the magnitude legend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}
