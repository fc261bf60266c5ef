//! Display colors

use serde::{Serialize, Serializer};
use std::fmt;

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB` form
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS functional notation, e.g. `rgb(233,30,99)`
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

// Serialized as the CSS string so the page script can hand it straight to Leaflet.
impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_css_forms() {
        let pink = Rgb::new(233, 30, 99);
        assert_eq!(pink.to_hex(), "#E91E63");
        assert_eq!(pink.to_css(), "rgb(233,30,99)");

        let cyan = Rgb::new(0, 188, 212);
        assert_eq!(cyan.to_hex(), "#00BCD4");
    }

    #[test]
    fn test_serializes_as_css_string() {
        let json = serde_json::to_string(&Rgb::new(76, 175, 80)).unwrap();
        assert_eq!(json, "\"rgb(76,175,80)\"");
    }
}
