//! Magnitude encoding: band colors, marker radii and popup timestamps
//!
//! Everything here is a pure function of its arguments. The timezone used for
//! timestamps is passed in rather than read from the environment.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use std::fmt;

use crate::models::Rgb;

/// Half-open magnitude interval `[lower, lower + 1)` and its fill color
///
/// The last band is open-ended above, the first is open-ended below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBand {
    pub lower: f64,
    pub color: Rgb,
}

/// Ten bands, strictly increasing by lower bound
pub const COLOR_BANDS: [ColorBand; 10] = [
    ColorBand { lower: 0.0, color: Rgb::new(233, 30, 99) },
    ColorBand { lower: 1.0, color: Rgb::new(156, 39, 176) },
    ColorBand { lower: 2.0, color: Rgb::new(103, 58, 183) },
    ColorBand { lower: 3.0, color: Rgb::new(63, 81, 181) },
    ColorBand { lower: 4.0, color: Rgb::new(33, 150, 243) },
    ColorBand { lower: 5.0, color: Rgb::new(0, 188, 212) },
    ColorBand { lower: 6.0, color: Rgb::new(0, 150, 136) },
    ColorBand { lower: 7.0, color: Rgb::new(76, 175, 80) },
    ColorBand { lower: 8.0, color: Rgb::new(205, 220, 57) },
    ColorBand { lower: 9.0, color: Rgb::new(255, 235, 59) },
];

/// Meters of radius per unit of magnitude in the default linear scale
pub const DEFAULT_METERS_PER_UNIT: f64 = 15000.0;

/// Pick the band color for a magnitude
///
/// Returns the color of the first band whose upper bound exceeds `mag`.
/// NaN fails every comparison and lands in the top band.
pub fn color_for_magnitude(mag: f64) -> Rgb {
    let top = COLOR_BANDS.len() - 1;
    COLOR_BANDS[..top]
        .iter()
        .find(|band| mag < band.lower + 1.0)
        .map_or(COLOR_BANDS[top].color, |band| band.color)
}

/// How a magnitude becomes a circle radius in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusScale {
    /// `mag * meters_per_unit`. Circle area grows with the square of magnitude.
    Linear { meters_per_unit: f64 },
    /// `sqrt(mag) * meters_per_unit`. Circle area grows linearly with magnitude.
    AreaProportional { meters_per_unit: f64 },
}

impl Default for RadiusScale {
    fn default() -> Self {
        RadiusScale::Linear { meters_per_unit: DEFAULT_METERS_PER_UNIT }
    }
}

impl RadiusScale {
    /// Radius in meters; zero or negative means nothing to draw
    pub fn radius(&self, mag: f64) -> f64 {
        match *self {
            RadiusScale::Linear { meters_per_unit } => mag * meters_per_unit,
            RadiusScale::AreaProportional { meters_per_unit } => {
                mag.max(0.0).sqrt() * meters_per_unit
            }
        }
    }

    /// Parse `linear` or `area`, using the default meters-per-unit
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "linear" => Some(RadiusScale::default()),
            "area" | "area-proportional" | "area_proportional" => {
                Some(RadiusScale::AreaProportional { meters_per_unit: DEFAULT_METERS_PER_UNIT })
            }
            _ => None,
        }
    }
}

/// Marker radius under the linear compatibility scale, `mag * 15000`
pub fn radius_for_magnitude(mag: f64) -> f64 {
    RadiusScale::default().radius(mag)
}

/// Format epoch milliseconds as `Mon D YYYY HH:MM:SS` in `tz`
///
/// Out-of-range timestamps produce `Invalid Date`.
pub fn format_timestamp<Tz>(time_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match DateTime::from_timestamp_millis(time_millis) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%b %-d %Y %H:%M:%S")
            .to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Timezone used for popup timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    /// The machine's local zone, DST included
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    pub fn format(&self, time_millis: i64) -> String {
        match self {
            DisplayZone::Local => format_timestamp(time_millis, &Local),
            DisplayZone::Fixed(offset) => format_timestamp(time_millis, offset),
        }
    }
}

/// Everything the encoder needs besides the magnitude itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderSettings {
    pub radius_scale: RadiusScale,
    pub zone: DisplayZone,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            radius_scale: RadiusScale::default(),
            zone: DisplayZone::Local,
        }
    }
}
