use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;
use thiserror::Error;

use crate::api::feeds::FeedClient;
use crate::services::encoder_service::{DisplayZone, EncoderSettings, RadiusScale};

/// Configuration errors abort startup
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Access token for the Mapbox tile layers
    pub mapbox_api_key: String,
    pub earthquakes_url: String,
    pub plates_url: String,
    pub output_path: PathBuf,
    pub snapshot_path: Option<PathBuf>,
    pub snapshot_size: (u32, u32),
    pub encoder: EncoderSettings,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub const DEFAULT_OUTPUT: &'static str = "map.html";
    pub const DEFAULT_SNAPSHOT_SIZE: (u32, u32) = (1600, 800);
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mapbox_api_key = get("MAPBOX_API_KEY").ok_or(ConfigError::Missing("MAPBOX_API_KEY"))?;

        let radius_scale = match get("QUAKEMAP_RADIUS_SCALE") {
            Some(name) => RadiusScale::from_name(&name).ok_or(ConfigError::Invalid {
                key: "QUAKEMAP_RADIUS_SCALE",
                value: name,
                reason: "expected 'linear' or 'area'",
            })?,
            None => RadiusScale::default(),
        };

        let zone = match get("QUAKEMAP_UTC_OFFSET") {
            Some(offset) => parse_zone(&offset).ok_or(ConfigError::Invalid {
                key: "QUAKEMAP_UTC_OFFSET",
                value: offset,
                reason: "expected 'local', 'UTC' or an offset like +02:00",
            })?,
            None => DisplayZone::Local,
        };

        let snapshot_size = match get("QUAKEMAP_SNAPSHOT_SIZE") {
            Some(size) => parse_size(&size).ok_or(ConfigError::Invalid {
                key: "QUAKEMAP_SNAPSHOT_SIZE",
                value: size,
                reason: "expected WIDTHxHEIGHT",
            })?,
            None => Self::DEFAULT_SNAPSHOT_SIZE,
        };

        let timeout_secs = match get("QUAKEMAP_HTTP_TIMEOUT_SECS") {
            Some(secs) => match secs.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "QUAKEMAP_HTTP_TIMEOUT_SECS",
                        value: secs,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => Self::DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            mapbox_api_key,
            earthquakes_url: get("QUAKEMAP_EARTHQUAKES_URL")
                .unwrap_or_else(|| FeedClient::DEFAULT_EARTHQUAKES_URL.to_string()),
            plates_url: get("QUAKEMAP_PLATES_URL")
                .unwrap_or_else(|| FeedClient::DEFAULT_PLATES_URL.to_string()),
            output_path: PathBuf::from(
                get("QUAKEMAP_OUTPUT").unwrap_or_else(|| Self::DEFAULT_OUTPUT.to_string()),
            ),
            snapshot_path: get("QUAKEMAP_SNAPSHOT").map(PathBuf::from),
            snapshot_size,
            encoder: EncoderSettings { radius_scale, zone },
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse `local`, `UTC`/`Z`, or a `±HH:MM` offset
fn parse_zone(value: &str) -> Option<DisplayZone> {
    match value.to_lowercase().as_str() {
        "local" => Some(DisplayZone::Local),
        "utc" | "z" => FixedOffset::east_opt(0).map(DisplayZone::Fixed),
        _ => value.parse::<FixedOffset>().ok().map(DisplayZone::Fixed),
    }
}

/// Parse `1600x800`
fn parse_size(value: &str) -> Option<(u32, u32)> {
    let lower = value.to_lowercase();
    let (w, h) = lower.split_once('x')?;
    let width = w.trim().parse::<u32>().ok().filter(|&n| n > 0)?;
    let height = h.trim().parse::<u32>().ok().filter(|&n| n > 0)?;
    Some((width, height))
}
