//! Map session: owns every layer and renders the Leaflet page
//!
//! Fetch completion handlers receive the session by `&mut` and only ever add to it.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::feeds::{FeatureCollection, FeedError};
use crate::html::{MAP_SCRIPT, PAGE_TEMPLATE};
use crate::models::{CircleMarker, LayerStatus, LineStyle, PlateLine};
use crate::services::encoder_service::EncoderSettings;
use crate::services::legend_service::{build_legend_entries, legend_html};
use crate::services::plate_service::{build_plate_layer, PlateLayer, PLATE_STYLE};
use crate::services::quake_service::{build_quake_layer, QuakeLayer};
use crate::utils::{escape_html, escape_script_json, RenderError};

pub const QUAKES_OVERLAY: &str = "Earthquakes";
pub const PLATES_OVERLAY: &str = "Fault Lines";

const MAPBOX_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";
const MAPBOX_V4_TILES: &str = "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";
const MAPBOX_STYLE_TILES: &str = "https://api.mapbox.com/styles/v1/mapbox/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}";

/// A base-map imagery source; the access token is filled in by Leaflet from the page data
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub name: &'static str,
    #[serde(rename = "url")]
    pub url_template: &'static str,
    #[serde(rename = "id")]
    pub style_id: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

/// Base layers in layer-control order; the first one is shown on load
pub const BASE_LAYERS: [TileLayer; 4] = [
    TileLayer {
        name: "Satellite",
        url_template: MAPBOX_V4_TILES,
        style_id: "mapbox.satellite",
        attribution: MAPBOX_ATTRIBUTION,
        max_zoom: 18,
    },
    TileLayer {
        name: "Street Map",
        url_template: MAPBOX_V4_TILES,
        style_id: "mapbox.streets",
        attribution: MAPBOX_ATTRIBUTION,
        max_zoom: 18,
    },
    TileLayer {
        name: "Dark Map",
        url_template: MAPBOX_V4_TILES,
        style_id: "mapbox.dark",
        attribution: MAPBOX_ATTRIBUTION,
        max_zoom: 18,
    },
    TileLayer {
        name: "Light Map",
        url_template: MAPBOX_STYLE_TILES,
        style_id: "light-v10",
        attribution: MAPBOX_ATTRIBUTION,
        max_zoom: 18,
    },
];

/// Initial viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        // Los Angeles
        Self {
            center: [34.0522, -118.2437],
            zoom: 5,
        }
    }
}

/// All state behind one rendered map
pub struct MapSession {
    access_token: String,
    encoder: EncoderSettings,
    view: MapView,
    quakes: QuakeLayer,
    quake_status: LayerStatus,
    plates: PlateLayer,
    plate_status: LayerStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlatesPayload<'a> {
    name: &'static str,
    style: LineStyle,
    lines: &'a [PlateLine],
}

/// Everything the page script needs, inlined as JSON
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PagePayload<'a> {
    center: [f64; 2],
    zoom: u8,
    access_token: &'a str,
    base_layers: &'a [TileLayer],
    active_base: &'static str,
    quakes_name: &'static str,
    quakes: &'a [CircleMarker],
    plates: PlatesPayload<'a>,
    legend_html: String,
    notices: Vec<String>,
}

impl MapSession {
    pub fn new(access_token: String, encoder: EncoderSettings) -> Self {
        Self {
            access_token,
            encoder,
            view: MapView::default(),
            quakes: QuakeLayer::default(),
            quake_status: LayerStatus::Pending,
            plates: PlateLayer::default(),
            plate_status: LayerStatus::Pending,
        }
    }

    /// Completion handler for the earthquake fetch
    ///
    /// A failed fetch leaves the overlay empty and records the reason.
    pub fn apply_earthquakes(&mut self, result: Result<FeatureCollection, FeedError>) {
        match result {
            Ok(collection) => {
                let layer = build_quake_layer(&collection, &self.encoder);
                info!(
                    "{} layer: {} markers, {} skipped, max magnitude {}",
                    QUAKES_OVERLAY,
                    layer.markers.len(),
                    layer.skipped,
                    layer.max_magnitude
                );
                self.quake_status = LayerStatus::Loaded {
                    count: layer.markers.len(),
                    skipped: layer.skipped,
                };
                self.quakes.markers.extend(layer.markers);
                self.quakes.skipped += layer.skipped;
                self.quakes.max_magnitude = self.quakes.max_magnitude.max(layer.max_magnitude);
            }
            Err(e) => {
                error!("{} feed failed: {}", QUAKES_OVERLAY, e);
                self.quake_status = LayerStatus::Failed { reason: e.to_string() };
            }
        }
    }

    /// Completion handler for the plate-boundary fetch
    pub fn apply_plates(&mut self, result: Result<FeatureCollection, FeedError>) {
        match result {
            Ok(collection) => {
                let layer = build_plate_layer(&collection);
                info!("{} layer: {} lines", PLATES_OVERLAY, layer.lines.len());
                self.plate_status = LayerStatus::Loaded {
                    count: layer.lines.len(),
                    skipped: layer.skipped,
                };
                self.plates.lines.extend(layer.lines);
                self.plates.skipped += layer.skipped;
            }
            Err(e) => {
                error!("{} feed failed: {}", PLATES_OVERLAY, e);
                self.plate_status = LayerStatus::Failed { reason: e.to_string() };
            }
        }
    }

    pub fn quake_layer(&self) -> &QuakeLayer {
        &self.quakes
    }

    pub fn plate_layer(&self) -> &PlateLayer {
        &self.plates
    }

    pub fn quake_status(&self) -> &LayerStatus {
        &self.quake_status
    }

    pub fn plate_status(&self) -> &LayerStatus {
        &self.plate_status
    }

    /// True once at least one overlay loaded
    pub fn has_content(&self) -> bool {
        matches!(self.quake_status, LayerStatus::Loaded { .. })
            || matches!(self.plate_status, LayerStatus::Loaded { .. })
    }

    /// User-facing lines for overlays that are not fully shown
    fn notices(&self) -> Vec<String> {
        let mut notices = Vec::new();
        for (name, status) in [
            (QUAKES_OVERLAY, &self.quake_status),
            (PLATES_OVERLAY, &self.plate_status),
        ] {
            match status {
                LayerStatus::Pending => notices.push(format!("{} not loaded", name)),
                LayerStatus::Failed { reason } => {
                    notices.push(format!("{} unavailable: {}", name, reason))
                }
                LayerStatus::Loaded { .. } => {}
            }
        }
        notices
    }

    /// Render the complete Leaflet page
    pub fn render_html(&self) -> Result<String, RenderError> {
        let notices = self.notices();
        for notice in &notices {
            warn!("{}", notice);
        }

        let payload = PagePayload {
            center: self.view.center,
            zoom: self.view.zoom,
            access_token: &self.access_token,
            base_layers: &BASE_LAYERS,
            active_base: BASE_LAYERS[0].name,
            quakes_name: QUAKES_OVERLAY,
            quakes: &self.quakes.markers,
            plates: PlatesPayload {
                name: PLATES_OVERLAY,
                style: PLATE_STYLE,
                lines: &self.plates.lines,
            },
            legend_html: legend_html(&build_legend_entries()),
            notices,
        };

        let data = escape_script_json(&serde_json::to_string(&payload)?);
        let title = escape_html(&format!(
            "Earthquakes ({} shown, max M{})",
            self.quakes.markers.len(),
            self.quakes.max_magnitude
        ));

        Ok(PAGE_TEMPLATE
            .replace("{{title}}", &title)
            .replace("{{script}}", MAP_SCRIPT)
            .replace("{{data}}", &data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::encoder_service::{DisplayZone, RadiusScale};
    use chrono::FixedOffset;
    use serde_json::{json, Value};

    fn session() -> MapSession {
        MapSession::new(
            "pk.secret-token".to_string(),
            EncoderSettings {
                radius_scale: RadiusScale::default(),
                zone: DisplayZone::Fixed(FixedOffset::east_opt(0).unwrap()),
            },
        )
    }

    fn quakes() -> FeatureCollection {
        serde_json::from_value(json!({
            "features": [
                {"properties": {"mag": 2.3, "place": "</script><b>", "time": 0},
                 "geometry": {"type": "Point", "coordinates": [-117.0, 35.0]}},
                {"properties": {"mag": 9.5, "place": "Chile", "time": 0},
                 "geometry": {"type": "Point", "coordinates": [-73.0, -38.0]}}
            ]
        }))
        .unwrap()
    }

    fn plates() -> FeatureCollection {
        serde_json::from_value(json!({
            "features": [
                {"properties": {"Name": "NA-PA"},
                 "geometry": {"type": "LineString", "coordinates": [[-125.0, 40.0], [-124.0, 41.0]]}}
            ]
        }))
        .unwrap()
    }

    /// Pull the inlined JSON payload back out of a rendered page
    fn payload(html: &str) -> Value {
        let start_tag = "<script type=\"application/json\" id=\"quakemap-data\">";
        let start = html.find(start_tag).unwrap() + start_tag.len();
        let end = start + html[start..].find("</script>").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_statuses_start_pending() {
        let s = session();
        assert_eq!(s.quake_status(), &LayerStatus::Pending);
        assert_eq!(s.plate_status(), &LayerStatus::Pending);
        assert!(!s.has_content());
    }

    #[test]
    fn test_handlers_in_either_order() {
        let mut a = session();
        a.apply_earthquakes(Ok(quakes()));
        a.apply_plates(Ok(plates()));

        let mut b = session();
        b.apply_plates(Ok(plates()));
        b.apply_earthquakes(Ok(quakes()));

        for s in [&a, &b] {
            assert_eq!(s.quake_status(), &LayerStatus::Loaded { count: 2, skipped: 0 });
            assert_eq!(s.plate_status(), &LayerStatus::Loaded { count: 1, skipped: 0 });
        }
        assert_eq!(a.quake_layer().markers, b.quake_layer().markers);
    }

    #[test]
    fn test_failed_fetch_leaves_layer_empty() {
        let mut s = session();
        s.apply_earthquakes(Err(FeedError::Http(500, "boom".to_string())));
        s.apply_plates(Ok(plates()));

        assert!(s.quake_layer().markers.is_empty());
        assert!(matches!(s.quake_status(), LayerStatus::Failed { reason } if reason.contains("500")));
        assert!(s.has_content());

        let data = payload(&s.render_html().unwrap());
        assert_eq!(data["quakes"].as_array().unwrap().len(), 0);
        assert_eq!(data["notices"][0], "Earthquakes unavailable: HTTP Error (500): boom");
    }

    #[test]
    fn test_both_failed_has_no_content() {
        let mut s = session();
        s.apply_earthquakes(Err(FeedError::Request("dns".to_string())));
        s.apply_plates(Err(FeedError::Request("dns".to_string())));
        assert!(!s.has_content());
    }

    #[test]
    fn test_page_payload() {
        let mut s = session();
        s.apply_earthquakes(Ok(quakes()));
        s.apply_plates(Ok(plates()));

        let data = payload(&s.render_html().unwrap());
        assert_eq!(data["accessToken"], "pk.secret-token");
        assert_eq!(data["center"], json!([34.0522, -118.2437]));
        assert_eq!(data["zoom"], 5);
        assert_eq!(data["activeBase"], "Satellite");
        assert_eq!(data["quakesName"], "Earthquakes");
        assert_eq!(data["plates"]["name"], "Fault Lines");
        assert_eq!(data["plates"]["style"], json!({"weight": 5, "color": "pink"}));
        assert_eq!(data["plates"]["lines"][0]["points"], json!([[40.0, -125.0], [41.0, -124.0]]));

        let names: Vec<&str> = data["baseLayers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Satellite", "Street Map", "Dark Map", "Light Map"]);
        assert_eq!(data["baseLayers"][3]["id"], "light-v10");

        assert_eq!(data["quakes"][1]["color"], "rgb(255,235,59)");
        assert_eq!(data["quakes"][1]["radius"], 142500.0);
        assert!(data["legendHtml"].as_str().unwrap().contains(">9-10</div>"));
        assert!(data["notices"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_place_cannot_break_out_of_script() {
        let mut s = session();
        s.apply_earthquakes(Ok(quakes()));

        let html = s.render_html().unwrap();
        assert!(!html.contains("</script><b>"));
        let data = payload(&html);
        assert!(data["quakes"][0]["popup"].as_str().unwrap().contains("&lt;/script&gt;&lt;b&gt;"));
    }

    #[test]
    fn test_page_wires_leaflet() {
        let html = session().render_html().unwrap();
        assert!(html.contains("leaflet@1.9.4/dist/leaflet.js"));
        assert!(html.contains("L.control.layers(baseMaps, overlayMaps, { collapsed: false })"));
        assert!(html.contains("position: \"bottomright\""));
        assert!(!html.contains("{{"));
    }
}
