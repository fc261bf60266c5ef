use std::path::Path;

use plotters::prelude::*;
use tracing::{debug, info};

use crate::models::Rgb;
use crate::services::legend_service::build_legend_entries;
use crate::services::map_service::MapSession;
use crate::utils::RenderError;

/// Meters per degree of latitude (and of longitude at the equator)
const METERS_PER_DEGREE: f64 = 111_320.0;

const BACKGROUND: RGBColor = RGBColor(18, 24, 38);
const GRID: RGBColor = RGBColor(60, 70, 90);
const PLATE_PINK: RGBColor = RGBColor(255, 192, 203);

fn plot_color(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Convert a ground radius to screen pixels at a given horizontal scale, at least 1px
pub fn meters_to_pixels(radius_m: f64, pixels_per_degree: f64) -> i32 {
    let px = (radius_m / METERS_PER_DEGREE * pixels_per_degree).round();
    if px.is_finite() && px >= 1.0 {
        px as i32
    } else {
        1
    }
}

/// Split a `[lat, lon]` polyline wherever it jumps across the antimeridian
///
/// Returns `(lon, lat)` runs ready for plotting; runs shorter than 2 points are dropped.
pub fn split_antimeridian(points: &[[f64; 2]]) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for &[lat, lon] in points {
        if let Some(&(prev_lon, _)) = current.last() {
            if (lon - prev_lon).abs() > 180.0 {
                runs.push(std::mem::take(&mut current));
            }
        }
        current.push((lon, lat));
    }
    runs.push(current);

    runs.retain(|run| run.len() >= 2);
    runs
}

/// Draw an equirectangular PNG of both overlays with a magnitude legend
pub fn render_snapshot(
    session: &MapSession,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    if !session.has_content() {
        return Err(RenderError::Empty("no overlay loaded".to_string()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    {
        let backend = BitMapBackend::new(path, (width, height));
        let root = backend.into_drawing_area();
        root.fill(&BACKGROUND)
            .map_err(|e| RenderError::Drawing(format!("Failed to fill canvas: {}", e)))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Earthquakes and plate boundaries",
                ("sans-serif", 28.0).into_font().color(&WHITE),
            )
            .margin(15)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(-180f64..180f64, -90f64..90f64)
            .map_err(|e| RenderError::Drawing(format!("Failed to build chart: {}", e)))?;

        chart
            .configure_mesh()
            .light_line_style(GRID.mix(0.3))
            .bold_line_style(GRID.mix(0.6))
            .axis_style(GRID)
            .label_style(("sans-serif", 12).into_font().color(&GRID))
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .map_err(|e| RenderError::Drawing(format!("Failed to draw mesh: {}", e)))?;

        // Plate boundaries underneath the quakes
        for line in &session.plate_layer().lines {
            for run in split_antimeridian(&line.points) {
                chart
                    .draw_series(std::iter::once(PathElement::new(run, PLATE_PINK.stroke_width(2))))
                    .map_err(|e| RenderError::Drawing(format!("Failed to draw plate line: {}", e)))?;
            }
        }

        let pixels_per_degree = chart.plotting_area().dim_in_pixel().0 as f64 / 360.0;
        debug!("Snapshot scale: {:.2} px/deg", pixels_per_degree);

        // Largest circles first so small ones stay visible
        let mut markers: Vec<_> = session
            .quake_layer()
            .markers
            .iter()
            .filter(|m| m.is_drawable())
            .collect();
        markers.sort_by(|a, b| b.radius.total_cmp(&a.radius));

        chart
            .draw_series(markers.iter().map(|m| {
                Circle::new(
                    (m.lon, m.lat),
                    meters_to_pixels(m.radius, pixels_per_degree),
                    plot_color(m.color).mix(0.5).filled(),
                )
            }))
            .map_err(|e| RenderError::Drawing(format!("Failed to draw markers: {}", e)))?;

        draw_legend(&root, width)?;

        root.present()
            .map_err(|e| RenderError::Drawing(format!("Failed to render snapshot: {}", e)))?;
    }

    info!("Snapshot written to {}", path.display());
    Ok(())
}

/// Magnitude legend boxed in the lower-right corner
fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    width: u32,
) -> Result<(), RenderError> {
    let entries = build_legend_entries();
    let row_height = 18;
    let box_width = 90;
    let x0 = width as i32 - box_width - 30;
    let y0 = root.dim_in_pixel().1 as i32 - 60 - row_height * (entries.len() as i32 + 1);

    root.draw(&Rectangle::new(
        [(x0 - 6, y0 - 6), (x0 + box_width + 6, y0 + row_height * (entries.len() as i32 + 1) + 6)],
        WHITE.mix(0.9).filled(),
    ))
    .map_err(|e| RenderError::Drawing(format!("Failed to draw legend: {}", e)))?;

    root.draw(&Text::new(
        "Magnitude",
        (x0, y0),
        ("sans-serif", 15).into_font().color(&BLACK),
    ))
    .map_err(|e| RenderError::Drawing(format!("Failed to draw legend: {}", e)))?;

    for (i, entry) in entries.iter().enumerate() {
        let top = y0 + row_height * (i as i32 + 1);
        root.draw(&Rectangle::new(
            [(x0, top), (x0 + box_width, top + row_height - 2)],
            plot_color(entry.color).filled(),
        ))
        .map_err(|e| RenderError::Drawing(format!("Failed to draw legend: {}", e)))?;

        root.draw(&Text::new(
            entry.label.clone(),
            (x0 + box_width / 2 - 12, top + 2),
            ("sans-serif", 13).into_font().color(&BLACK),
        ))
        .map_err(|e| RenderError::Drawing(format!("Failed to draw legend: {}", e)))?;
    }

    Ok(())
}
