use crate::models::LegendEntry;
use crate::services::encoder_service::COLOR_BANDS;

/// Build the ten legend rows, lowest magnitude first
///
/// Labels read `"<lower>-<lower+1>"`, so the open-ended top band is shown as `9-10`.
pub fn build_legend_entries() -> Vec<LegendEntry> {
    COLOR_BANDS
        .iter()
        .map(|band| {
            let lower = band.lower as i64;
            LegendEntry {
                label: format!("{}-{}", lower, lower + 1),
                color: band.color,
            }
        })
        .collect()
}

/// Render the legend as the HTML fragment placed inside the map's legend control
pub fn legend_html(entries: &[LegendEntry]) -> String {
    let mut html = String::from("<h1>Magnitude</h1>");

    html.push_str("<div>");
    for entry in entries {
        html.push_str(&format!(
            "<div style=\"background-color: {}; text-align: center\" >{}</div>",
            entry.color.to_css(),
            entry.label
        ));
    }
    html.push_str("</div>");

    html
}
