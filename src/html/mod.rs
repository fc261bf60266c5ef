//! Static page assets for the generated Leaflet map.
//!
//! The page is one self-contained file: Leaflet comes from a CDN and the map
//! data is inlined as a JSON script block read by [`MAP_SCRIPT`].

/// Page skeleton; `{{title}}`, `{{data}}` and `{{script}}` are substituted at render time
pub const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{title}}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
    integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY=" crossorigin="" />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; inset: 0; }
    .legend { background: rgba(255, 255, 255, 0.9); padding: 6px 10px; border-radius: 4px; min-width: 90px; }
    .legend h1 { font-size: 16px; margin: 0 0 6px 0; }
    .notices { position: absolute; top: 10px; left: 50px; z-index: 1000; }
    .notice { background: #fff3cd; border: 1px solid #e0c36c; padding: 4px 8px; margin-bottom: 4px; font: 13px sans-serif; }
  </style>
</head>

<body>
  <div id="map"></div>
  <div class="notices" id="notices"></div>
  <script type="application/json" id="quakemap-data">{{data}}</script>
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
    integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo=" crossorigin=""></script>
  <script>
{{script}}
  </script>
</body>

</html>
"#;

/// Builds tile layers, overlays, the layer control and the legend from the inlined data
pub const MAP_SCRIPT: &str = r#"(function () {
  var data = JSON.parse(document.getElementById("quakemap-data").textContent);

  var baseMaps = {};
  data.baseLayers.forEach(function (layer) {
    baseMaps[layer.name] = L.tileLayer(layer.url, {
      attribution: layer.attribution,
      maxZoom: layer.maxZoom,
      id: layer.id,
      accessToken: data.accessToken
    });
  });

  var faultLines = L.layerGroup(data.plates.lines.map(function (line) {
    return L.polyline(line.points, data.plates.style);
  }));

  var earthquakes = L.layerGroup(data.quakes.map(function (quake) {
    return L.circle([quake.lat, quake.lon], {
      stroke: false,
      fillOpacity: 0.5,
      fillColor: quake.color,
      radius: quake.radius
    }).bindPopup(quake.popup);
  }));

  var overlayMaps = {};
  overlayMaps[data.plates.name] = faultLines;
  overlayMaps[data.quakesName] = earthquakes;

  var map = L.map("map", {
    center: data.center,
    zoom: data.zoom,
    layers: [baseMaps[data.activeBase], faultLines, earthquakes]
  });

  L.control.layers(baseMaps, overlayMaps, { collapsed: false }).addTo(map);

  var legend = L.control({ position: "bottomright" });
  legend.onAdd = function () {
    var div = L.DomUtil.create("div", "info legend");
    div.innerHTML = data.legendHtml;
    return div;
  };
  legend.addTo(map);

  var notices = document.getElementById("notices");
  data.notices.forEach(function (text) {
    var div = document.createElement("div");
    div.className = "notice";
    div.textContent = text;
    notices.appendChild(div);
  });
})();"#;
