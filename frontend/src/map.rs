use serde::Serialize;
use shared::{Bounds, Coordinate, RoutePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Source,
    Target,
    Poi,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub at: Coordinate,
    pub kind: MarkerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Renderable geometry for one successful route: polyline vertices, the
/// marker set, and the viewport to fit. Projected exactly once per new
/// success so the map never fights a manual pan or zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub polyline: Vec<Coordinate>,
    pub markers: Vec<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<Bounds>,
}

/// Pure projection from a route result plus the current endpoints.
///
/// An empty path yields no polyline and no viewport refit, even when
/// endpoint markers exist. Absent POI nodes simply produce no POI markers.
pub fn project(
    path: &RoutePath,
    source: Option<Coordinate>,
    target: Option<Coordinate>,
) -> MapScene {
    let mut markers = Vec::new();
    if let Some(source) = source {
        markers.push(Marker {
            at: source,
            kind: MarkerKind::Source,
            label: Some("Start Point".to_string()),
        });
    }
    if let Some(target) = target {
        markers.push(Marker {
            at: target,
            kind: MarkerKind::Target,
            label: Some("End Point".to_string()),
        });
    }
    markers.extend(path.poi_nodes.iter().map(|poi| Marker {
        at: poi.coordinate,
        kind: MarkerKind::Poi,
        label: poi.label.clone(),
    }));

    let fit = if path.segments.is_empty() {
        None
    } else {
        Bounds::around(
            path.segments
                .iter()
                .copied()
                .chain(markers.iter().map(|marker| marker.at)),
        )
    };

    MapScene {
        polyline: path.segments.clone(),
        markers,
        fit,
    }
}
