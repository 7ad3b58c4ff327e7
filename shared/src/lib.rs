pub mod wire;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let coord = Self { lat, lng };
        coord.is_valid().then_some(coord)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

/// Smallest lat/lng box containing a set of points. Feeds the map viewport fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn around(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        for point in points {
            bounds.min_lat = bounds.min_lat.min(point.lat);
            bounds.max_lat = bounds.max_lat.max(point.lat);
            bounds.min_lng = bounds.min_lng.min(point.lng);
            bounds.max_lng = bounds.max_lng.max(point.lng);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElevationBand {
    #[default]
    #[serde(rename = "0-200")]
    Band0To200,
    #[serde(rename = "200-400")]
    Band200To400,
    #[serde(rename = "400-600")]
    Band400To600,
    #[serde(rename = "600-800")]
    Band600To800,
    #[serde(rename = "800-1000")]
    Band800To1000,
    #[serde(rename = "1000+")]
    Band1000Plus,
}

impl ElevationBand {
    pub const ALL: [Self; 6] = [
        Self::Band0To200,
        Self::Band200To400,
        Self::Band400To600,
        Self::Band600To800,
        Self::Band800To1000,
        Self::Band1000Plus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Band0To200 => "0-200",
            Self::Band200To400 => "200-400",
            Self::Band400To600 => "400-600",
            Self::Band600To800 => "600-800",
            Self::Band800To1000 => "800-1000",
            Self::Band1000Plus => "1000+",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFactor {
    #[default]
    Elevation,
    Poi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Max,
    Min,
}

/// Finalized routing parameters, frozen from the form at submit time.
///
/// The two variants are mutually exclusive: a deployment runs with one or
/// the other, selected by configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteConstraints {
    Bucketed {
        source: Coordinate,
        target: Coordinate,
        target_distance_km: f64,
        elevation_band: ElevationBand,
        poi_minimum: u32,
        priority_factor: PriorityFactor,
    },
    Preference {
        source: Coordinate,
        target: Coordinate,
        target_distance_km: f64,
        elevation_preference: Preference,
        poi_preference: Preference,
    },
}

impl RouteConstraints {
    pub fn source(&self) -> Coordinate {
        match self {
            Self::Bucketed { source, .. } | Self::Preference { source, .. } => *source,
        }
    }

    pub fn target(&self) -> Coordinate {
        match self {
            Self::Bucketed { target, .. } | Self::Preference { target, .. } => *target,
        }
    }

    pub fn target_distance_km(&self) -> f64 {
        match self {
            Self::Bucketed {
                target_distance_km, ..
            }
            | Self::Preference {
                target_distance_km, ..
            } => *target_distance_km,
        }
    }

    pub fn to_wire(&self) -> wire::RouteRequest {
        let mut request = wire::RouteRequest {
            source: self.source().as_pair(),
            target: self.target().as_pair(),
            input_distance: self.target_distance_km(),
            elevation_range: None,
            poi_min: None,
            priority_factor: None,
            elevation_preference: None,
            poi_preference: None,
        };
        match self {
            Self::Bucketed {
                elevation_band,
                poi_minimum,
                priority_factor,
                ..
            } => {
                request.elevation_range = Some(*elevation_band);
                request.poi_min = Some(*poi_minimum);
                request.priority_factor = Some(*priority_factor);
            }
            Self::Preference {
                elevation_preference,
                poi_preference,
                ..
            } => {
                request.elevation_preference = Some(*elevation_preference);
                request.poi_preference = Some(*poi_preference);
            }
        }
        request
    }
}

/// A place-search candidate. Lives only while a suggestion list is open;
/// resolving it to a coordinate is a second call keyed by `external_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSuggestion {
    pub label: String,
    pub external_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoiNode {
    pub coordinate: Coordinate,
    pub label: Option<String>,
}

/// A computed route as returned by the service. Immutable once received;
/// a new result replaces it wholesale. Metric fields the service omitted
/// stay `None` so the summary can show an explicit sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    pub segments: Vec<Coordinate>,
    pub total_distance_km: Option<f64>,
    pub elevation_change_m: Option<f64>,
    pub poi_count: Option<u32>,
    pub poi_nodes: Vec<PoiNode>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Local, pre-network, user-correctable.
    #[error("{0}")]
    Validation(String),
    /// Transport-level success, but the service reported that no path
    /// satisfies the constraints. Displays the service message verbatim.
    #[error("{0}")]
    NoRoute(String),
    /// Non-success HTTP outcome, network failure, or timeout. The detail is
    /// for the console only; users get the fixed generic notice.
    #[error("Error fetching the route.")]
    Transport { detail: String },
}

impl RouteError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(49.2292, -122.9932).is_some());
        assert!(Coordinate::new(90.0001, 0.0).is_none());
        assert!(Coordinate::new(0.0, -180.5).is_none());
    }

    #[test]
    fn test_bounds_empty_input() {
        assert_eq!(Bounds::around(std::iter::empty()), None);
    }

    #[test]
    fn test_bounds_single_point_is_degenerate() {
        let point = Coordinate { lat: 49.25, lng: -123.0 };
        let bounds = Bounds::around([point]).unwrap();
        assert_eq!(bounds.min_lat, bounds.max_lat);
        assert_eq!(bounds.min_lng, bounds.max_lng);
        assert!(bounds.contains(point));
    }

    #[test]
    fn test_elevation_band_labels_round_trip() {
        for band in ElevationBand::ALL {
            assert_eq!(ElevationBand::from_label(band.label()), Some(band));
        }
        assert_eq!(ElevationBand::from_label("2000+"), None);
    }

    #[test]
    fn test_bucketed_constraints_to_wire() {
        let constraints = RouteConstraints::Bucketed {
            source: Coordinate { lat: 49.2292, lng: -122.9932 },
            target: Coordinate { lat: 49.2813912, lng: -123.1217871 },
            target_distance_km: 5.0,
            elevation_band: ElevationBand::Band0To200,
            poi_minimum: 0,
            priority_factor: PriorityFactor::Elevation,
        };
        let json = serde_json::to_value(constraints.to_wire()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "source": [49.2292, -122.9932],
                "target": [49.2813912, -123.1217871],
                "input_distance": 5.0,
                "elevation_range": "0-200",
                "poi_min": 0,
                "priority_factor": "elevation",
            })
        );
    }

    #[test]
    fn test_preference_constraints_to_wire() {
        let constraints = RouteConstraints::Preference {
            source: Coordinate { lat: 49.0, lng: -123.0 },
            target: Coordinate { lat: 49.5, lng: -123.5 },
            target_distance_km: 8.0,
            elevation_preference: Preference::Min,
            poi_preference: Preference::Max,
        };
        let json = serde_json::to_value(constraints.to_wire()).unwrap();
        assert_eq!(json["elevation_preference"], "min");
        assert_eq!(json["poi_preference"], "max");
        assert!(json.get("elevation_range").is_none());
        assert!(json.get("poi_min").is_none());
    }

    #[test]
    fn test_transport_error_display_is_generic() {
        let err = RouteError::transport("status 502");
        assert_eq!(err.to_string(), "Error fetching the route.");
    }

    #[test]
    fn test_no_route_error_display_is_service_message() {
        let err = RouteError::NoRoute("No path found".to_string());
        assert_eq!(err.to_string(), "No path found");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lng)| Coordinate { lat, lng })
        }

        proptest! {
            #[test]
            fn prop_bounds_contain_every_input(points in proptest::collection::vec(valid_coord(), 1..40)) {
                let bounds = Bounds::around(points.iter().copied()).unwrap();
                for point in points {
                    prop_assert!(bounds.contains(point));
                }
            }

            #[test]
            fn prop_valid_coords_pass_validation(coord in valid_coord()) {
                prop_assert!(coord.is_valid());
            }
        }
    }
}
