//! Payloads for the three remote calls: route computation, place
//! suggestions, and place geocoding. Decoding is lenient where the services
//! are known to vary (absent metric fields, two poi_nodes shapes); the
//! interpretation helpers turn each envelope into a domain outcome.

use serde::{Deserialize, Serialize};

use crate::{
    Coordinate, ElevationBand, PlaceSuggestion, PoiNode, Preference, PriorityFactor, RouteError,
    RoutePath,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    pub source: [f64; 2],
    pub target: [f64; 2],
    pub input_distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_range: Option<ElevationBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poi_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_factor: Option<PriorityFactor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_preference: Option<Preference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poi_preference: Option<Preference>,
}

/// Route service response body. Transport success does not imply a usable
/// path: a `message` body signals that no path satisfies the constraints.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub best_path: Option<BestPath>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RouteResponse {
    /// Three-way interpretation: service message, usable path, or a
    /// malformed body (treated as transport failure). The message wins when
    /// both are present.
    pub fn into_outcome(self) -> Result<RoutePath, RouteError> {
        if let Some(message) = self.message {
            return Err(RouteError::NoRoute(message));
        }
        match self.best_path {
            Some(best_path) => Ok(best_path.into_route_path()),
            None => Err(RouteError::transport(
                "route response carried neither best_path nor message",
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BestPath {
    pub path_segments: Vec<[f64; 2]>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub elevation_change: Option<f64>,
    #[serde(default)]
    pub poi_count: Option<u32>,
    #[serde(default)]
    pub poi_nodes: Vec<PoiNodeWire>,
}

impl BestPath {
    fn into_route_path(self) -> RoutePath {
        RoutePath {
            segments: self.path_segments.iter().map(pair_to_coordinate).collect(),
            total_distance_km: self.distance,
            elevation_change_m: self.elevation_change,
            poi_count: self.poi_count,
            poi_nodes: self.poi_nodes.into_iter().map(PoiNodeWire::into_node).collect(),
        }
    }
}

/// The service emits POI nodes either as bare `[lat, lng]` pairs or as
/// objects with coordinates and an optional description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PoiNodeWire {
    Bare([f64; 2]),
    Described {
        coordinates: [f64; 2],
        #[serde(default)]
        description: Option<String>,
    },
}

impl PoiNodeWire {
    fn into_node(self) -> PoiNode {
        match self {
            Self::Bare(pair) => PoiNode {
                coordinate: pair_to_coordinate(&pair),
                label: None,
            },
            Self::Described {
                coordinates,
                description,
            } => PoiNode {
                coordinate: pair_to_coordinate(&coordinates),
                label: description,
            },
        }
    }
}

fn pair_to_coordinate(pair: &[f64; 2]) -> Coordinate {
    Coordinate {
        lat: pair[0],
        lng: pair[1],
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub description: String,
    pub place_id: String,
}

impl SuggestResponse {
    /// Non-"OK" status is an error the caller logs and degrades to an empty
    /// suggestion list; it is never shown to the user.
    pub fn into_suggestions(self) -> Result<Vec<PlaceSuggestion>, String> {
        if self.status != "OK" {
            return Err(proxy_error(&self.status, self.error_message));
        }
        Ok(self
            .predictions
            .into_iter()
            .map(|prediction| PlaceSuggestion {
                label: prediction.description,
                external_id: prediction.place_id,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: Coordinate,
}

impl GeocodeResponse {
    /// First result wins. Any failure leaves the endpoint unresolved; the
    /// caller must not fall back to a previously resolved coordinate.
    pub fn into_coordinate(self) -> Result<Coordinate, String> {
        if self.status != "OK" {
            return Err(proxy_error(&self.status, self.error_message));
        }
        let location = self
            .results
            .first()
            .map(|result| result.geometry.location)
            .ok_or_else(|| "geocode response with empty results".to_string())?;
        if !location.is_valid() {
            return Err(format!(
                "geocode returned out-of-range coordinate ({}, {})",
                location.lat, location.lng
            ));
        }
        Ok(location)
    }
}

fn proxy_error(status: &str, error_message: Option<String>) -> String {
    match error_message {
        Some(message) => format!("proxy status {status}: {message}"),
        None => format!("proxy status {status}"),
    }
}
