use shared::RoutePath;

use crate::route::RequestState;

/// Sentinel shown for any metric the service did not supply and whenever
/// there is no current successful result.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub distance_km: String,
    pub elevation_change_m: String,
    pub poi_count: String,
}

impl Summary {
    pub fn unavailable() -> Self {
        Self {
            distance_km: NOT_AVAILABLE.to_string(),
            elevation_change_m: NOT_AVAILABLE.to_string(),
            poi_count: NOT_AVAILABLE.to_string(),
        }
    }

    fn from_path(path: &RoutePath) -> Self {
        let metric = |value: Option<f64>| {
            value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v}"))
        };
        Self {
            distance_km: metric(path.total_distance_km),
            elevation_change_m: metric(path.elevation_change_m),
            poi_count: path
                .poi_count
                .map_or_else(|| NOT_AVAILABLE.to_string(), |count| count.to_string()),
        }
    }
}

/// Metrics track the request state alone: anything but `Succeeded` resets
/// every displayed value to the sentinel, never a blank or a stale number.
pub fn project(state: &RequestState) -> Summary {
    match state {
        RequestState::Succeeded(path) => Summary::from_path(path),
        _ => Summary::unavailable(),
    }
}
