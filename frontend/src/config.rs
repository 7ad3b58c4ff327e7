/// How endpoint positions are entered: raw lat/lng fields, or free-text
/// place search with autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointEntry {
    Coordinates,
    PlaceSearch,
}

/// Which `RouteConstraints` variant this deployment exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintMode {
    Bucketed,
    Preference,
}

/// Marker and polyline styling handed to the map module at construction.
/// Immutable by design: the map never mutates shared defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarkerStyle {
    pub endpoint_icon: String,
    pub poi_icon: String,
    pub polyline_color: String,
    pub polyline_weight: u32,
    pub polyline_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            endpoint_icon: "marker-icon".to_string(),
            poi_icon: "marker-icon".to_string(),
            polyline_color: "blue".to_string(),
            polyline_weight: 4,
            polyline_opacity: 0.7,
        }
    }
}

/// Debounce window for suggestion queries. Fixed; typing within the window
/// supersedes the pending query.
pub const SUGGEST_DEBOUNCE_MS: u32 = 300;

/// Every network call is bounded by this timeout; expiry is handled the
/// same as any other transport failure.
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub route_api: String,
    pub suggest_api: String,
    pub geocode_api: String,
    pub entry_mode: EndpointEntry,
    pub constraint_mode: ConstraintMode,
    pub marker_style: MarkerStyle,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            route_api: env_url("http://127.0.0.1:5000/route", option_env!("FRONTEND_ROUTE_API")),
            suggest_api: env_url(
                "http://127.0.0.1:3000/suggest",
                option_env!("FRONTEND_SUGGEST_API"),
            ),
            geocode_api: env_url(
                "http://127.0.0.1:3000/geocode",
                option_env!("FRONTEND_GEOCODE_API"),
            ),
            entry_mode: match option_env!("FRONTEND_ENTRY_MODE") {
                Some("search") => EndpointEntry::PlaceSearch,
                _ => EndpointEntry::Coordinates,
            },
            constraint_mode: match option_env!("FRONTEND_CONSTRAINT_MODE") {
                Some("preference") => ConstraintMode::Preference,
                _ => ConstraintMode::Bucketed,
            },
            marker_style: MarkerStyle::default(),
        }
    }
}

fn env_url(default: &str, value: Option<&str>) -> String {
    match value {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_url_strips_trailing_slash() {
        assert_eq!(env_url("http://a", Some("http://b/route/")), "http://b/route");
        assert_eq!(env_url("http://a", None), "http://a");
    }

    #[test]
    fn test_marker_style_polyline_defaults() {
        let style = MarkerStyle::default();
        assert_eq!(style.polyline_color, "blue");
        assert_eq!(style.polyline_weight, 4);
        assert_eq!(style.polyline_opacity, 0.7);
    }
}
