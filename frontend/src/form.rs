use shared::{Coordinate, ElevationBand, Preference, PriorityFactor, RouteConstraints, RouteError};

use crate::config::ConstraintMode;

/// User-entered routing parameters. Every edit produces a fresh snapshot;
/// nothing here touches the network. Endpoint coordinates live in the
/// endpoint slots, not the form.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintForm {
    pub distance: String,
    pub elevation_band: ElevationBand,
    pub poi_minimum: String,
    pub priority_factor: PriorityFactor,
    pub elevation_preference: Preference,
    pub poi_preference: Preference,
}

impl Default for ConstraintForm {
    fn default() -> Self {
        Self {
            distance: String::new(),
            elevation_band: ElevationBand::default(),
            poi_minimum: "0".to_string(),
            priority_factor: PriorityFactor::default(),
            elevation_preference: Preference::default(),
            poi_preference: Preference::default(),
        }
    }
}

impl ConstraintForm {
    pub fn with_distance(mut self, value: String) -> Self {
        self.distance = value;
        self
    }

    pub fn with_elevation_band(mut self, band: ElevationBand) -> Self {
        self.elevation_band = band;
        self
    }

    pub fn with_poi_minimum(mut self, value: String) -> Self {
        self.poi_minimum = value;
        self
    }

    pub fn with_priority_factor(mut self, factor: PriorityFactor) -> Self {
        self.priority_factor = factor;
        self
    }

    pub fn with_elevation_preference(mut self, preference: Preference) -> Self {
        self.elevation_preference = preference;
        self
    }

    pub fn with_poi_preference(mut self, preference: Preference) -> Self {
        self.poi_preference = preference;
        self
    }

    /// Freeze the snapshot into constraints for one request.
    ///
    /// Distance is strict: it must parse to a number greater than zero or
    /// the submission is rejected locally. The minimum-POI field is
    /// deliberately permissive and falls back to 0 on a parse failure.
    pub fn freeze(
        &self,
        mode: ConstraintMode,
        source: Coordinate,
        target: Coordinate,
    ) -> Result<RouteConstraints, RouteError> {
        let target_distance_km = self
            .distance
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|distance| *distance > 0.0)
            .ok_or_else(|| {
                RouteError::Validation("Please enter a valid distance in km.".to_string())
            })?;

        Ok(match mode {
            ConstraintMode::Bucketed => RouteConstraints::Bucketed {
                source,
                target,
                target_distance_km,
                elevation_band: self.elevation_band,
                poi_minimum: self.poi_minimum.trim().parse().unwrap_or(0),
                priority_factor: self.priority_factor,
            },
            ConstraintMode::Preference => RouteConstraints::Preference {
                source,
                target,
                target_distance_km,
                elevation_preference: self.elevation_preference,
                poi_preference: self.poi_preference,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> (Coordinate, Coordinate) {
        (
            Coordinate { lat: 49.2292, lng: -122.9932 },
            Coordinate { lat: 49.2813912, lng: -123.1217871 },
        )
    }

    #[test]
    fn test_freeze_valid_bucketed_form() {
        let (source, target) = endpoints();
        let form = ConstraintForm::default()
            .with_distance("5".to_string())
            .with_poi_minimum("3".to_string())
            .with_priority_factor(PriorityFactor::Poi);

        let constraints = form.freeze(ConstraintMode::Bucketed, source, target).unwrap();
        match constraints {
            RouteConstraints::Bucketed {
                target_distance_km,
                poi_minimum,
                priority_factor,
                ..
            } => {
                assert_eq!(target_distance_km, 5.0);
                assert_eq!(poi_minimum, 3);
                assert_eq!(priority_factor, PriorityFactor::Poi);
            }
            RouteConstraints::Preference { .. } => panic!("expected bucketed constraints"),
        }
    }

    #[test]
    fn test_freeze_rejects_non_numeric_distance() {
        let (source, target) = endpoints();
        let form = ConstraintForm::default().with_distance("five".to_string());
        let result = form.freeze(ConstraintMode::Bucketed, source, target);
        assert!(matches!(result, Err(RouteError::Validation(_))));
    }

    #[test]
    fn test_freeze_rejects_zero_and_negative_distance() {
        let (source, target) = endpoints();
        for input in ["0", "-2", ""] {
            let form = ConstraintForm::default().with_distance(input.to_string());
            let result = form.freeze(ConstraintMode::Bucketed, source, target);
            assert!(
                matches!(result, Err(RouteError::Validation(_))),
                "distance input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_freeze_defaults_unparseable_poi_minimum_to_zero() {
        let (source, target) = endpoints();
        let form = ConstraintForm::default()
            .with_distance("5".to_string())
            .with_poi_minimum("many".to_string());

        let constraints = form.freeze(ConstraintMode::Bucketed, source, target).unwrap();
        match constraints {
            RouteConstraints::Bucketed { poi_minimum, .. } => assert_eq!(poi_minimum, 0),
            RouteConstraints::Preference { .. } => panic!("expected bucketed constraints"),
        }
    }

    #[test]
    fn test_freeze_preference_mode_ignores_bucket_fields() {
        let (source, target) = endpoints();
        let form = ConstraintForm::default()
            .with_distance("8.5".to_string())
            .with_elevation_preference(Preference::Min);

        let constraints = form
            .freeze(ConstraintMode::Preference, source, target)
            .unwrap();
        match constraints {
            RouteConstraints::Preference {
                target_distance_km,
                elevation_preference,
                poi_preference,
                ..
            } => {
                assert_eq!(target_distance_km, 8.5);
                assert_eq!(elevation_preference, Preference::Min);
                assert_eq!(poi_preference, Preference::Max);
            }
            RouteConstraints::Bucketed { .. } => panic!("expected preference constraints"),
        }
    }

    #[test]
    fn test_edits_do_not_mutate_previous_snapshot() {
        let original = ConstraintForm::default().with_distance("5".to_string());
        let edited = original.clone().with_distance("7".to_string());
        assert_eq!(original.distance, "5");
        assert_eq!(edited.distance, "7");
    }
}
