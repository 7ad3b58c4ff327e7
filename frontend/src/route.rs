use shared::{wire, Coordinate, RouteError, RoutePath};

use crate::config::ConstraintMode;
use crate::form::ConstraintForm;

/// Lifecycle of the current route request. Written only by the planner.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Validating,
    InFlight,
    Succeeded(RoutePath),
    Failed(RouteError),
}

/// Owns the route request lifecycle. Route requests are single-flight: a
/// new submission supersedes any pending one, and a late response for a
/// superseded request is discarded by sequence comparison.
#[derive(Debug, Default)]
pub struct RoutePlanner {
    state: RequestState,
    flight_seq: u64,
}

impl RoutePlanner {
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Validate and open a new flight. On a validation failure the state
    /// lands in `Failed` and no network call may be made; otherwise the
    /// caller must issue the returned request under the returned sequence.
    pub fn begin(
        &mut self,
        source: Option<Coordinate>,
        target: Option<Coordinate>,
        form: &ConstraintForm,
        mode: ConstraintMode,
    ) -> Result<(u64, wire::RouteRequest), RouteError> {
        self.state = RequestState::Validating;
        match self.validate(source, target, form, mode) {
            Ok(request) => {
                self.flight_seq += 1;
                self.state = RequestState::InFlight;
                Ok((self.flight_seq, request))
            }
            Err(err) => {
                // A rejected submission still supersedes any pending
                // flight; its late response must not overwrite this failure.
                self.flight_seq += 1;
                self.state = RequestState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn validate(
        &self,
        source: Option<Coordinate>,
        target: Option<Coordinate>,
        form: &ConstraintForm,
        mode: ConstraintMode,
    ) -> Result<wire::RouteRequest, RouteError> {
        let (Some(source), Some(target)) = (source, target) else {
            return Err(RouteError::Validation(
                "Select both a start and an end point.".to_string(),
            ));
        };
        let constraints = form.freeze(mode, source, target)?;
        Ok(constraints.to_wire())
    }

    /// Fold a response back into the state. Returns false when the response
    /// belongs to a superseded flight and was discarded.
    pub fn complete(&mut self, seq: u64, outcome: Result<RoutePath, RouteError>) -> bool {
        if seq != self.flight_seq {
            return false;
        }
        self.state = match outcome {
            Ok(path) => RequestState::Succeeded(path),
            Err(err) => RequestState::Failed(err),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConstraintMode;

    fn endpoints() -> (Option<Coordinate>, Option<Coordinate>) {
        (
            Some(Coordinate { lat: 49.2292, lng: -122.9932 }),
            Some(Coordinate { lat: 49.2813912, lng: -123.1217871 }),
        )
    }

    fn valid_form() -> ConstraintForm {
        ConstraintForm::default().with_distance("5".to_string())
    }

    fn path() -> RoutePath {
        RoutePath {
            segments: vec![
                Coordinate { lat: 49.2292, lng: -122.9932 },
                Coordinate { lat: 49.2813912, lng: -123.1217871 },
            ],
            total_distance_km: Some(5.1),
            elevation_change_m: Some(120.0),
            poi_count: Some(2),
            poi_nodes: vec![],
        }
    }

    #[test]
    fn test_begin_with_valid_input_goes_in_flight() {
        let mut planner = RoutePlanner::default();
        let (source, target) = endpoints();
        let (seq, request) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();
        assert_eq!(seq, 1);
        assert_eq!(request.input_distance, 5.0);
        assert_eq!(planner.state(), &RequestState::InFlight);
    }

    #[test]
    fn test_begin_without_endpoints_fails_locally() {
        let mut planner = RoutePlanner::default();
        let (source, _) = endpoints();
        let result = planner.begin(source, None, &valid_form(), ConstraintMode::Bucketed);
        assert!(result.is_err());
        assert!(matches!(
            planner.state(),
            RequestState::Failed(RouteError::Validation(_))
        ));
    }

    #[test]
    fn test_begin_with_bad_distance_fails_locally() {
        let mut planner = RoutePlanner::default();
        let (source, target) = endpoints();
        let form = ConstraintForm::default().with_distance("-1".to_string());
        assert!(planner
            .begin(source, target, &form, ConstraintMode::Bucketed)
            .is_err());
        assert!(matches!(
            planner.state(),
            RequestState::Failed(RouteError::Validation(_))
        ));
    }

    #[test]
    fn test_second_submission_supersedes_first() {
        let mut planner = RoutePlanner::default();
        let (source, target) = endpoints();
        let (r1, _) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();
        let (r2, _) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();

        // r2 resolves first; r1's late failure must not overwrite it.
        assert!(planner.complete(r2, Ok(path())));
        assert!(!planner.complete(r1, Err(RouteError::transport("late"))));
        assert!(matches!(planner.state(), RequestState::Succeeded(_)));
    }

    #[test]
    fn test_superseded_success_is_discarded_too() {
        let mut planner = RoutePlanner::default();
        let (source, target) = endpoints();
        let (r1, _) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();
        let (r2, _) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();

        assert!(planner.complete(r2, Err(RouteError::NoRoute("No path found".to_string()))));
        assert!(!planner.complete(r1, Ok(path())));
        assert_eq!(
            planner.state(),
            &RequestState::Failed(RouteError::NoRoute("No path found".to_string()))
        );
    }

    #[test]
    fn test_validation_failure_supersedes_pending_flight() {
        let mut planner = RoutePlanner::default();
        let (source, target) = endpoints();
        let (r1, _) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();

        let bad_form = ConstraintForm::default().with_distance("nope".to_string());
        assert!(planner
            .begin(source, target, &bad_form, ConstraintMode::Bucketed)
            .is_err());

        // r1 is still pending; its late success must not replace the
        // validation failure shown for the newer submission.
        assert!(!planner.complete(r1, Ok(path())));
        assert!(matches!(
            planner.state(),
            RequestState::Failed(RouteError::Validation(_))
        ));
    }

    #[test]
    fn test_no_route_and_transport_failures_stay_distinguishable() {
        let mut planner = RoutePlanner::default();
        let (source, target) = endpoints();

        let (seq, _) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();
        planner.complete(seq, Err(RouteError::NoRoute("No path found".to_string())));
        match planner.state() {
            RequestState::Failed(err) => assert_eq!(err.to_string(), "No path found"),
            other => panic!("expected failed state, got {other:?}"),
        }

        let (seq, _) = planner
            .begin(source, target, &valid_form(), ConstraintMode::Bucketed)
            .unwrap();
        planner.complete(seq, Err(RouteError::transport("status 502")));
        match planner.state() {
            RequestState::Failed(err) => assert_eq!(err.to_string(), "Error fetching the route."),
            other => panic!("expected failed state, got {other:?}"),
        }
    }
}
