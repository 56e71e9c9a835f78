use serde::Deserialize;
use std::fmt;

use crate::latlng::LatLng;
use crate::tour::TourInstruction;

#[derive(Clone, Debug)]
pub enum RoutingError {
    /// The provider could not find a route between the waypoints.
    NoRoute(String),
    /// The provider answered with something outside its response contract.
    MalformedResponse(String),
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::NoRoute(message) => write!(f, "no route found: {}", message),
            RoutingError::MalformedResponse(message) => {
                write!(f, "malformed routing response: {}", message)
            }
        }
    }
}

/// Raw coordinate list as the routing provider returns it, pairs in
/// longitude-first order.
#[derive(Debug, Clone, Deserialize)]
pub struct PointList {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutePath {
    pub points: PointList,
    pub snapped_waypoints: PointList,
    pub instructions: Vec<TourInstruction>,
    pub distance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub paths: Vec<RoutePath>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Parses a raw provider response body into its first path.
///
/// A body carrying `{"message": ...}` is the provider's error shape and
/// surfaces as [`RoutingError::NoRoute`]; the caller reports that as a
/// failed tour build and must not retry here.
pub fn parse_route_response(raw: &str) -> Result<RoutePath, RoutingError> {
    if let Ok(response) = serde_json::from_str::<RouteResponse>(raw) {
        return match response.paths.into_iter().next() {
            Some(path) => Ok(path),
            None => Err(RoutingError::NoRoute("response contained no paths".to_string())),
        };
    }

    match serde_json::from_str::<ProviderErrorBody>(raw) {
        Ok(body) => Err(RoutingError::NoRoute(body.message)),
        Err(err) => Err(RoutingError::MalformedResponse(err.to_string())),
    }
}

/// Splits the full route polyline into one segment per leg between
/// consecutive snapped waypoints, re-ordered to the stored lat-first
/// convention.
///
/// The walk visits the interior path points in order and closes the
/// running segment whenever a point equals the next unconsumed waypoint;
/// the boundary point is shared, seeding the following segment. The final
/// snapped waypoint closes the last segment. Waypoints are copied
/// verbatim out of the polyline by the provider, so plain value equality
/// is the boundary test. A waypoint snapped onto two identical
/// consecutive path points yields a degenerate two-point segment between
/// them; that input has not been observed in provider responses and is
/// passed through untouched.
///
/// For n snapped waypoints the result has n - 1 segments.
pub fn slice_segments(points: &[[f64; 2]], snapped_waypoints: &[[f64; 2]]) -> Vec<Vec<LatLng>> {
    if points.is_empty() || snapped_waypoints.is_empty() {
        return Vec::new();
    }

    let mut segments: Vec<Vec<LatLng>> = Vec::new();
    let mut current = vec![LatLng::from_lnglat(points[0])];

    // The first snapped waypoint is the route start itself.
    let mut next_waypoint = 1;

    let interior = points.iter().skip(1).take(points.len().saturating_sub(2));
    for point in interior {
        current.push(LatLng::from_lnglat(*point));

        if next_waypoint < snapped_waypoints.len() && *point == snapped_waypoints[next_waypoint] {
            segments.push(current);
            current = vec![LatLng::from_lnglat(*point)];
            next_waypoint += 1;
        }
    }

    if let Some(last) = snapped_waypoints.last() {
        current.push(LatLng::from_lnglat(*last));
    }
    segments.push(current);

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_splits_at_the_interior_waypoint() {
        let points = [
            [7.590, 51.960],
            [7.592, 51.961],
            [7.595, 51.962],
            [7.598, 51.963],
            [7.601, 51.964],
        ];
        let waypoints = [[7.590, 51.960], [7.595, 51.962], [7.601, 51.964]];

        let segments = slice_segments(&points, &waypoints);

        assert_eq!(segments.len(), waypoints.len() - 1);
        assert_eq!(segments[0].len(), 3);
        assert_eq!(segments[1].len(), 3);

        // the boundary point belongs to both legs, lat-first on output
        let boundary = LatLng::new(51.962, 7.595);
        assert_eq!(segments[0][2], boundary);
        assert_eq!(segments[1][0], boundary);

        // the last leg is closed by the final snapped waypoint
        assert_eq!(segments[1][2], LatLng::new(51.964, 7.601));
    }

    #[test]
    fn two_waypoints_make_a_single_segment() {
        let points = [[7.590, 51.960], [7.592, 51.961], [7.601, 51.964]];
        let waypoints = [[7.590, 51.960], [7.601, 51.964]];

        let segments = slice_segments(&points, &waypoints);

        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0],
            vec![
                LatLng::new(51.960, 7.590),
                LatLng::new(51.961, 7.592),
                LatLng::new(51.964, 7.601),
            ]
        );
    }

    #[test]
    fn empty_inputs_produce_no_segments() {
        assert!(slice_segments(&[], &[]).is_empty());
        assert!(slice_segments(&[[7.59, 51.96]], &[]).is_empty());
    }

    #[test]
    fn error_body_surfaces_as_no_route() {
        let err = parse_route_response(r#"{"message":"Cannot find point 1: 51.0,7.0"}"#)
            .expect_err("error body must not parse as a path");
        match err {
            RoutingError::NoRoute(message) => {
                assert!(message.contains("Cannot find point"))
            }
            _ => panic!("expected NoRoute"),
        }
    }

    #[test]
    fn garbage_surfaces_as_malformed_response() {
        let err = parse_route_response("<html>504</html>").expect_err("not a provider body");
        match err {
            RoutingError::MalformedResponse(_) => {}
            _ => panic!("expected MalformedResponse"),
        }
    }
}
