use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::latlng::LatLng;
use crate::routing::{slice_segments, RoutePath, RoutingError};
use crate::station::Station;
use crate::store::StoredRecord;

/// Instruction texts the provider emits when a leg is done.
const LEG_END_MARKERS: [&str; 2] = ["Waypoint", "Arrive at destination"];

/// A single routing step. Only `distance` and `text` carry meaning for
/// the planner; whatever else the provider sends along is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourInstruction {
    pub distance: f64,
    pub text: String,

    #[serde(flatten)]
    pub extra: JsonObject,
}

impl TourInstruction {
    /// Whether this step closes out the current leg.
    pub fn is_leg_end(&self) -> bool {
        LEG_END_MARKERS
            .iter()
            .any(|marker| self.text.starts_with(marker))
    }
}

/// An ordered sequence of stations connected by a routed path.
///
/// `segments` holds one polyline per leg between consecutive stations,
/// so a well-formed tour always satisfies
/// `segments.len() == stations.len() - 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tour {
    pub name: String,
    pub stations: Vec<Station>,
    pub segments: Vec<Vec<LatLng>>,
    pub instructions: Vec<TourInstruction>,
    pub distance: f64,

    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The waypoint list sent to the routing provider, one coordinate per
/// station in visiting order. None when a station has no usable waypoint
/// (an empty polygon).
pub fn routing_waypoints(stations: &[Station]) -> Option<Vec<LatLng>> {
    stations
        .iter()
        .map(|station| station.routing_waypoint())
        .collect()
}

impl Tour {
    /// Assembles a tour from the provider's routed path.
    ///
    /// The path must carry exactly one snapped waypoint per station;
    /// anything else means the provider answered for a different request
    /// and the build fails rather than producing a tour with shifted
    /// legs.
    pub fn from_route(
        name: &str,
        stations: Vec<Station>,
        path: &RoutePath,
    ) -> Result<Tour, RoutingError> {
        if path.snapped_waypoints.coordinates.len() != stations.len() {
            return Err(RoutingError::MalformedResponse(format!(
                "expected {} snapped waypoints, provider returned {}",
                stations.len(),
                path.snapped_waypoints.coordinates.len()
            )));
        }

        let segments = slice_segments(&path.points.coordinates, &path.snapped_waypoints.coordinates);

        Ok(Tour {
            name: name.to_string(),
            stations,
            segments,
            instructions: path.instructions.clone(),
            distance: path.distance,
            id: None,
        })
    }

    /// Recovers one distance per leg from the instruction stream.
    ///
    /// Step distances accumulate until a marker instruction ("Waypoint
    /// ...", "Arrive at destination") closes the running leg. Display
    /// only; the stored total comes from the provider.
    pub fn leg_distances(&self) -> Vec<f64> {
        let mut legs = Vec::new();
        let mut running = 0.0;

        for step in &self.instructions {
            if step.is_leg_end() {
                legs.push(running);
                running = 0.0;
            } else {
                running += step.distance;
            }
        }

        legs
    }

    pub fn references_station(&self, station_id: &str) -> bool {
        self.stations
            .iter()
            .any(|station| station.id.as_deref() == Some(station_id))
    }
}

impl StoredRecord for Tour {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn assign_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl Into<FeatureCollection> for Tour {
    fn into(self) -> FeatureCollection {
        let mut features = self
            .stations
            .iter()
            .map(|station| station.clone().into())
            .collect::<Vec<Feature>>();

        for (index, ((from, to), segment)) in self
            .stations
            .iter()
            .tuple_windows()
            .zip(self.segments.iter())
            .enumerate()
        {
            let line = Geometry::new(Value::LineString(
                segment.iter().map(|point| point.to_lnglat()).collect(),
            ));

            let mut properties = JsonObject::new();
            properties.insert("leg".to_string(), JsonValue::from(index));
            properties.insert("from".to_string(), JsonValue::from(from.properties.name.clone()));
            properties.insert("to".to_string(), JsonValue::from(to.properties.name.clone()));

            features.push(Feature {
                bbox: None,
                geometry: Some(line),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}
