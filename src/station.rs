use geojson::{Feature, Geometry, JsonObject, JsonValue, Value};
use serde::{Deserialize, Serialize};

use crate::latlng::LatLng;
use crate::store::StoredRecord;

/// Geometry of a station feature.
///
/// The GeoJSON `type` field is the discriminant; polygon coordinates keep
/// the outer wrapping array of rings even though only a single outer ring
/// is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "coordinates")]
pub enum StationGeometry {
    Point(LatLng),
    Polygon(Vec<Vec<LatLng>>),
}

impl StationGeometry {
    /// The single coordinate handed to the routing provider for this
    /// geometry. Points route from themselves, polygons from their
    /// centroid. An empty polygon has no usable waypoint.
    pub fn routing_waypoint(&self) -> Option<LatLng> {
        match self {
            StationGeometry::Point(point) => Some(*point),
            StationGeometry::Polygon(rings) => polygon_centroid(rings),
        }
    }

    pub fn as_geojson(&self) -> Geometry {
        match self {
            StationGeometry::Point(point) => Geometry::new(Value::Point(point.to_lnglat())),
            StationGeometry::Polygon(rings) => Geometry::new(Value::Polygon(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(|vertex| vertex.to_lnglat()).collect())
                    .collect(),
            )),
        }
    }
}

/// Arithmetic mean of the outer ring vertices.
///
/// This is a plain vertex mean, not an area weighted centroid; irregular
/// or strongly non-convex rings pull it toward dense vertex runs. For the
/// purpose of snapping a routing waypoint that is accurate enough.
pub fn polygon_centroid(rings: &[Vec<LatLng>]) -> Option<LatLng> {
    let ring = rings.first()?;
    if ring.is_empty() {
        return None;
    }

    let count = ring.len() as f64;
    let latitude = ring.iter().map(|vertex| vertex.latitude).sum::<f64>() / count;
    let longitude = ring.iter().map(|vertex| vertex.longitude).sum::<f64>() / count;
    Some(LatLng::new(latitude, longitude))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationProperties {
    pub name: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A point or polygon of interest, stored as a GeoJSON-like feature.
///
/// The id is assigned by the store on insert and never changes afterwards;
/// geometry updates replace the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    #[serde(rename = "type")]
    pub feature_type: String,

    pub properties: StationProperties,

    pub geometry: StationGeometry,

    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Station {
    pub fn new(name: &str, description: &str, geometry: StationGeometry) -> Station {
        Station {
            feature_type: "Feature".to_string(),
            properties: StationProperties {
                name: name.to_string(),
                description: description.to_string(),
                url: None,
            },
            geometry,
            id: None,
        }
    }

    pub fn routing_waypoint(&self) -> Option<LatLng> {
        self.geometry.routing_waypoint()
    }
}

impl StoredRecord for Station {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn assign_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl Into<Feature> for Station {
    fn into(self) -> Feature {
        let geometry = self.geometry.as_geojson();

        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), JsonValue::from(self.properties.name));
        properties.insert(
            "description".to_string(),
            JsonValue::from(self.properties.description),
        );
        if let Some(url) = self.properties.url {
            properties.insert("url".to_string(), JsonValue::from(url));
        }
        if let Some(id) = self.id {
            properties.insert("id".to_string(), JsonValue::from(id));
        }

        Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Vec<LatLng>> {
        vec![vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(2.0, 2.0),
            LatLng::new(2.0, 0.0),
        ]]
    }

    #[test]
    fn centroid_of_square_is_its_middle() {
        let center = polygon_centroid(&unit_square()).unwrap();
        assert_relative_eq!(center.latitude, 1.0);
        assert_relative_eq!(center.longitude, 1.0);
    }

    #[test]
    fn centroid_of_empty_ring_is_none() {
        assert_eq!(polygon_centroid(&[]), None);
        assert_eq!(polygon_centroid(&[vec![]]), None);
    }

    #[test]
    fn point_stations_route_from_themselves() {
        let station = Station::new(
            "Rathaus",
            "Historisches Rathaus am Prinzipalmarkt",
            StationGeometry::Point(LatLng::new(51.9617, 7.6286)),
        );
        assert_eq!(
            station.routing_waypoint(),
            Some(LatLng::new(51.9617, 7.6286))
        );
    }

    #[test]
    fn polygon_stations_route_from_their_centroid() {
        let station = Station::new(
            "Schlossplatz",
            "Platz vor dem fürstbischöflichen Schloss",
            StationGeometry::Polygon(unit_square()),
        );
        assert_eq!(station.routing_waypoint(), Some(LatLng::new(1.0, 1.0)));
    }

    #[test]
    fn geometry_discriminant_round_trips() {
        let raw = r#"{"type":"Point","coordinates":[51.96,7.59]}"#;
        let geometry: StationGeometry = serde_json::from_str(raw).unwrap();
        assert_eq!(geometry, StationGeometry::Point(LatLng::new(51.96, 7.59)));

        let raw = r#"{"type":"Polygon","coordinates":[[[7.1,51.9],[7.2,51.9],[7.2,52.0]]]}"#;
        let geometry: StationGeometry = serde_json::from_str(raw).unwrap();
        match geometry {
            StationGeometry::Polygon(ref rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 3);
            }
            _ => panic!("expected a polygon"),
        }

        assert!(serde_json::from_str::<StationGeometry>(
            r#"{"type":"Line","coordinates":[[51.96,7.59]]}"#
        )
        .is_err());
    }

    #[test]
    fn station_exports_as_feature() {
        let mut station = Station::new(
            "St. Paulus Dom",
            "Kathedralkirche des Bistums",
            StationGeometry::Point(LatLng::new(51.9626, 7.6256)),
        );
        station.properties.url = Some("https://example.org/dom".to_string());
        station.id = Some("5".to_string());

        let feature: Feature = station.into();
        let properties = feature.properties.unwrap();
        assert_eq!(properties["name"], "St. Paulus Dom");
        assert_eq!(properties["id"], "5");
        assert_eq!(properties["url"], "https://example.org/dom");

        // GeoJSON keeps positions longitude-first
        match feature.geometry.unwrap().value {
            Value::Point(position) => assert_eq!(position, vec![7.6256, 51.9626]),
            _ => panic!("expected a point geometry"),
        }
    }
}
