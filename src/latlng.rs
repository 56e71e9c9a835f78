use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A single coordinate in the stored latitude-first convention.
///
/// Payloads and persisted records carry coordinates as plain `[lat, lng]`
/// arrays, so the serde representation is a two element sequence rather
/// than a keyed object.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> LatLng {
        LatLng {
            latitude,
            longitude,
        }
    }

    /// Routing providers hand out longitude-first pairs.
    pub fn from_lnglat(pair: [f64; 2]) -> LatLng {
        LatLng::new(pair[1], pair[0])
    }

    /// GeoJSON positions are longitude-first.
    pub fn to_lnglat(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }

    pub fn in_range(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Great circle distance to another coordinate in meters.
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let source_lat = self.latitude.to_radians();
        let source_lon = self.longitude.to_radians();
        let dest_lat = other.latitude.to_radians();
        let dest_lon = other.longitude.to_radians();

        // Compute using the haversine formula
        let d_lat = dest_lat - source_lat;
        let d_lon = dest_lon - source_lon;

        let a = (d_lat * 0.5).powf(2.0).sin()
            + source_lat.cos() * dest_lat.cos() * (d_lon * 0.5).powf(2.0).sin();
        let c = 2.0 * a.sqrt().asin();

        c * EARTH_RADIUS_METERS
    }
}

impl Serialize for LatLng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.latitude)?;
        seq.serialize_element(&self.longitude)?;
        seq.end()
    }
}

struct LatLngVisitor;

impl<'de> Visitor<'de> for LatLngVisitor {
    type Value = LatLng;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a [lat, lng] pair")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let latitude = seq
            .next_element::<f64>()?
            .ok_or_else(|| serde::de::Error::custom("missing latitude"))?;
        let longitude = seq
            .next_element::<f64>()?
            .ok_or_else(|| serde::de::Error::custom("missing longitude"))?;

        if seq.next_element::<f64>()?.is_some() {
            return Err(serde::de::Error::custom(
                "coordinate pair with more than two entries",
            ));
        }

        Ok(LatLng::new(latitude, longitude))
    }
}

impl<'de> Deserialize<'de> for LatLng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(LatLngVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::LatLng;
    use approx::assert_relative_eq;

    #[test]
    fn provider_pairs_are_flipped() {
        let coordinate = LatLng::from_lnglat([7.6261, 51.9607]);
        assert_relative_eq!(coordinate.latitude, 51.9607);
        assert_relative_eq!(coordinate.longitude, 7.6261);
        assert_eq!(coordinate.to_lnglat(), vec![7.6261, 51.9607]);
    }

    #[test]
    fn range_check() {
        assert!(LatLng::new(51.96, 7.59).in_range());
        assert!(!LatLng::new(200.0, 7.59).in_range());
        assert!(!LatLng::new(51.96, -181.0).in_range());
    }

    #[test]
    fn serializes_as_pair() {
        let coordinate = LatLng::new(51.96, 7.59);
        let rendered = serde_json::to_string(&coordinate).unwrap();
        assert_eq!(rendered, "[51.96,7.59]");

        let restored: LatLng = serde_json::from_str("[51.96,7.59]").unwrap();
        assert_eq!(restored, coordinate);

        assert!(serde_json::from_str::<LatLng>("[51.96,7.59,0.0]").is_err());
    }

    #[test]
    fn distance_between_cathedral_and_castle() {
        let cathedral = LatLng::new(51.9626, 7.6256);
        let castle = LatLng::new(51.9636, 7.6130);

        let meters = cathedral.distance_to(&castle);
        assert!(meters > 800.0 && meters < 1000.0);
    }
}
