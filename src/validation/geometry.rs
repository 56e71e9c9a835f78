use regex::Regex;
use serde_json::Value;

use super::ValidationReport;

/// Validates the geometry block of a station payload.
///
/// The `type` discriminant selects which coordinate shape applies; when
/// the discriminant itself is broken no coordinate check runs, since
/// there is no shape to check against.
pub struct GeometryValidator {
    float_literal: Regex,
}

impl GeometryValidator {
    pub fn new() -> GeometryValidator {
        GeometryValidator {
            float_literal: Regex::new(r"\d+\.\d+").unwrap(),
        }
    }

    pub fn validate(&self, geometry: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(&mut report, geometry, "geometry");
        report
    }

    /// Validates into an existing report so station and tour payloads can
    /// aggregate geometry errors alongside their own.
    pub(crate) fn validate_into(&self, report: &mut ValidationReport, geometry: &Value, path: &str) {
        let coordinates_path = format!("{path}.coordinates");

        match geometry.get("type").and_then(Value::as_str) {
            Some("Point") => {
                self.validate_point(report, geometry.get("coordinates"), &coordinates_path)
            }
            Some("Polygon") => {
                self.validate_polygon(report, geometry.get("coordinates"), &coordinates_path)
            }
            _ => {
                report.push(
                    &format!("{path}.type"),
                    "must be \"Point\" or \"Polygon\"",
                    geometry.get("type"),
                );
            }
        }
    }

    fn validate_point(&self, report: &mut ValidationReport, coordinates: Option<&Value>, path: &str) {
        let pair = match coordinates.and_then(Value::as_array) {
            Some(pair) => pair,
            None => {
                report.push(path, "must be a [lat, lng] pair", coordinates);
                return;
            }
        };

        if pair.len() != 2 {
            report.push(path, "must contain exactly two coordinates", coordinates);
            return;
        }

        match (pair[0].as_f64(), pair[1].as_f64()) {
            (Some(latitude), Some(longitude)) => {
                let in_range = (-90.0..=90.0).contains(&latitude)
                    && (-180.0..=180.0).contains(&longitude);
                if !in_range {
                    report.push(
                        path,
                        "latitude must be within [-90, 90] and longitude within [-180, 180]",
                        coordinates,
                    );
                }
            }
            _ => report.push(path, "coordinates must be numbers", coordinates),
        }
    }

    fn validate_polygon(
        &self,
        report: &mut ValidationReport,
        coordinates: Option<&Value>,
        path: &str,
    ) {
        let rings = match coordinates.and_then(Value::as_array) {
            Some(rings) => rings,
            None => {
                report.push(path, "must be an array of rings", coordinates);
                return;
            }
        };

        // only a single outer ring is stored
        if rings.len() != 1 {
            report.push(path, "must contain exactly one ring", coordinates);
            return;
        }

        let ring = match rings[0].as_array() {
            Some(ring) => ring,
            None => {
                report.push(path, "ring must be an array of [lat, lng] pairs", coordinates);
                return;
            }
        };

        for vertex in ring {
            let pair = match vertex.as_array() {
                Some(pair) if pair.len() == 2 => pair,
                _ => {
                    report.push(path, "every vertex must be a [lat, lng] pair", Some(vertex));
                    return;
                }
            };

            for coordinate in pair {
                if !self.is_float_literal(coordinate) {
                    report.push(
                        path,
                        "coordinates must be floating point numbers",
                        Some(vertex),
                    );
                    return;
                }
            }
        }
    }

    /// Polygon vertices must read as decimal literals. The serialized
    /// form of the value is matched, so `52.0` passes while a bare `52`
    /// or a non-numeric string does not.
    fn is_float_literal(&self, value: &Value) -> bool {
        match value {
            Value::Number(_) | Value::String(_) => self.float_literal.is_match(&value.to_string()),
            _ => false,
        }
    }
}

impl Default for GeometryValidator {
    fn default() -> GeometryValidator {
        GeometryValidator::new()
    }
}
