use regex::Regex;
use serde_json::Value;
use url::Url;

use super::{FieldChecker, GeometryValidator, ValidationReport};

/// Validates a full station payload.
///
/// All independent fields aggregate into one report; a payload with a
/// broken name and a broken geometry comes back with both errors.
pub struct StationValidator {
    geometry: GeometryValidator,
    safe_text: Regex,
    strict: bool,
}

impl StationValidator {
    pub fn new() -> StationValidator {
        StationValidator {
            geometry: GeometryValidator::new(),
            safe_text: Regex::new(r"^[A-Za-z0-9 _-]+$").unwrap(),
            strict: false,
        }
    }

    /// Browser-facing variant: restricts names and descriptions to
    /// alphanumerics plus space, dash and underscore.
    pub fn strict() -> StationValidator {
        StationValidator {
            strict: true,
            ..StationValidator::new()
        }
    }

    pub fn validate(&self, station: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(&mut report, station, "");
        report
    }

    /// Validates into an existing report, prefixing every error path, so
    /// the tour validator can address `stations[2].properties.name`.
    pub(crate) fn validate_into(&self, report: &mut ValidationReport, station: &Value, prefix: &str) {
        let path = |field: &str| {
            if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            }
        };

        FieldChecker::new(report, &path("type")).check(
            station.get("type").and_then(Value::as_str) == Some("Feature"),
            "must be \"Feature\"",
            station.get("type"),
        );

        let properties = station.get("properties");
        self.validate_text(
            report,
            properties.and_then(|p| p.get("name")),
            &path("properties.name"),
        );
        self.validate_text(
            report,
            properties.and_then(|p| p.get("description")),
            &path("properties.description"),
        );
        self.validate_url(
            report,
            properties.and_then(|p| p.get("url")),
            &path("properties.url"),
        );

        match station.get("geometry") {
            Some(geometry) => self.geometry.validate_into(report, geometry, &path("geometry")),
            None => report.push(&path("geometry"), "is required", None),
        }
    }

    fn validate_text(&self, report: &mut ValidationReport, value: Option<&Value>, path: &str) {
        let text = value.and_then(Value::as_str);

        FieldChecker::new(report, path)
            .check(text.is_some(), "is required", value)
            .check(
                text.map(|t| !t.trim().is_empty()).unwrap_or(false),
                "must not be empty",
                value,
            )
            .check(
                !self.strict || text.map(|t| self.safe_text.is_match(t)).unwrap_or(false),
                "may only contain letters, digits, spaces, dashes and underscores",
                value,
            );
    }

    /// An absent or empty url is fine; anything else must parse as an
    /// absolute URL with a host.
    fn validate_url(&self, report: &mut ValidationReport, value: Option<&Value>, path: &str) {
        let value = match value {
            Some(value) if !value.is_null() => value,
            _ => return,
        };

        if value.as_str().map(str::is_empty).unwrap_or(false) {
            return;
        }

        let absolute = value
            .as_str()
            .and_then(|text| Url::parse(text).ok())
            .map(|url| url.has_host())
            .unwrap_or(false);

        FieldChecker::new(report, path).check(absolute, "must be an absolute URL", Some(value));
    }
}

impl Default for StationValidator {
    fn default() -> StationValidator {
        StationValidator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dom_payload() -> Value {
        json!({
            "type": "Feature",
            "properties": {
                "name": "St. Paulus Dom",
                "description": "Kathedralkirche des Bistums",
                "url": "https://de.wikipedia.org/wiki/St.-Paulus-Dom"
            },
            "geometry": {
                "type": "Point",
                "coordinates": [51.9626, 7.6256]
            }
        })
    }

    #[test]
    fn a_complete_station_is_clean() {
        let report = StationValidator::new().validate(&dom_payload());
        assert!(!report.has_error());
    }

    #[test]
    fn validation_is_idempotent() {
        let validator = StationValidator::new();
        let payload = dom_payload();

        let first = validator.validate(&payload);
        let second = validator.validate(&payload);

        assert!(!first.has_error());
        assert_eq!(first, second);
    }

    #[test]
    fn independent_errors_aggregate() {
        let report = StationValidator::new().validate(&json!({
            "type": "Feature",
            "properties": {
                "name": "",
                "description": "Noch da"
            },
            "geometry": {
                "type": "Line",
                "coordinates": [51.96, 7.59]
            }
        }));

        assert!(report.errors.len() >= 2);
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"properties.name"));
        assert!(paths.contains(&"geometry.type"));
    }

    #[test]
    fn the_feature_type_is_fixed() {
        let mut payload = dom_payload();
        payload["type"] = json!("FeatureCollection");

        let report = StationValidator::new().validate(&payload);
        assert_eq!(report.errors[0].path, "type");
    }

    #[test]
    fn an_empty_url_counts_as_absent() {
        let mut payload = dom_payload();
        payload["properties"]["url"] = json!("");
        assert!(!StationValidator::new().validate(&payload).has_error());

        payload["properties"]["url"] = json!("wiki/St.-Paulus-Dom");
        let report = StationValidator::new().validate(&payload);
        assert!(report.has_error());
        assert_eq!(report.errors[0].path, "properties.url");
    }

    #[test]
    fn strict_mode_rejects_unsafe_names() {
        let mut payload = dom_payload();
        payload["properties"]["name"] = json!("Dom <script>");
        payload["properties"]["description"] = json!("Sicherer Text");

        assert!(StationValidator::strict().validate(&payload).has_error());
        // the default schema keeps accepting it
        assert!(!StationValidator::new().validate(&payload).has_error());
    }

    #[test]
    fn missing_geometry_is_reported_once() {
        let report = StationValidator::new().validate(&json!({
            "type": "Feature",
            "properties": { "name": "Dom", "description": "Kirche" }
        }));

        let geometry_errors: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.path.starts_with("geometry"))
            .collect();
        assert_eq!(geometry_errors.len(), 1);
    }
}
