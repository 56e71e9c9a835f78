use regex::Regex;
use serde_json::Value;

use super::{FieldChecker, StationValidator, ValidationReport};

/// Validates a full tour payload.
///
/// Every top-level field is checked independently and all errors
/// aggregate; station entries are validated against the station schema
/// extended with a required, safely patterned `_id`.
pub struct TourValidator {
    station: StationValidator,
    no_whitespace: Regex,
    safe_id: Regex,
}

impl TourValidator {
    pub fn new() -> TourValidator {
        TourValidator {
            station: StationValidator::new(),
            no_whitespace: Regex::new(r"^\S+$").unwrap(),
            safe_id: Regex::new(r"^[A-Za-z0-9_-]+$").unwrap(),
        }
    }

    pub fn validate(&self, tour: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.validate_name(&mut report, tour.get("name"));
        self.validate_stations(&mut report, tour.get("stations"));
        self.validate_segments(&mut report, tour.get("segments"));
        self.validate_instructions(&mut report, tour.get("instructions"));

        FieldChecker::new(&mut report, "distance")
            .check(tour.get("distance").is_some(), "is required", None)
            .check(
                tour.get("distance").map(Value::is_number).unwrap_or(false),
                "must be a number",
                tour.get("distance"),
            );

        report
    }

    fn validate_name(&self, report: &mut ValidationReport, name: Option<&Value>) {
        let text = name.and_then(Value::as_str);

        FieldChecker::new(report, "name")
            .check(text.is_some(), "is required", name)
            .check(
                text.map(|t| self.no_whitespace.is_match(t)).unwrap_or(false),
                "must not be empty or contain whitespace",
                name,
            );
    }

    fn validate_stations(&self, report: &mut ValidationReport, stations: Option<&Value>) {
        let entries = match stations.and_then(Value::as_array) {
            Some(entries) => entries,
            None => {
                report.push("stations", "is required", stations);
                return;
            }
        };

        if entries.len() < 2 {
            report.push("stations", "a tour needs at least two stations", None);
            return;
        }

        for (index, entry) in entries.iter().enumerate() {
            let prefix = format!("stations[{index}]");
            self.station.validate_into(report, entry, &prefix);

            let id = entry.get("_id");
            FieldChecker::new(report, &format!("{prefix}._id"))
                .check(id.and_then(Value::as_str).is_some(), "is required", id)
                .check(
                    id.and_then(Value::as_str)
                        .map(|t| self.safe_id.is_match(t))
                        .unwrap_or(false),
                    "may only contain letters, digits, dashes and underscores",
                    id,
                );
        }
    }

    fn validate_segments(&self, report: &mut ValidationReport, segments: Option<&Value>) {
        let entries = match segments.and_then(Value::as_array) {
            Some(entries) => entries,
            None => {
                report.push("segments", "is required", segments);
                return;
            }
        };

        for (index, segment) in entries.iter().enumerate() {
            if !is_polyline(segment) {
                report.push(
                    &format!("segments[{index}]"),
                    "must be a sequence of [lat, lng] pairs",
                    Some(segment),
                );
            }
        }
    }

    fn validate_instructions(&self, report: &mut ValidationReport, instructions: Option<&Value>) {
        let entries = match instructions.and_then(Value::as_array) {
            Some(entries) => entries,
            None => {
                report.push("instructions", "is required", instructions);
                return;
            }
        };

        for (index, step) in entries.iter().enumerate() {
            let well_formed = step.get("distance").map(Value::is_number).unwrap_or(false)
                && step.get("text").map(Value::is_string).unwrap_or(false);
            if !well_formed {
                report.push(
                    &format!("instructions[{index}]"),
                    "must carry a numeric distance and a text",
                    Some(step),
                );
            }
        }
    }
}

fn is_polyline(value: &Value) -> bool {
    match value.as_array() {
        Some(points) => points.iter().all(|point| match point.as_array() {
            Some(pair) => pair.len() == 2 && pair.iter().all(Value::is_number),
            None => false,
        }),
        None => false,
    }
}

impl Default for TourValidator {
    fn default() -> TourValidator {
        TourValidator::new()
    }
}
