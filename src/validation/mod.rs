pub mod geometry;
pub mod station;
pub mod tour;

pub use geometry::GeometryValidator;
pub use station::StationValidator;
pub use tour::TourValidator;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A single field-level violation, addressable back to the form control
/// that produced it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    pub path: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// Collected outcome of validating one payload.
///
/// Every independent field contributes its own errors; a rejected
/// payload reports all of them in one pass instead of stopping at the
/// first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ErrorDetail>,
}

impl ValidationReport {
    pub fn new() -> ValidationReport {
        ValidationReport { errors: Vec::new() }
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn push(&mut self, path: &str, message: &str, context: Option<&Value>) {
        self.errors.push(ErrorDetail {
            path: path.to_string(),
            message: message.to_string(),
            context: context.cloned(),
        });
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }
}

impl Serialize for ValidationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = if self.has_error() { 2 } else { 1 };
        let mut state = serializer.serialize_struct("ValidationReport", fields)?;
        state.serialize_field("hasError", &self.has_error())?;
        if self.has_error() {
            state.serialize_field("errorDetails", &self.errors)?;
        }
        state.end()
    }
}

/// Ordered rule runner for a single field.
///
/// The first failing rule records an error and suppresses the field's
/// remaining rules, so dependent checks never fire on already broken
/// input. Separate fields use separate checkers and keep validating
/// independently.
pub struct FieldChecker<'a> {
    report: &'a mut ValidationReport,
    path: String,
    bailed: bool,
}

impl<'a> FieldChecker<'a> {
    pub fn new(report: &'a mut ValidationReport, path: &str) -> FieldChecker<'a> {
        FieldChecker {
            report,
            path: path.to_string(),
            bailed: false,
        }
    }

    pub fn check(mut self, passed: bool, message: &str, context: Option<&Value>) -> FieldChecker<'a> {
        if !self.bailed && !passed {
            self.report.push(&self.path, message, context);
            self.bailed = true;
        }
        self
    }

    /// Whether every rule so far has passed.
    pub fn passed(&self) -> bool {
        !self.bailed
    }
}
