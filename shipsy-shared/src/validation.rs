/// Field-level validation errors
///
/// Domain services validate their inputs with the `validator` crate and
/// report failures as a flat list of [`FieldViolation`]s, which the API layer
/// returns to the client unchanged.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// A single invalid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field that failed validation (wire name, e.g. `weightKg`)
    pub field: String,

    /// Human-readable error message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens `validator` errors into field violations
///
/// Field names are converted to their camelCase wire form and the output is
/// sorted by field name so responses are deterministic.
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldViolation {
                field: camel_case(&field.to_string()),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

/// Converts a snake_case identifier to camelCase
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;

    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}
