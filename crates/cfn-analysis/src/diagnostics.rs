//! Module for all diagnostic creation functions.

use cfn_ast::Diagnostic;
use cfn_ast::Span;
use serde_json::Value;

use crate::SchemaType;

/// Formats a list of JSON values for display.
fn format_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Creates an "incorrect type" diagnostic.
pub fn incorrect_type(expected: &SchemaType, span: Span) -> Diagnostic {
    let message = match expected {
        SchemaType::Single(name) => format!("Incorrect type. Expected \"{name}\"."),
        SchemaType::Multiple(names) => {
            format!("Incorrect type. Expected one of {names}.", names = names.join(", "))
        }
    };

    Diagnostic::error(message)
        .with_rule("type")
        .with_highlight(span)
}

/// Creates a "value not accepted" diagnostic for an `enum` violation.
pub fn value_not_accepted(values: &[Value], span: Span) -> Diagnostic {
    Diagnostic::error(format!(
        "Value is not accepted. Valid values: {values}.",
        values = format_values(values)
    ))
    .with_rule("enum")
    .with_highlight(span)
}

/// Creates a "value must be" diagnostic for a `const` violation.
pub fn value_must_be(value: &Value, span: Span) -> Diagnostic {
    Diagnostic::error(format!("Value must be {value}."))
        .with_rule("const")
        .with_highlight(span)
}

/// Creates a "missing property" diagnostic.
pub fn missing_property(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(format!("Missing property \"{name}\"."))
        .with_rule("required")
        .with_highlight(span)
}

/// Creates a "not divisible" diagnostic for a `multipleOf` violation.
pub fn not_divisible(multiple_of: f64, span: Span) -> Diagnostic {
    Diagnostic::error(format!("Value is not divisible by {multiple_of}."))
        .with_rule("multiple-of")
        .with_highlight(span)
}

/// Creates a "below the exclusive minimum" diagnostic.
pub fn below_exclusive_minimum(minimum: f64, span: Span) -> Diagnostic {
    Diagnostic::error(format!(
        "Value is below the exclusive minimum of {minimum}."
    ))
    .with_rule("exclusive-minimum")
    .with_highlight(span)
}

/// Creates a "below the minimum" diagnostic.
pub fn below_minimum(minimum: f64, span: Span) -> Diagnostic {
    Diagnostic::error(format!("Value is below the minimum of {minimum}."))
        .with_rule("minimum")
        .with_highlight(span)
}

/// Creates an "above the exclusive maximum" diagnostic.
pub fn above_exclusive_maximum(maximum: f64, span: Span) -> Diagnostic {
    Diagnostic::error(format!(
        "Value is above the exclusive maximum of {maximum}."
    ))
    .with_rule("exclusive-maximum")
    .with_highlight(span)
}

/// Creates an "above the maximum" diagnostic.
pub fn above_maximum(maximum: f64, span: Span) -> Diagnostic {
    Diagnostic::error(format!("Value is above the maximum of {maximum}."))
        .with_rule("maximum")
        .with_highlight(span)
}

/// Creates a diagnostic for an error encountered while resolving a schema.
pub fn schema_resolution_error(message: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(format!("Problems loading reference: {message}"))
        .with_rule("schema-resolution")
        .with_highlight(span)
}

/// Creates a hint for a resource whose type has no schema definition.
pub fn unknown_resource_type(ty: &str, span: Span) -> Diagnostic {
    Diagnostic::hint(format!(
        "No schema definition for resource type \"{ty}\"; its properties are not checked."
    ))
    .with_rule("unknown-resource-type")
    .with_highlight(span)
}
