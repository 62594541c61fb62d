//! Validation of the keywords common to every node kind.

use cfn_ast::Document;
use cfn_ast::NodeId;
use serde_json::Value;

use crate::JsonSchema;
use crate::ValidationResult;
use crate::diagnostics::incorrect_type;
use crate::diagnostics::value_must_be;
use crate::diagnostics::value_not_accepted;

/// Determines if two JSON values are equal, comparing numbers by value.
///
/// `serde_json` considers `1` and `1.0` distinct; schemas do not.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

/// Validates the `type`, `enum` and `const` keywords for a node.
///
/// The type name is given explicitly so that callers may validate a node as
/// a narrower type than its kind (e.g. a number as an `integer`).
pub(crate) fn validate_base(
    document: &Document,
    id: NodeId,
    type_name: &str,
    schema: &JsonSchema,
    result: &mut ValidationResult,
) {
    let span = document.node(id).span();

    if let Some(ty) = &schema.ty
        && !ty.contains(type_name)
    {
        result.add(incorrect_type(ty, span));
    }

    if schema.enum_values.is_none() && schema.const_value.is_none() {
        return;
    }

    // Malformed literals have no value to compare
    let Some(value) = document.to_value(id) else {
        return;
    };

    if let Some(values) = &schema.enum_values
        && !values.iter().any(|v| values_equal(v, &value))
    {
        result.add(value_not_accepted(values, span));
    }

    if let Some(expected) = &schema.const_value
        && !values_equal(expected, &value)
    {
        result.add(value_must_be(expected, span));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn reports_type_enum_and_const() {
        let (document, _) = Document::parse(r#""blue""#);
        let root = document.root().expect("should have a root");
        let schema: JsonSchema = serde_json::from_value(json!({
            "type": ["number", "boolean"],
            "enum": ["red", "green"],
            "const": "red"
        }))
        .unwrap();

        let mut result = ValidationResult::default();
        validate_base(&document, root, "string", &schema, &mut result);

        let messages: Vec<_> = result.problems().iter().map(|d| d.message()).collect();
        assert_eq!(
            messages,
            [
                "Incorrect type. Expected one of number, boolean.",
                "Value is not accepted. Valid values: \"red\", \"green\".",
                "Value must be \"red\".",
            ]
        );
    }
}
