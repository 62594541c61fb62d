//! Validation of number nodes.

use cfn_ast::Document;
use cfn_ast::NodeId;
use cfn_ast::NumberNode;

use super::SchemaMatcher;
use super::base::validate_base;
use crate::JsonSchema;
use crate::ValidationResult;
use crate::diagnostics::above_exclusive_maximum;
use crate::diagnostics::above_maximum;
use crate::diagnostics::below_exclusive_minimum;
use crate::diagnostics::below_minimum;
use crate::diagnostics::not_divisible;

/// Validates a number node against a schema.
///
/// Nodes excluded by the matcher are skipped entirely. An integer literal is
/// validated as an `integer` when the schema's type permits integers and as a
/// `number` otherwise. The `multipleOf`, `minimum` and `maximum` checks are
/// independent of one another and of the type check, so a single node may
/// produce several problems.
///
/// A malformed literal has a NaN value; no numeric check reports a problem
/// for it.
pub fn validate_number(
    document: &Document,
    id: NodeId,
    number: &NumberNode,
    schema: &JsonSchema,
    result: &mut ValidationResult,
    matcher: &dyn SchemaMatcher,
) {
    if !matcher.include(id) {
        return;
    }

    let type_name = if schema.type_is_integer() && number.is_integer() {
        "integer"
    } else {
        "number"
    };

    validate_base(document, id, type_name, schema, result);

    let span = document.node(id).span();
    let value = number.value();
    if value.is_nan() {
        return;
    }

    // NOTE: `%` is the IEEE-754 remainder, so fractional divisors such as 0.1
    // may report values that are mathematically multiples
    if let Some(multiple_of) = schema.multiple_of
        && value % multiple_of != 0.0
    {
        result.add(not_divisible(multiple_of, span));
    }

    if let Some(minimum) = schema.minimum {
        let exclusive = schema.exclusive_minimum.is_some_and(|b| b.is_set());
        if exclusive && value <= minimum {
            result.add(below_exclusive_minimum(minimum, span));
        } else if !exclusive && value < minimum {
            result.add(below_minimum(minimum, span));
        }
    }

    if let Some(maximum) = schema.maximum {
        let exclusive = schema.exclusive_maximum.is_some_and(|b| b.is_set());
        if exclusive && value >= maximum {
            result.add(above_exclusive_maximum(maximum, span));
        } else if !exclusive && value > maximum {
            result.add(above_maximum(maximum, span));
        }
    }
}

#[cfg(test)]
mod tests {
    use cfn_ast::Severity;
    use cfn_ast::Span;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::MatchAll;

    /// Parses a single number and validates it against the given schema.
    fn validate(source: &str, schema: serde_json::Value) -> (Span, ValidationResult) {
        let (document, _) = Document::parse(source);
        let root = document.root().expect("should have a root");
        let node = document.node(root);
        let number = node.as_number().expect("should be a number");
        let schema: JsonSchema = serde_json::from_value(schema).unwrap();

        let mut result = ValidationResult::default();
        validate_number(&document, root, number, &schema, &mut result, &MatchAll);
        (node.span(), result)
    }

    /// Gets the messages of a validation result.
    fn messages(result: &ValidationResult) -> Vec<&str> {
        result.problems().iter().map(|d| d.message()).collect()
    }

    #[test]
    fn reports_values_not_divisible() {
        let (span, result) = validate("10", json!({"multipleOf": 3}));
        assert_eq!(messages(&result), ["Value is not divisible by 3."]);

        let problem = &result.problems()[0];
        assert_eq!(problem.severity(), Severity::Error);
        assert_eq!(problem.location(), Some(span));

        let (_, result) = validate("9", json!({"multipleOf": 3}));
        assert!(result.is_empty());
    }

    #[test]
    fn minimums_respect_exclusivity() {
        let (_, result) = validate("5", json!({"minimum": 5, "exclusiveMinimum": true}));
        assert_eq!(
            messages(&result),
            ["Value is below the exclusive minimum of 5."]
        );

        let (_, result) = validate("5", json!({"minimum": 5}));
        assert!(result.is_empty());

        let (_, result) = validate("4.5", json!({"minimum": 5, "exclusiveMinimum": false}));
        assert_eq!(messages(&result), ["Value is below the minimum of 5."]);
    }

    #[test]
    fn maximums_respect_exclusivity() {
        let (_, result) = validate("7", json!({"maximum": 7, "exclusiveMaximum": true}));
        assert_eq!(
            messages(&result),
            ["Value is above the exclusive maximum of 7."]
        );

        let (_, result) = validate("7", json!({"maximum": 7}));
        assert!(result.is_empty());

        let (_, result) = validate("7.5", json!({"maximum": 7}));
        assert_eq!(messages(&result), ["Value is above the maximum of 7."]);
    }

    #[test]
    fn accumulates_independent_problems() {
        let (_, result) = validate("10", json!({"multipleOf": 3, "maximum": 5}));
        assert_eq!(
            messages(&result),
            ["Value is not divisible by 3.", "Value is above the maximum of 5."]
        );
    }

    #[test]
    fn malformed_numbers_report_no_range_problems() {
        let (_, result) = validate(
            "1.2.3",
            json!({"multipleOf": 2, "minimum": 5, "maximum": 0, "exclusiveMaximum": true}),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn integer_literals_validate_as_integers() {
        let (_, result) = validate("4", json!({"type": "integer"}));
        assert!(result.is_empty());

        let (_, result) = validate("4", json!({"type": ["string", "integer"]}));
        assert!(result.is_empty());

        let (_, result) = validate("4", json!({"type": "number"}));
        assert!(result.is_empty());

        let (_, result) = validate("4.5", json!({"type": "integer"}));
        assert_eq!(messages(&result), ["Incorrect type. Expected \"integer\"."]);
    }

    #[test]
    fn type_problems_do_not_prevent_range_checks() {
        let (_, result) = validate("4.5", json!({"type": "integer", "minimum": 10}));
        assert_eq!(
            messages(&result),
            [
                "Incorrect type. Expected \"integer\".",
                "Value is below the minimum of 10."
            ]
        );
    }

    #[test]
    fn excluded_nodes_are_skipped() {
        let (document, _) = Document::parse("10");
        let root = document.root().expect("should have a root");
        let number = *document.node(root).as_number().expect("should be a number");
        let schema: JsonSchema =
            serde_json::from_value(json!({"type": "string", "multipleOf": 3})).unwrap();

        let mut result = ValidationResult::default();
        let exclude = |_: NodeId| false;
        validate_number(&document, root, &number, &schema, &mut result, &exclude);
        assert!(result.is_empty());
        assert_eq!(document.node(root).type_name(), "number");
    }
}
