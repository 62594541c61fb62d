//! Validation of object and array nodes.

use cfn_ast::ArrayNode;
use cfn_ast::Document;
use cfn_ast::NodeId;
use cfn_ast::ObjectNode;

use super::SchemaMatcher;
use super::base::validate_base;
use super::validate_node;
use crate::JsonSchema;
use crate::ValidationResult;
use crate::diagnostics::missing_property;

/// Validates an object node and the properties its schema describes.
pub(crate) fn validate_object(
    document: &Document,
    id: NodeId,
    object: &ObjectNode,
    schema: &JsonSchema,
    result: &mut ValidationResult,
    matcher: &dyn SchemaMatcher,
) {
    if !matcher.include(id) {
        return;
    }

    validate_base(document, id, "object", schema, result);

    let properties: Vec<_> = object
        .properties()
        .iter()
        .filter_map(|p| document.node(*p).as_property().map(|property| (*p, property)))
        .collect();

    if let Some(required) = &schema.required {
        let span = document.node(id).span();
        for name in required {
            if !properties.iter().any(|(_, p)| p.key() == name) {
                result.add(missing_property(name, span));
            }
        }
    }

    for (id, property) in properties {
        if let Some(schema) = schema.property(property.key()) {
            validate_node(document, id, schema, result, matcher);
        }
    }
}

/// Validates an array node and its items.
pub(crate) fn validate_array(
    document: &Document,
    id: NodeId,
    array: &ArrayNode,
    schema: &JsonSchema,
    result: &mut ValidationResult,
    matcher: &dyn SchemaMatcher,
) {
    if !matcher.include(id) {
        return;
    }

    validate_base(document, id, "array", schema, result);

    if let Some(items) = &schema.items {
        for item in array.items() {
            validate_node(document, *item, items, result, matcher);
        }
    }
}
