//! Document-specific adjustments to a resolved schema.
//!
//! Properties declared under a template's `Globals` section are supplied to
//! every resource of the matching type, so they must not be reported as
//! missing from the resources themselves.

use std::sync::Arc;

use cfn_ast::Document;
use tracing::debug;

use crate::JsonSchema;
use crate::ResolvedSchema;

/// The name of the property holding a resource's own properties.
const RESOURCE_PROPERTIES: &str = "Properties";

/// Applies the mutations implied by the given document to a resolved schema.
///
/// For every resource type with properties declared under `Globals`, those
/// property names are removed from the `required` list of the resource
/// definition's `Properties` schema.
///
/// The input schema is never modified. It is returned as-is (the same `Arc`)
/// when there is no schema to mutate: when the document declares no globals
/// or the schema has no `definitions`. Otherwise a new schema is returned.
pub fn apply_document_mutations(
    schema: Option<&Arc<ResolvedSchema>>,
    document: &Document,
) -> Option<Arc<ResolvedSchema>> {
    let schema = schema?;
    let globals = document.globals_config();
    if globals.is_empty() || schema.schema().definitions.is_none() {
        return Some(schema.clone());
    }

    let mut mutated: JsonSchema = schema.schema().clone();
    if let Some(definitions) = mutated.definitions.as_mut() {
        for item in globals.items().filter(|i| !i.properties.is_empty()) {
            for resource_type in item.resource_types() {
                let Some(required) = definitions
                    .get_mut(*resource_type)
                    .and_then(|d| d.properties.as_mut())
                    .and_then(|p| p.get_mut(RESOURCE_PROPERTIES))
                    .and_then(|p| p.required.as_mut())
                else {
                    continue;
                };

                let before = required.len();
                required.retain(|name| !item.properties.contains(name));
                debug!(
                    "removed {count} required property name(s) of `{resource_type}` supplied by \
                     `Globals.{key}`",
                    count = before - required.len(),
                    key = item.key(),
                );
            }
        }
    }

    Some(Arc::new(ResolvedSchema::with_errors(
        mutated,
        schema.errors().to_vec(),
    )))
}
