//! Validation of whole templates.

use std::sync::Arc;

use cfn_ast::Document;
use cfn_ast::NodeId;
use cfn_ast::Span;
use cfn_ast::collect_globals;
use tracing::debug;

use crate::Config;
use crate::JsonSchema;
use crate::MatchAll;
use crate::ResolvedSchema;
use crate::ValidationResult;
use crate::apply_document_mutations;
use crate::diagnostics::schema_resolution_error;
use crate::diagnostics::unknown_resource_type;
use crate::validate_node;

/// The name of the top-level section declaring a template's resources.
const RESOURCES_KEY: &str = "Resources";

/// The name of the property holding a resource's type.
const RESOURCE_TYPE_KEY: &str = "Type";

/// Validates templates against a resolved schema.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    /// The configuration of the validator.
    config: Config,
}

impl Validator {
    /// Constructs a new validator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Gets the configuration of the validator.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validates a document against a schema.
    ///
    /// The document's globals configuration is recomputed from its contents
    /// and, unless disabled, used to adjust the schema before any node is
    /// validated. Problems are returned in document order.
    pub fn validate(
        &self,
        document: &mut Document,
        schema: Option<Arc<ResolvedSchema>>,
    ) -> ValidationResult {
        if let Some(document_type) = self.config.document_type() {
            document.set_document_type(document_type);
        }

        document.set_globals_config(collect_globals(document));

        let mut result = ValidationResult::default();
        let Some(root) = document.root() else {
            debug!("document has no root value; skipping validation");
            return result;
        };

        let schema = if self.config.apply_globals() {
            apply_document_mutations(schema.as_ref(), document)
        } else {
            schema
        };

        let Some(schema) = schema else {
            debug!("no schema to validate against");
            return result;
        };

        let span = document.node(root).span();
        let location = Span::new(span.start(), span.len().min(1));
        for error in schema.errors() {
            result.add(schema_resolution_error(error, location));
        }

        validate_node(document, root, schema.schema(), &mut result, &MatchAll);

        if self.config.validate_resources() {
            self.validate_resources(document, root, schema.schema(), &mut result);
        }

        debug!(
            "validation of {document_type} document found {count} problem(s)",
            document_type = document.document_type(),
            count = result.len(),
        );
        result
    }

    /// Validates each declared resource against the definition for its type.
    ///
    /// Resources whose type has no definition in the schema are reported with
    /// a hint and otherwise skipped.
    fn validate_resources(
        &self,
        document: &Document,
        root: NodeId,
        schema: &JsonSchema,
        result: &mut ValidationResult,
    ) {
        let Some(resources) = document
            .object_value(root, RESOURCES_KEY)
            .and_then(|r| document.node(r).as_object())
        else {
            return;
        };

        let has_definitions = schema.definitions.is_some();
        for property in resources.properties() {
            let Some(resource) = document
                .node(*property)
                .as_property()
                .and_then(|p| p.value())
            else {
                continue;
            };

            let Some(type_node) = document.object_value(resource, RESOURCE_TYPE_KEY) else {
                continue;
            };

            let Some(resource_type) = document.node(type_node).as_string() else {
                continue;
            };

            match schema.definition(resource_type.value()) {
                Some(definition) => {
                    validate_node(document, resource, definition, result, &MatchAll);
                }
                None if has_definitions => {
                    result.add(unknown_resource_type(
                        resource_type.value(),
                        document.node(type_node).span(),
                    ));
                }
                None => {
                    debug!(
                        "no definition for resource type `{ty}`",
                        ty = resource_type.value()
                    );
                }
            }
        }
    }
}
