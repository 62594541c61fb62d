//! Validation of template nodes against a schema.
//!
//! Validation dispatches on the kind of each node. Problems are appended to
//! a [`ValidationResult`] in document order; validation never stops early
//! because of a problem.

use cfn_ast::Diagnostic;
use cfn_ast::Document;
use cfn_ast::NodeId;
use cfn_ast::NodeKind;

use crate::JsonSchema;

mod base;
mod numbers;
mod objects;

pub use numbers::validate_number;

/// A capability that decides whether a node takes part in the schema branch
/// currently being checked.
///
/// This matters when the effective schema is a union of branches (e.g.
/// `oneOf`); nodes that are not included are skipped without side effects.
pub trait SchemaMatcher {
    /// Determines if the given node should be validated.
    fn include(&self, node: NodeId) -> bool;
}

impl<F> SchemaMatcher for F
where
    F: Fn(NodeId) -> bool,
{
    fn include(&self, node: NodeId) -> bool {
        self(node)
    }
}

/// A matcher that includes every node.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchAll;

impl SchemaMatcher for MatchAll {
    fn include(&self, _: NodeId) -> bool {
        true
    }
}

/// Represents the problems found while validating a document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationResult(Vec<Diagnostic>);

impl ValidationResult {
    /// Adds a problem to the result.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Extends the result with additional problems.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.0.extend(diagnostics);
    }

    /// Returns whether no problems were found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the number of problems found.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Gets the problems found, in the order they were found.
    pub fn problems(&self) -> &[Diagnostic] {
        &self.0
    }

    /// Consumes the result and returns the problems found.
    pub fn into_problems(self) -> Vec<Diagnostic> {
        self.0
    }
}

/// Validates a node, and its descendants, against a schema.
pub fn validate_node(
    document: &Document,
    id: NodeId,
    schema: &JsonSchema,
    result: &mut ValidationResult,
    matcher: &dyn SchemaMatcher,
) {
    let node = document.node(id);
    match node.kind() {
        NodeKind::Number(number) => {
            validate_number(document, id, number, schema, result, matcher);
        }
        NodeKind::Object(object) => {
            objects::validate_object(document, id, object, schema, result, matcher);
        }
        NodeKind::Array(array) => {
            objects::validate_array(document, id, array, schema, result, matcher);
        }
        NodeKind::Property(property) => {
            if let Some(value) = property.value() {
                validate_node(document, value, schema, result, matcher);
            }
        }
        NodeKind::String(_) | NodeKind::Boolean(_) | NodeKind::Null => {
            if !matcher.include(id) {
                return;
            }

            base::validate_base(document, id, node.type_name(), schema, result);
        }
    }
}
