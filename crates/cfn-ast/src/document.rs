//! Representation of a parsed template document.

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use strum::Display;
use strum::EnumString;
use tracing::debug;

use crate::Diagnostic;
use crate::GlobalsConfig;
use crate::parser::parse;
use crate::tree::Node;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::Segment;

/// The prefix of SAM transform names.
const SAM_TRANSFORM_PREFIX: &str = "AWS::Serverless";

/// The type of a template document.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    serde::Deserialize,
    serde::Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    /// A CloudFormation template.
    #[strum(serialize = "cloudformation")]
    #[serde(rename = "cloudformation")]
    CloudFormation,
    /// A SAM (Serverless Application Model) template.
    Sam,
    /// A document of unknown type.
    #[default]
    Unknown,
}

impl DocumentType {
    /// Determines if documents of this type may declare a `Globals` section.
    pub fn supports_globals(&self) -> bool {
        matches!(self, Self::CloudFormation | Self::Sam)
    }

    /// Detects the type of the given document from its top-level properties.
    ///
    /// A document is a SAM template if it has a `Transform` naming a SAM
    /// transform; it is a CloudFormation template if it has an
    /// `AWSTemplateFormatVersion` or `Resources` section.
    pub fn detect(document: &Document) -> Self {
        let is_sam = document
            .property_value(&["Transform".into()])
            .map(|id| match document.node(id).kind() {
                NodeKind::String(s) => s.value().starts_with(SAM_TRANSFORM_PREFIX),
                NodeKind::Array(array) => array.items().iter().any(|item| {
                    document
                        .node(*item)
                        .as_string()
                        .is_some_and(|s| s.value().starts_with(SAM_TRANSFORM_PREFIX))
                }),
                _ => false,
            })
            .unwrap_or(false);

        if is_sam {
            return Self::Sam;
        }

        if document
            .find(&["AWSTemplateFormatVersion".into()])
            .is_some()
            || document.find(&["Resources".into()]).is_some()
        {
            return Self::CloudFormation;
        }

        Self::Unknown
    }
}

/// Represents a parsed template document.
///
/// The document owns every node of its tree; nodes refer to one another by
/// [`NodeId`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The type of the document.
    document_type: DocumentType,
    /// The arena of nodes.
    nodes: Vec<Node>,
    /// The root node, if the document has one.
    root: Option<NodeId>,
    /// The globals collected from the document.
    globals_config: GlobalsConfig,
}

impl Document {
    /// Creates an empty document of the given type.
    ///
    /// The document has no root node.
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            ..Default::default()
        }
    }

    /// Parses the given JSON template source into a document.
    ///
    /// The type of the document is detected from its contents.
    ///
    /// Parsing never fails; any syntax errors are returned as diagnostics
    /// alongside a document containing whatever could be parsed.
    pub fn parse(source: &str) -> (Self, Vec<Diagnostic>) {
        let output = parse(source);
        let mut document = Self {
            document_type: DocumentType::Unknown,
            nodes: output.nodes,
            root: output.root,
            globals_config: GlobalsConfig::default(),
        };

        document.document_type = DocumentType::detect(&document);
        debug!(
            "parsed {count} node(s) with {diagnostics} diagnostic(s) as a `{ty}` document",
            count = document.nodes.len(),
            diagnostics = output.diagnostics.len(),
            ty = document.document_type,
        );

        (document, output.diagnostics)
    }

    /// Gets the type of the document.
    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Sets the type of the document.
    pub fn set_document_type(&mut self, document_type: DocumentType) {
        self.document_type = document_type;
    }

    /// Gets the root node of the document.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Gets a node of the document.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is not from this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Gets an iterator over every node of the document, in the order they
    /// were created.
    #[cfg(test)]
    pub(crate) fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Gets the direct children of a node.
    ///
    /// The children of an object are its property nodes; the child of a
    /// property is its value.
    #[cfg(test)]
    pub(crate) fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id).kind() {
            NodeKind::Object(object) => object.properties().to_vec(),
            NodeKind::Property(property) => property.value().into_iter().collect(),
            NodeKind::Array(array) => array.items().to_vec(),
            NodeKind::String(_) | NodeKind::Number(_) | NodeKind::Boolean(_) | NodeKind::Null => {
                Vec::new()
            }
        }
    }

    /// Gets the globals collected from the document.
    pub fn globals_config(&self) -> &GlobalsConfig {
        &self.globals_config
    }

    /// Replaces the globals collected from the document.
    pub fn set_globals_config(&mut self, config: GlobalsConfig) {
        self.globals_config = config;
    }

    /// Finds the node at the given path from the root.
    ///
    /// Key segments step through object properties and index segments step
    /// through array items. When the last segment is a key, the property node
    /// is returned rather than its value.
    pub fn find(&self, path: &[Segment]) -> Option<NodeId> {
        let mut current = self.root?;
        for (i, segment) in path.iter().enumerate() {
            // Step from a property to its value before descending further
            if i > 0
                && let NodeKind::Property(property) = self.node(current).kind()
            {
                current = property.value()?;
            }

            current = match (segment, self.node(current).kind()) {
                (Segment::Key(key), NodeKind::Object(object)) => {
                    object.properties().iter().copied().find(|p| {
                        self.node(*p)
                            .as_property()
                            .is_some_and(|property| property.key() == key)
                    })?
                }
                (Segment::Index(index), NodeKind::Array(array)) => {
                    array.items().get(*index).copied()?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Finds the value of the property at the given path.
    pub fn property_value(&self, path: &[Segment]) -> Option<NodeId> {
        let id = self.find(path)?;
        match self.node(id).kind() {
            NodeKind::Property(property) => property.value(),
            _ => Some(id),
        }
    }

    /// Gets the value of a property of an object node by key.
    ///
    /// If the object has duplicate keys, the last one wins.
    pub fn object_value(&self, object: NodeId, key: &str) -> Option<NodeId> {
        let object = self.node(object).as_object()?;
        object
            .properties()
            .iter()
            .rev()
            .filter_map(|p| self.node(*p).as_property())
            .find(|p| p.key() == key)
            .and_then(|p| p.value())
    }

    /// Converts the subtree rooted at the given node to a JSON value.
    ///
    /// Returns `None` for nodes that have no JSON representation: property
    /// nodes without a value and malformed numbers. Object properties without
    /// a value are omitted.
    pub fn to_value(&self, id: NodeId) -> Option<Value> {
        match self.node(id).kind() {
            NodeKind::Object(object) => {
                let mut map = Map::new();
                for property in object.properties() {
                    let Some(property) = self.node(*property).as_property() else {
                        continue;
                    };

                    if let Some(value) = property.value().and_then(|v| self.to_value(v)) {
                        map.insert(property.key().to_string(), value);
                    }
                }

                Some(Value::Object(map))
            }
            NodeKind::Property(property) => self.to_value(property.value()?),
            NodeKind::Array(array) => Some(Value::Array(
                array
                    .items()
                    .iter()
                    .map(|item| self.to_value(*item).unwrap_or(Value::Null))
                    .collect(),
            )),
            NodeKind::String(s) => Some(Value::String(s.value().to_string())),
            NodeKind::Number(n) => {
                let value = n.value();
                if n.is_integer() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                    Some(Value::Number(Number::from(value as i64)))
                } else {
                    Number::from_f64(value).map(Value::Number)
                }
            }
            NodeKind::Boolean(b) => Some(Value::Bool(*b)),
            NodeKind::Null => Some(Value::Null),
        }
    }
}
