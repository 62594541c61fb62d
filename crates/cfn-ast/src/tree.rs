//! The nodes of a template's abstract syntax tree.
//!
//! Nodes are stored in an arena owned by a [`Document`](crate::Document) and
//! are referenced by [`NodeId`]. A node's parent is a non-owning [`NodeId`];
//! the document exclusively owns every node.

use std::fmt;

use crate::Span;

/// Identifies a node within a document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Gets the index of the node in the document's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A path segment by which a node was reached from its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The node was reached by an object key.
    Key(String),
    /// The node was reached by an array index.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A node in a template's abstract syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The parent of the node; `None` for the root.
    pub(crate) parent: Option<NodeId>,
    /// The segment by which the node was reached from its parent.
    pub(crate) segment: Option<Segment>,
    /// The span of the node in the source.
    pub(crate) span: Span,
    /// The kind of the node.
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Gets the parent of the node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Gets the segment by which the node was reached from its parent.
    pub fn segment(&self) -> Option<&Segment> {
        self.segment.as_ref()
    }

    /// Gets the span of the node.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Gets the kind of the node.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Gets the JSON type name of the node.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Gets the node as an object node.
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match &self.kind {
            NodeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Gets the node as a property node.
    pub fn as_property(&self) -> Option<&PropertyNode> {
        match &self.kind {
            NodeKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Gets the node as an array node.
    pub fn as_array(&self) -> Option<&ArrayNode> {
        match &self.kind {
            NodeKind::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Gets the node as a string node.
    pub fn as_string(&self) -> Option<&StringNode> {
        match &self.kind {
            NodeKind::String(string) => Some(string),
            _ => None,
        }
    }

    /// Gets the node as a number node.
    pub fn as_number(&self) -> Option<&NumberNode> {
        match &self.kind {
            NodeKind::Number(number) => Some(number),
            _ => None,
        }
    }
}

/// The kind of a node, along with its kind-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An object.
    Object(ObjectNode),
    /// A key-value property of an object.
    Property(PropertyNode),
    /// An array.
    Array(ArrayNode),
    /// A string.
    String(StringNode),
    /// A number.
    Number(NumberNode),
    /// A boolean.
    Boolean(bool),
    /// A `null` literal.
    Null,
}

impl NodeKind {
    /// Gets the JSON type name for the kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Property(_) => "property",
            Self::Array(_) => "array",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
        }
    }
}

/// An object node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    /// The property nodes of the object, in document order.
    pub(crate) properties: Vec<NodeId>,
}

impl ObjectNode {
    /// Gets the property nodes of the object, in document order.
    pub fn properties(&self) -> &[NodeId] {
        &self.properties
    }
}

/// A property node.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    /// The unescaped key of the property.
    pub(crate) key: String,
    /// The span of the key, including its quotes.
    pub(crate) key_span: Span,
    /// The value of the property.
    ///
    /// This is `None` when the value failed to parse.
    pub(crate) value: Option<NodeId>,
}

impl PropertyNode {
    /// Gets the unescaped key of the property.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Gets the span of the key.
    pub fn key_span(&self) -> Span {
        self.key_span
    }

    /// Gets the value node of the property.
    pub fn value(&self) -> Option<NodeId> {
        self.value
    }
}

/// An array node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayNode {
    /// The items of the array, in document order.
    pub(crate) items: Vec<NodeId>,
}

impl ArrayNode {
    /// Gets the items of the array, in document order.
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }
}

/// A string node.
#[derive(Debug, Clone, PartialEq)]
pub struct StringNode {
    /// The unescaped value of the string.
    pub(crate) value: String,
}

impl StringNode {
    /// Gets the unescaped value of the string.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A number node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberNode {
    /// The value of the number.
    ///
    /// This is NaN when the literal could not be parsed.
    value: f64,
    /// Whether the literal was written as an integer.
    is_integer: bool,
}

impl NumberNode {
    /// Creates a new number node.
    pub fn new(value: f64, is_integer: bool) -> Self {
        Self { value, is_integer }
    }

    /// Creates a number node for a literal that could not be parsed.
    ///
    /// The value of the node is NaN.
    pub fn malformed() -> Self {
        Self {
            value: f64::NAN,
            is_integer: true,
        }
    }

    /// Gets the value of the number.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Determines if the literal was written as an integer (i.e. with no
    /// fraction or exponent).
    pub fn is_integer(&self) -> bool {
        self.is_integer
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn malformed_numbers_are_nan() {
        let number = NumberNode::malformed();
        assert!(number.value().is_nan());
        assert!(number.is_integer());
    }

    #[test]
    fn segments_display() {
        assert_eq!(Segment::from("Globals").to_string(), "Globals");
        assert_eq!(Segment::from(3).to_string(), "[3]");
    }
}
