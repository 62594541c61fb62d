//! An error-tolerant parser of JSON templates.
//!
//! The parser always produces a tree; syntax errors are reported as
//! diagnostics and the affected nodes are either truncated or omitted.

use crate::Diagnostic;
use crate::Span;
use crate::lexer::Token;
use crate::lexer::lex;
use crate::tree::ArrayNode;
use crate::tree::Node;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::NumberNode;
use crate::tree::ObjectNode;
use crate::tree::PropertyNode;
use crate::tree::Segment;
use crate::tree::StringNode;

/// Creates an "unknown character" diagnostic.
fn unknown_character(span: Span) -> Diagnostic {
    Diagnostic::error("unknown character").with_label("this character is not valid JSON", span)
}

/// Creates an "expected a value" diagnostic.
fn expected_value(found: Option<(Token, Span)>, eof: Span) -> Diagnostic {
    match found {
        Some((token, span)) => Diagnostic::error(format!(
            "expected a value, but found {found}",
            found = token.describe()
        ))
        .with_highlight(span),
        None => Diagnostic::error("expected a value, but found end of input").with_highlight(eof),
    }
}

/// Creates an "expected a token" diagnostic.
fn expected(
    expected: &str,
    found: Option<(Token, Span)>,
    eof: Span,
    context: &str,
    context_span: Span,
) -> Diagnostic {
    let (found, span) = match found {
        Some((token, span)) => (token.describe(), span),
        None => ("end of input", eof),
    };

    Diagnostic::error(format!("expected {expected}, but found {found}"))
        .with_highlight(span)
        .with_label(format!("while parsing this {context}"), context_span)
}

/// Creates an "invalid number" diagnostic.
fn invalid_number(text: &str, span: Span) -> Diagnostic {
    Diagnostic::error(format!("invalid number literal `{text}`"))
        .with_label("this is not a valid number", span)
}

/// Creates a "maximum nesting depth exceeded" diagnostic.
fn nesting_too_deep(span: Span) -> Diagnostic {
    Diagnostic::error("maximum nesting depth exceeded")
        .with_label(format!("values nested deeper than {MAX_DEPTH} levels are ignored"), span)
}

/// Creates an "unterminated string" diagnostic.
fn unterminated_string(span: Span) -> Diagnostic {
    Diagnostic::error("unterminated string")
        .with_label("this string is missing a closing quote", span)
}

/// Creates an "invalid string" diagnostic.
fn invalid_string(span: Span) -> Diagnostic {
    Diagnostic::error("string contains an invalid escape sequence or control character")
        .with_highlight(span)
}

/// Creates a "trailing content" diagnostic.
fn trailing_content(span: Span) -> Diagnostic {
    Diagnostic::error("unexpected content after the template's root value").with_highlight(span)
}

/// The maximum number of objects and arrays that may enclose a value.
const MAX_DEPTH: usize = 128;

/// Determines if the given text matches the JSON number grammar:
/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
fn is_json_number(text: &str) -> bool {
    /// Skips leading digits, returning `None` if there were none.
    fn digits(bytes: &[u8]) -> Option<&[u8]> {
        let count = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        (count > 0).then(|| &bytes[count..])
    }

    let bytes = text.as_bytes();
    let bytes = bytes.strip_prefix(b"-").unwrap_or(bytes);
    let mut rest = match bytes {
        [b'0', rest @ ..] => rest,
        [b'1'..=b'9', ..] => match digits(bytes) {
            Some(rest) => rest,
            None => return false,
        },
        _ => return false,
    };

    if let [b'.', fraction @ ..] = rest {
        match digits(fraction) {
            Some(r) => rest = r,
            None => return false,
        }
    }

    if let [b'e' | b'E', exponent @ ..] = rest {
        let exponent = match exponent {
            [b'+' | b'-', exponent @ ..] => exponent,
            _ => exponent,
        };
        match digits(exponent) {
            Some(r) => rest = r,
            None => return false,
        }
    }

    rest.is_empty()
}

/// The output of the parser.
#[derive(Debug)]
pub(crate) struct Output {
    /// The nodes of the tree.
    pub nodes: Vec<Node>,
    /// The root node of the tree, if one was parsed.
    pub root: Option<NodeId>,
    /// The diagnostics encountered while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Implements the JSON template parser.
struct Parser<'a> {
    /// The source being parsed.
    source: &'a str,
    /// The non-trivia tokens of the source.
    tokens: Vec<(Token, Span)>,
    /// The index of the next token.
    next: usize,
    /// The nodes created so far.
    nodes: Vec<Node>,
    /// The diagnostics created so far.
    diagnostics: Vec<Diagnostic>,
    /// The number of objects and arrays currently being parsed.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser for the given source.
    fn new(source: &'a str) -> Self {
        let mut diagnostics = Vec::new();
        let tokens = lex(source)
            .into_iter()
            .filter_map(|(token, span)| match token {
                Ok(token) if token.is_trivia() => None,
                Ok(token) => Some((token, span)),
                Err(()) => {
                    diagnostics.push(unknown_character(span));
                    None
                }
            })
            .collect();

        Self {
            source,
            tokens,
            next: 0,
            nodes: Vec::new(),
            diagnostics,
            depth: 0,
        }
    }

    /// Gets a zero-length span at the end of the source.
    fn eof(&self) -> Span {
        Span::new(self.source.len(), 0)
    }

    /// Peeks at the next token.
    fn peek(&self) -> Option<(Token, Span)> {
        self.tokens.get(self.next).copied()
    }

    /// Consumes the next token.
    fn bump(&mut self) -> Option<(Token, Span)> {
        let token = self.peek();
        if token.is_some() {
            self.next += 1;
        }

        token
    }

    /// Consumes the next token if it is the given token.
    fn eat(&mut self, expected: Token) -> Option<Span> {
        match self.peek() {
            Some((token, span)) if token == expected => {
                self.next += 1;
                Some(span)
            }
            _ => None,
        }
    }

    /// Gets the end of the most recently consumed token.
    fn last_end(&self, default: usize) -> usize {
        self.next
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, span)| span.end())
            .unwrap_or(default)
    }

    /// Allocates a node in the arena.
    fn alloc(
        &mut self,
        parent: Option<NodeId>,
        segment: Option<Segment>,
        span: Span,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            segment,
            span,
            kind,
        });
        id
    }

    /// Parses the whole source.
    fn parse(mut self) -> Output {
        let root = if self.tokens.is_empty() {
            None
        } else {
            self.value(None, None)
        };

        if let Some((_, span)) = self.peek() {
            let end = self.tokens.last().map(|(_, s)| s.end()).unwrap_or(span.end());
            self.diagnostics
                .push(trailing_content(Span::from_range(span.start(), end)));
        }

        Output {
            nodes: self.nodes,
            root,
            diagnostics: self.diagnostics,
        }
    }

    /// Parses a value.
    ///
    /// Returns `None` if no value could be parsed; the offending token is
    /// consumed unless it closes an enclosing container.
    fn value(&mut self, parent: Option<NodeId>, segment: Option<Segment>) -> Option<NodeId> {
        let Some((token, span)) = self.peek() else {
            let eof = self.eof();
            self.diagnostics.push(expected_value(None, eof));
            return None;
        };

        match token {
            Token::OpenBrace | Token::OpenBracket if self.depth >= MAX_DEPTH => {
                let span = self.skip_container();
                self.diagnostics.push(nesting_too_deep(span));
                None
            }
            Token::OpenBrace => Some(self.object(parent, segment)),
            Token::OpenBracket => Some(self.array(parent, segment)),
            Token::String | Token::UnterminatedString => {
                self.next += 1;
                let value = self.string_value(token, span);
                Some(self.alloc(
                    parent,
                    segment,
                    span,
                    NodeKind::String(StringNode { value }),
                ))
            }
            Token::Number => {
                self.next += 1;
                let number = self.number(span);
                Some(self.alloc(parent, segment, span, NodeKind::Number(number)))
            }
            Token::True | Token::False => {
                self.next += 1;
                Some(self.alloc(
                    parent,
                    segment,
                    span,
                    NodeKind::Boolean(token == Token::True),
                ))
            }
            Token::Null => {
                self.next += 1;
                Some(self.alloc(parent, segment, span, NodeKind::Null))
            }
            Token::CloseBrace | Token::CloseBracket | Token::Comma | Token::Colon => {
                let eof = self.eof();
                self.diagnostics
                    .push(expected_value(Some((token, span)), eof));
                if matches!(token, Token::Colon) {
                    self.next += 1;
                }
                None
            }
            Token::Whitespace => unreachable!("trivia should have been filtered"),
        }
    }

    /// Parses an object; the next token must be `{`.
    fn object(&mut self, parent: Option<NodeId>, segment: Option<Segment>) -> NodeId {
        let (_, open) = self.bump().expect("should have an open brace");
        self.depth += 1;
        let id = self.alloc(
            parent,
            segment,
            open,
            NodeKind::Object(ObjectNode::default()),
        );

        let mut properties = Vec::new();
        loop {
            if self.eat(Token::CloseBrace).is_some() {
                break;
            }

            let found = self.peek();
            let eof = self.eof();
            match found {
                Some((Token::String | Token::UnterminatedString, _)) => {
                    properties.push(self.property(id));
                }
                _ => {
                    self.diagnostics
                        .push(expected("a property key", found, eof, "object", open));
                    if !self.recover(Token::CloseBrace) {
                        break;
                    }
                    continue;
                }
            }

            if self.eat(Token::Comma).is_some() {
                continue;
            }

            if self.eat(Token::CloseBrace).is_some() {
                break;
            }

            let found = self.peek();
            self.diagnostics
                .push(expected("`,` or `}`", found, eof, "object", open));
            if !self.recover(Token::CloseBrace) {
                break;
            }
        }

        let end = self.last_end(open.end());
        let node = &mut self.nodes[id.0];
        node.span = Span::from_range(open.start(), end);
        node.kind = NodeKind::Object(ObjectNode { properties });
        self.depth -= 1;
        id
    }

    /// Parses a property of the given object; the next token must be a string.
    fn property(&mut self, object: NodeId) -> NodeId {
        let (token, key_span) = self.bump().expect("should have a property key");
        let key = self.string_value(token, key_span);
        let id = self.alloc(
            Some(object),
            Some(Segment::Key(key.clone())),
            key_span,
            NodeKind::Property(PropertyNode {
                key: key.clone(),
                key_span,
                value: None,
            }),
        );

        let value = if self.eat(Token::Colon).is_some() {
            match self.peek() {
                Some((Token::Comma | Token::CloseBrace, _)) | None => {
                    let found = self.peek();
                    let eof = self.eof();
                    self.diagnostics.push(expected_value(found, eof));
                    None
                }
                _ => self.value(Some(id), Some(Segment::Key(key))),
            }
        } else {
            let found = self.peek();
            let eof = self.eof();
            self.diagnostics
                .push(expected("`:`", found, eof, "property", key_span));
            None
        };

        let end = self.last_end(key_span.end());
        let node = &mut self.nodes[id.0];
        node.span = Span::from_range(key_span.start(), end);
        if let NodeKind::Property(property) = &mut node.kind {
            property.value = value;
        }

        id
    }

    /// Parses an array; the next token must be `[`.
    fn array(&mut self, parent: Option<NodeId>, segment: Option<Segment>) -> NodeId {
        let (_, open) = self.bump().expect("should have an open bracket");
        self.depth += 1;
        let id = self.alloc(
            parent,
            segment,
            open,
            NodeKind::Array(ArrayNode::default()),
        );

        let mut items = Vec::new();
        loop {
            if self.eat(Token::CloseBracket).is_some() {
                break;
            }

            if self.peek().is_none() {
                let eof = self.eof();
                self.diagnostics
                    .push(expected("`]`", None, eof, "array", open));
                break;
            }

            let index = items.len();
            match self.value(Some(id), Some(Segment::Index(index))) {
                Some(item) => items.push(item),
                None => {
                    if !self.recover(Token::CloseBracket) {
                        break;
                    }
                    continue;
                }
            }

            if self.eat(Token::Comma).is_some() {
                continue;
            }

            if self.eat(Token::CloseBracket).is_some() {
                break;
            }

            let found = self.peek();
            let eof = self.eof();
            self.diagnostics
                .push(expected("`,` or `]`", found, eof, "array", open));
            if !self.recover(Token::CloseBracket) {
                break;
            }
        }

        let end = self.last_end(open.end());
        let node = &mut self.nodes[id.0];
        node.span = Span::from_range(open.start(), end);
        node.kind = NodeKind::Array(ArrayNode { items });
        self.depth -= 1;
        id
    }

    /// Skips an object or array, including everything nested within it.
    ///
    /// The next token must be `{` or `[`. Returns the span of the skipped
    /// tokens.
    fn skip_container(&mut self) -> Span {
        let start = self.peek().map(|(_, span)| span.start()).unwrap_or(self.source.len());
        let mut nesting = 0usize;
        while let Some((token, _)) = self.bump() {
            match token {
                Token::OpenBrace | Token::OpenBracket => nesting += 1,
                Token::CloseBrace | Token::CloseBracket => {
                    nesting = nesting.saturating_sub(1);
                    if nesting == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }

        Span::from_range(start, self.last_end(start))
    }

    /// Skips tokens until the next `,` (which is consumed) or the given
    /// closing token (which is not consumed).
    ///
    /// Returns `false` if the end of input was reached.
    fn recover(&mut self, close: Token) -> bool {
        while let Some((token, _)) = self.peek() {
            if token == close {
                return true;
            }

            self.next += 1;
            if token == Token::Comma {
                return true;
            }
        }

        false
    }

    /// Gets the unescaped value of a string token.
    fn string_value(&mut self, token: Token, span: Span) -> String {
        let text = &self.source[span.start()..span.end()];
        if token == Token::UnterminatedString {
            self.diagnostics.push(unterminated_string(span));
            return text[1..].to_string();
        }

        match serde_json::from_str::<String>(text) {
            Ok(value) => value,
            Err(_) => {
                self.diagnostics.push(invalid_string(span));
                text[1..text.len() - 1].to_string()
            }
        }
    }

    /// Parses the number for a number token.
    fn number(&mut self, span: Span) -> NumberNode {
        let text = &self.source[span.start()..span.end()];
        if !is_json_number(text) {
            self.diagnostics.push(invalid_number(text, span));
            return NumberNode::malformed();
        }

        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                NumberNode::new(value, !text.contains(['.', 'e', 'E']))
            }
            _ => {
                self.diagnostics.push(invalid_number(text, span));
                NumberNode::malformed()
            }
        }
    }
}

/// Parses the given JSON template source.
pub(crate) fn parse(source: &str) -> Output {
    Parser::new(source).parse()
}
