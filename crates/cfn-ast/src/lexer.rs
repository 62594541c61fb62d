//! Module for the lexer implementation.

use logos::Logos;

use crate::Span;

/// Represents a token in a JSON template.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    /// Contiguous whitespace.
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// The `{` symbol.
    #[token("{")]
    OpenBrace,

    /// The `}` symbol.
    #[token("}")]
    CloseBrace,

    /// The `[` symbol.
    #[token("[")]
    OpenBracket,

    /// The `]` symbol.
    #[token("]")]
    CloseBracket,

    /// The `:` symbol.
    #[token(":")]
    Colon,

    /// The `,` symbol.
    #[token(",")]
    Comma,

    /// A double quoted string literal, including its quotes.
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    /// A string literal missing its closing quote.
    ///
    /// The literal ends at the end of the line.
    #[regex(r#""([^"\\\r\n]|\\.)*"#)]
    UnterminatedString,

    /// A number literal.
    ///
    /// The pattern is deliberately permissive so that malformed numbers such
    /// as `1.2.3` or `12abc` are lexed as a single token; the parser reports
    /// them.
    #[regex(r"-?[0-9][0-9A-Za-z_.+\-]*")]
    Number,

    /// The `true` keyword.
    #[token("true")]
    True,

    /// The `false` keyword.
    #[token("false")]
    False,

    /// The `null` keyword.
    #[token("null")]
    Null,
}

impl Token {
    /// Determines if the token is trivia that the parser skips.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Describes the token for use in diagnostic messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::OpenBrace => "`{`",
            Self::CloseBrace => "`}`",
            Self::OpenBracket => "`[`",
            Self::CloseBracket => "`]`",
            Self::Colon => "`:`",
            Self::Comma => "`,`",
            Self::String | Self::UnterminatedString => "string",
            Self::Number => "number",
            Self::True => "`true`",
            Self::False => "`false`",
            Self::Null => "`null`",
        }
    }
}

/// Lexes the given source into a list of tokens and their spans.
///
/// Source that does not match any token is returned as an `Err` with the
/// span of the unrecognized text.
pub fn lex(source: &str) -> Vec<(Result<Token, ()>, Span)> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| (token.map_err(|_| ()), Span::from(span)))
        .collect()
}
