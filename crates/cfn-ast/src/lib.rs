//! An abstract syntax tree for CloudFormation and SAM templates.
//!
//! A template is parsed into a [`Document`], which owns an arena of [`Node`]s
//! carrying source [`Span`]s. Parsing is error-tolerant: syntax errors are
//! reported as [`Diagnostic`]s alongside whatever tree could be recovered.
//!
//! # Examples
//!
//! ```rust
//! use cfn_ast::Document;
//! use cfn_ast::DocumentType;
//! use cfn_ast::collect_globals;
//!
//! let source = r#"{
//!     "Transform": "AWS::Serverless-2016-10-31",
//!     "Globals": { "Function": { "Runtime": "python3.12" } }
//! }"#;
//!
//! let (document, diagnostics) = Document::parse(source);
//! assert!(diagnostics.is_empty());
//! assert_eq!(document.document_type(), DocumentType::Sam);
//!
//! let globals = collect_globals(&document);
//! assert_eq!(globals.function.properties, ["Runtime"]);
//! ```

mod diagnostic;
mod document;
mod globals;
pub mod lexer;
mod parser;
mod tree;

pub use diagnostic::*;
pub use document::*;
pub use globals::*;
pub use tree::*;
