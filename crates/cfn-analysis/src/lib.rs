//! Schema validation of CloudFormation and SAM templates.
//!
//! A [`Validator`] checks a parsed [`Document`](cfn_ast::Document) against a
//! [`ResolvedSchema`]. Before validation, the schema is adjusted for the
//! document: properties supplied by a SAM template's `Globals` section are no
//! longer required of the resources they apply to.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cfn_analysis::ResolvedSchema;
//! use cfn_analysis::Validator;
//! use cfn_ast::Document;
//!
//! let schema = ResolvedSchema::from_json(
//!     r#"{ "properties": { "Timeout": { "type": "integer", "maximum": 900 } } }"#,
//! )
//! .unwrap();
//!
//! let (mut document, _) = Document::parse(r#"{ "Timeout": 1000 }"#);
//! let result = Validator::default().validate(&mut document, Some(Arc::new(schema)));
//!
//! let messages: Vec<_> = result.problems().iter().map(|d| d.message()).collect();
//! assert_eq!(messages, ["Value is above the maximum of 900."]);
//! ```

mod config;
pub mod diagnostics;
mod mutation;
mod schema;
mod validation;
mod validator;

pub use config::*;
pub use mutation::*;
pub use schema::*;
pub use validation::*;
pub use validator::*;
