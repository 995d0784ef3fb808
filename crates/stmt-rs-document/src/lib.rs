//! # stmt-rs-document
//!
//! A bind provider that evaluates slash-path expressions against a
//! `serde_json::Value` document, for statement templates whose binds are
//! backed by a contextual document.
//!
//! - [`path`] - The path expression language
//! - [`provider`] - [`PathParameter`] and [`DocumentBindProvider`]

pub mod path;
pub mod provider;

pub use path::{PathExpression, PathSyntaxError};
pub use provider::{DocumentBindProvider, PathParameter};
