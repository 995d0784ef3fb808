//! # stmt-rs-template
//!
//! Statement template engine. Parses a mustache-like template embedded in a
//! query definition, resolves named binds through an explicit
//! [`BindProvider`](bind::BindProvider) registry, and renders text with
//! type-aware formatting and injection-safe escaping.
//!
//! ```
//! use stmt_rs_template::bind::{ConstantParameter, ParameterMap};
//! use stmt_rs_template::parser::Template;
//! use stmt_rs_template::value::Value;
//!
//! let template = Template::parse("SELECT {{#string}}{{string}}{{/string}} FROM table").unwrap();
//! let provider: ParameterMap<()> =
//!     ParameterMap::new().with("string", ConstantParameter::single(Value::from("string_bind")));
//!
//! assert_eq!(template.render(&provider, &()).unwrap(), "SELECT string_bind FROM table");
//! ```

pub mod bind;
pub mod cache;
pub mod engine;
pub mod escape;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod statement;
pub mod value;

pub use bind::{BindProvider, InterfaceParameter, ParameterMap};
pub use engine::Engine;
pub use parser::{Node, Template};
pub use statement::{RenderedStatement, StatementTemplate};
pub use value::{Value, ValueSequence};
