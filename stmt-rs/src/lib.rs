//! # stmt-rs
//!
//! Statement templates for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `stmt-rs` to get everything, or depend on individual
//! crates for finer-grained control.

/// Error types, settings, and logging setup.
pub use stmt_rs_core as core;

/// Template parsing, bind providers, and rendering.
#[cfg(feature = "template")]
pub use stmt_rs_template as template;

/// Bind provider over JSON documents.
#[cfg(feature = "document")]
pub use stmt_rs_document as document;

/// Third-party crates that appear in public signatures.
pub use chrono;
pub use serde_json;
pub use tracing;

/// The types most callers need.
pub mod prelude {
    pub use stmt_rs_core::{EvaluationError, Settings, StatementError, StatementResult, SyntaxError};

    #[cfg(feature = "template")]
    pub use stmt_rs_template::{
        bind::{ConstantParameter, FnParameter},
        BindProvider, Engine, InterfaceParameter, ParameterMap, RenderedStatement,
        StatementTemplate, Template, Value, ValueSequence,
    };

    #[cfg(feature = "document")]
    pub use stmt_rs_document::{DocumentBindProvider, PathExpression, PathParameter};
}
