//! # stmt-rs-core
//!
//! Core types shared by the stmt-rs crates: the error hierarchy, engine
//! settings and their loaders, and tracing-based logging setup.
//!
//! ## Modules
//!
//! - [`error`] - Parse-time and render-time error types
//! - [`settings`] - Engine configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{EvaluationError, StatementError, StatementResult, SyntaxError};
pub use settings::{Settings, TemplateSettings};
