//! Core error types for stmt-rs.
//!
//! Templates fail in exactly two ways: at parse time with a [`SyntaxError`],
//! or at render time with an [`EvaluationError`] raised by a bind provider.
//! [`StatementError`] wraps both, together with configuration and I/O
//! failures, for callers working at the statement level.

use thiserror::Error;

/// A violation of the statement template grammar.
///
/// Every variant carries the byte offset of the tag that caused the failure.
/// Parsing is all-or-nothing: the first violation aborts the whole template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A section was opened but never closed before the end of input.
    #[error("unmatched open tag '{name}' at offset {offset}")]
    UnmatchedOpenTag {
        /// The name of the unclosed section.
        name: String,
        /// Byte offset of the opening tag.
        offset: usize,
    },

    /// A close tag did not match the innermost open section.
    ///
    /// `expected` is `None` when no section was open at all.
    #[error("unmatched close tag '{name}' at offset {offset}{}", expected_suffix(.expected))]
    UnmatchedCloseTag {
        /// The name given in the close tag.
        name: String,
        /// The innermost open section, if any.
        expected: Option<String>,
        /// Byte offset of the close tag.
        offset: usize,
    },

    /// An opening brace sequence was never terminated.
    #[error("unclosed tag at offset {offset}: expected '{expected}'")]
    UnclosedTag {
        /// The closing delimiter that was never found.
        expected: &'static str,
        /// Byte offset of the opening delimiter.
        offset: usize,
    },

    /// A `{{> name}}` partial directive. There is no include mechanism.
    #[error("partial includes are not supported: '{name}' at offset {offset}")]
    PartialNotSupported {
        /// The partial name as written.
        name: String,
        /// Byte offset of the directive.
        offset: usize,
    },

    /// Tag content that is not one of the recognised forms.
    #[error("invalid tag '{content}' at offset {offset}")]
    InvalidTag {
        /// The raw content between the delimiters.
        content: String,
        /// Byte offset of the tag.
        offset: usize,
    },
}

fn expected_suffix(expected: &Option<String>) -> String {
    match expected {
        Some(name) => format!(" (expected '{{{{/{name}}}}}')"),
        None => String::new(),
    }
}

impl SyntaxError {
    /// Returns the byte offset in the template source where the error occurred.
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnmatchedOpenTag { offset, .. }
            | Self::UnmatchedCloseTag { offset, .. }
            | Self::UnclosedTag { offset, .. }
            | Self::PartialNotSupported { offset, .. }
            | Self::InvalidTag { offset, .. } => *offset,
        }
    }
}

/// A failure raised while evaluating a bind against a context.
///
/// These are produced by bind providers and propagated unchanged by the
/// renderer; the engine never substitutes a default value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The bind's underlying expression is malformed or failed to evaluate.
    #[error("failed to evaluate bind '{bind}': {message}")]
    Expression {
        /// The bind name being resolved.
        bind: String,
        /// A description of the failure.
        message: String,
    },

    /// The context supplied to the render is not usable by this bind.
    #[error("incompatible context for bind '{bind}': {message}")]
    IncompatibleContext {
        /// The bind name being resolved.
        bind: String,
        /// A description of the incompatibility.
        message: String,
    },
}

impl EvaluationError {
    /// Creates an [`EvaluationError::Expression`].
    pub fn expression(bind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Expression {
            bind: bind.into(),
            message: message.into(),
        }
    }

    /// Creates an [`EvaluationError::IncompatibleContext`].
    pub fn incompatible_context(bind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IncompatibleContext {
            bind: bind.into(),
            message: message.into(),
        }
    }

    /// Returns the name of the bind that failed.
    pub fn bind(&self) -> &str {
        match self {
            Self::Expression { bind, .. } | Self::IncompatibleContext { bind, .. } => bind,
        }
    }
}

/// The primary error type for statement preparation.
#[derive(Error, Debug)]
pub enum StatementError {
    // ── Templates ────────────────────────────────────────────────────

    /// The statement's template contains invalid syntax.
    #[error("Template syntax error in statement '{statement}': {source}")]
    Syntax {
        /// The statement name.
        statement: String,
        /// The underlying grammar violation.
        #[source]
        source: SyntaxError,
    },

    /// A bind failed to evaluate while rendering.
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StatementError {
    /// Wraps a [`SyntaxError`] with the name of the statement it occurred in.
    pub fn syntax(statement: impl Into<String>, source: SyntaxError) -> Self {
        Self::Syntax {
            statement: statement.into(),
            source,
        }
    }
}

/// A convenience type alias for `Result<T, StatementError>`.
pub type StatementResult<T> = Result<T, StatementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display_unmatched_open() {
        let err = SyntaxError::UnmatchedOpenTag {
            name: "string".to_string(),
            offset: 7,
        };
        assert_eq!(err.to_string(), "unmatched open tag 'string' at offset 7");
    }

    #[test]
    fn test_syntax_error_display_unmatched_close_with_expected() {
        let err = SyntaxError::UnmatchedCloseTag {
            name: "b".to_string(),
            expected: Some("a".to_string()),
            offset: 3,
        };
        assert_eq!(
            err.to_string(),
            "unmatched close tag 'b' at offset 3 (expected '{{/a}}')"
        );
    }

    #[test]
    fn test_syntax_error_display_unmatched_close_without_expected() {
        let err = SyntaxError::UnmatchedCloseTag {
            name: "b".to_string(),
            expected: None,
            offset: 0,
        };
        assert_eq!(err.to_string(), "unmatched close tag 'b' at offset 0");
    }

    #[test]
    fn test_syntax_error_offset() {
        let err = SyntaxError::UnclosedTag {
            expected: "}}",
            offset: 12,
        };
        assert_eq!(err.offset(), 12);
    }

    #[test]
    fn test_evaluation_error_bind() {
        let err = EvaluationError::expression("date", "bad path");
        assert_eq!(err.bind(), "date");
        assert_eq!(err.to_string(), "failed to evaluate bind 'date': bad path");
    }

    #[test]
    fn test_statement_error_from_evaluation() {
        let err: StatementError = EvaluationError::incompatible_context("x", "not a document").into();
        assert!(matches!(err, StatementError::Evaluation(_)));
    }

    #[test]
    fn test_statement_error_syntax_display() {
        let err = StatementError::syntax(
            "select-users",
            SyntaxError::PartialNotSupported {
                name: "inc".to_string(),
                offset: 7,
            },
        );
        assert_eq!(
            err.to_string(),
            "Template syntax error in statement 'select-users': partial includes are not supported: 'inc' at offset 7"
        );
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: StatementError = io_err.into();
        assert!(err.to_string().contains("missing"));
    }
}
