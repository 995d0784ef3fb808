//! Named statements carrying a template.
//!
//! A query definition names its statement text; the text may contain template
//! tags that must be applied before the statement is handed on for execution.

use std::sync::Arc;

use stmt_rs_core::error::{StatementError, StatementResult};
use stmt_rs_core::logging::statement_span;

use crate::bind::BindProvider;
use crate::parser::Template;

/// A named statement whose text is a parsed [`Template`].
#[derive(Debug, Clone)]
pub struct StatementTemplate {
    name: String,
    template: Arc<Template>,
}

impl StatementTemplate {
    /// Parses `source` as the template of statement `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::Syntax`] naming the statement.
    pub fn parse(name: impl Into<String>, source: &str) -> StatementResult<Self> {
        let name = name.into();
        match Template::parse(source) {
            Ok(template) => Ok(Self::new(name, Arc::new(template))),
            Err(e) => Err(StatementError::syntax(name, e)),
        }
    }

    /// Wraps an already parsed (possibly shared) template.
    pub fn new(name: impl Into<String>, template: Arc<Template>) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }

    /// The statement name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parsed template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Returns `true` if the statement text contains template tags.
    pub fn has_templates(&self) -> bool {
        !self.template.is_literal()
    }

    /// Applies the template to produce the final statement text.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::Evaluation`] if a bind fails to evaluate.
    pub fn apply_templates<C, P>(&self, provider: &P, context: &C) -> StatementResult<RenderedStatement>
    where
        C: ?Sized,
        P: BindProvider<C> + ?Sized,
    {
        let span = statement_span(&self.name);
        let _guard = span.enter();

        let text = self.template.render(provider, context)?;
        tracing::debug!(length = text.len(), "statement templates applied");

        Ok(RenderedStatement {
            name: self.name.clone(),
            text,
        })
    }
}

/// The literal text of a statement after templates have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStatement {
    /// The statement name.
    pub name: String,
    /// The final statement text.
    pub text: String,
}

impl RenderedStatement {
    /// Consumes the statement, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use stmt_rs_core::error::{EvaluationError, SyntaxError};

    use super::*;
    use crate::bind::{ConstantParameter, FnParameter, ParameterMap};
    use crate::value::ValueSequence;

    #[test]
    fn test_parse_and_apply() {
        let statement = StatementTemplate::parse(
            "find-user",
            "SELECT * FROM users {{#id}}WHERE id = '{{id}}'{{/id}}",
        )
        .unwrap();
        assert_eq!(statement.name(), "find-user");
        assert!(statement.has_templates());

        let provider: ParameterMap<()> =
            ParameterMap::new().with("id", ConstantParameter::single("o'brien"));
        let rendered = statement.apply_templates(&provider, &()).unwrap();
        assert_eq!(rendered.name, "find-user");
        assert_eq!(
            rendered.into_text(),
            "SELECT * FROM users WHERE id = 'o<SQUOTE>brien'"
        );
    }

    #[test]
    fn test_plain_statement_passes_through() {
        let statement = StatementTemplate::parse("plain", "DELETE FROM t WHERE x = :x").unwrap();
        assert!(!statement.has_templates());
        let provider: ParameterMap<()> = ParameterMap::new();
        assert_eq!(
            statement.apply_templates(&provider, &()).unwrap().text,
            "DELETE FROM t WHERE x = :x"
        );
    }

    #[test]
    fn test_syntax_error_names_statement() {
        let err = StatementTemplate::parse("broken", "SELECT {{> inc}}").unwrap_err();
        match err {
            StatementError::Syntax { statement, source } => {
                assert_eq!(statement, "broken");
                assert!(matches!(source, SyntaxError::PartialNotSupported { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_evaluation_error_wrapped() {
        let provider: ParameterMap<()> = ParameterMap::new().with(
            "bad",
            FnParameter::new("bad", |_: &()| -> Result<ValueSequence, EvaluationError> {
                Err(EvaluationError::incompatible_context("bad", "no document"))
            }),
        );
        let statement = StatementTemplate::parse("s", "{{bad}}").unwrap();
        let err = statement.apply_templates(&provider, &()).unwrap_err();
        assert!(matches!(
            err,
            StatementError::Evaluation(EvaluationError::IncompatibleContext { .. })
        ));
    }

    #[test]
    fn test_shared_template() {
        let template = Arc::new(Template::parse("{{x}}").unwrap());
        let a = StatementTemplate::new("a", Arc::clone(&template));
        let b = StatementTemplate::new("b", template);
        assert_eq!(a.template(), b.template());
    }
}
