//! Template rendering.
//!
//! Walks a [`Template`] in order, resolving every bind through the supplied
//! [`BindProvider`]. Sections render their body with the same provider and
//! context; there is no scope push.

use stmt_rs_core::error::EvaluationError;

use crate::bind::BindProvider;
use crate::escape::escape_statement;
use crate::parser::{Node, Template};
use crate::value::ValueSequence;

impl Template {
    /// Renders this template against `context`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvaluationError`] raised by a bind; rendering
    /// stops there and no partial output is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use stmt_rs_template::bind::{ConstantParameter, ParameterMap};
    /// use stmt_rs_template::parser::Template;
    ///
    /// let template = Template::parse("{{^missing}}no filter{{/missing}}").unwrap();
    /// let provider: ParameterMap<()> = ParameterMap::new();
    /// assert_eq!(template.render(&provider, &()).unwrap(), "no filter");
    /// ```
    pub fn render<C, P>(&self, provider: &P, context: &C) -> Result<String, EvaluationError>
    where
        C: ?Sized,
        P: BindProvider<C> + ?Sized,
    {
        let span = tracing::debug_span!("render", nodes = self.nodes().len());
        let _guard = span.enter();

        let mut output = String::new();
        render_nodes(self.nodes(), provider, context, &mut output)?;
        Ok(output)
    }
}

/// Renders a node list, appending to `output`.
pub fn render_nodes<C, P>(
    nodes: &[Node],
    provider: &P,
    context: &C,
    output: &mut String,
) -> Result<(), EvaluationError>
where
    C: ?Sized,
    P: BindProvider<C> + ?Sized,
{
    for node in nodes {
        match node {
            Node::Literal(text) => output.push_str(text),
            Node::Variable { name, escaped } => {
                let formatted = resolve_bind(provider, name, context)?.to_canonical_string();
                if *escaped {
                    output.push_str(&escape_statement(&formatted));
                } else {
                    output.push_str(&formatted);
                }
            }
            Node::Section {
                name,
                inverted,
                body,
            } => {
                let truthy = resolve_bind(provider, name, context)?.is_truthy();
                if truthy != *inverted {
                    render_nodes(body.nodes(), provider, context, output)?;
                }
            }
        }
    }
    Ok(())
}

/// Resolves a bind by name. An unregistered name yields an empty sequence.
///
/// # Errors
///
/// Propagates the provider's [`EvaluationError`] unchanged.
pub fn resolve_bind<C, P>(
    provider: &P,
    name: &str,
    context: &C,
) -> Result<ValueSequence, EvaluationError>
where
    C: ?Sized,
    P: BindProvider<C> + ?Sized,
{
    match provider.lookup(name) {
        Some(param) => param.resolve(context),
        None => {
            tracing::trace!(bind = name, "unregistered bind resolves to empty sequence");
            Ok(ValueSequence::new())
        }
    }
}
