//! Bind providers that evaluate path expressions against a JSON document.

use std::fmt;

use serde_json::Value as Json;
use stmt_rs_core::error::EvaluationError;
use stmt_rs_template::bind::{BindProvider, ConstantParameter, InterfaceParameter, ParameterMap};
use stmt_rs_template::value::{Value, ValueSequence};

use crate::path::PathExpression;

/// A bind evaluated as a [`PathExpression`] against the render context.
///
/// The expression text is kept as written and compiled on each resolution,
/// so a malformed expression surfaces as an [`EvaluationError`] at render
/// time. Use [`PathParameter::compiled`] to validate up front.
#[derive(Debug, Clone)]
pub struct PathParameter {
    name: String,
    expression: String,
}

impl PathParameter {
    /// Creates a parameter for `expression`.
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }

    /// The raw expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Compiles the expression.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Expression`] if the expression is malformed.
    pub fn compiled(&self) -> Result<PathExpression, EvaluationError> {
        PathExpression::parse(&self.expression)
            .map_err(|e| EvaluationError::expression(&self.name, e.to_string()))
    }
}

impl InterfaceParameter<Json> for PathParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, context: &Json) -> Result<ValueSequence, EvaluationError> {
        let expression = self.compiled()?;
        if !expression.is_self() && !matches!(context, Json::Object(_) | Json::Array(_)) {
            return Err(EvaluationError::incompatible_context(
                &self.name,
                "context is a scalar, not a document",
            ));
        }

        let values: ValueSequence = expression.select(context).into_iter().map(node_value).collect();
        tracing::trace!(
            bind = %self.name,
            expression = %self.expression,
            matched = values.len(),
            "path bind resolved"
        );
        Ok(values)
    }
}

/// Converts a selected JSON node into a typed value.
///
/// Strings, numbers and booleans keep their type. `null` is an empty element,
/// and objects or arrays are complex content with no scalar value; both
/// become empty text.
pub fn node_value(node: &Json) -> Value {
    match node {
        Json::String(s) => Value::Text(s.clone()),
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) => n
            .as_i64()
            .map_or_else(|| Value::Number(n.as_f64().unwrap_or(f64::NAN)), Value::Integer),
        Json::Null | Json::Object(_) | Json::Array(_) => Value::Text(String::new()),
    }
}

/// A registry of binds over a JSON document.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stmt_rs_document::provider::DocumentBindProvider;
/// use stmt_rs_template::parser::Template;
///
/// let provider = DocumentBindProvider::new()
///     .bind_path("status", "./FILTER/STATUS")
///     .bind_constant("limit", 50);
///
/// let doc = json!({"FILTER": {"STATUS": "OPEN"}});
/// let template = Template::parse(
///     "SELECT * FROM t {{#status}}WHERE status = '{{status}}'{{/status}} FETCH FIRST {{limit}} ROWS ONLY",
/// )
/// .unwrap();
/// assert_eq!(
///     template.render(&provider, &doc).unwrap(),
///     "SELECT * FROM t WHERE status = 'OPEN' FETCH FIRST 50 ROWS ONLY"
/// );
/// ```
#[derive(Default)]
pub struct DocumentBindProvider {
    params: ParameterMap<Json>,
}

impl DocumentBindProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a path-expression bind.
    #[must_use]
    pub fn bind_path(mut self, name: &str, expression: &str) -> Self {
        self.params.register(name, PathParameter::new(name, expression));
        self
    }

    /// Registers a bind with a fixed value.
    #[must_use]
    pub fn bind_constant(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params
            .register(name, ConstantParameter::new(name, ValueSequence::single(value)));
        self
    }

    /// Registers a bind with a fixed sequence of values.
    #[must_use]
    pub fn bind_sequence(mut self, name: &str, values: impl Into<ValueSequence>) -> Self {
        self.params.register(name, ConstantParameter::new(name, values));
        self
    }

    /// Registers any parameter implementation.
    #[must_use]
    pub fn bind(mut self, name: &str, param: impl InterfaceParameter<Json> + 'static) -> Self {
        self.params.register(name, param);
        self
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains(name)
    }

    /// Returns the number of registered binds.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Debug for DocumentBindProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBindProvider")
            .field("params", &self.params)
            .finish()
    }
}

impl BindProvider<Json> for DocumentBindProvider {
    fn lookup(&self, name: &str) -> Option<&dyn InterfaceParameter<Json>> {
        self.params.lookup(name)
    }
}
