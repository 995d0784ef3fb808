//! Bind providers.
//!
//! A [`BindProvider`] is the only way a template name can reach data. It
//! answers [`lookup`](BindProvider::lookup) with an [`InterfaceParameter`] it
//! explicitly registered, or `None`. The renderer never inspects values or
//! contexts by any other route, so a name that is not registered can only ever
//! render as empty text.
//!
//! The context type `C` is chosen by the caller: a document, a row, or `()`
//! for context-free constants.

use std::collections::HashMap;
use std::fmt;

use stmt_rs_core::error::EvaluationError;

use crate::value::ValueSequence;

/// A named bind capable of evaluating itself against a context.
pub trait InterfaceParameter<C: ?Sized>: Send + Sync {
    /// The bind name this parameter was registered under.
    fn name(&self) -> &str;

    /// Evaluates the bind against `context`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if the underlying expression is
    /// malformed or the context is incompatible.
    fn resolve(&self, context: &C) -> Result<ValueSequence, EvaluationError>;
}

/// Maps bind names to parameters.
pub trait BindProvider<C: ?Sized> {
    /// Returns the parameter registered for `name`, or `None` if the name is
    /// unknown.
    fn lookup(&self, name: &str) -> Option<&dyn InterfaceParameter<C>>;
}

impl<C: ?Sized, P: BindProvider<C> + ?Sized> BindProvider<C> for &P {
    fn lookup(&self, name: &str) -> Option<&dyn InterfaceParameter<C>> {
        (**self).lookup(name)
    }
}

/// An explicit registry of parameters keyed by bind name.
///
/// # Examples
///
/// ```
/// use stmt_rs_template::bind::{BindProvider, ConstantParameter, ParameterMap};
///
/// let mut params: ParameterMap<()> = ParameterMap::new();
/// params.register("limit", ConstantParameter::single(10));
///
/// assert!(params.lookup("limit").is_some());
/// assert!(params.lookup("offset").is_none());
/// ```
pub struct ParameterMap<C: ?Sized> {
    params: HashMap<String, Box<dyn InterfaceParameter<C>>>,
}

impl<C: ?Sized> ParameterMap<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Registers `param` under `name`, replacing any previous registration.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        param: impl InterfaceParameter<C> + 'static,
    ) {
        self.params.insert(name.into(), Box::new(param));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, param: impl InterfaceParameter<C> + 'static) -> Self {
        self.register(name, param);
        self
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Returns the number of registered binds.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over the registered bind names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }
}

impl<C: ?Sized> Default for ParameterMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for ParameterMap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ParameterMap").field("binds", &names).finish()
    }
}

impl<C: ?Sized> BindProvider<C> for ParameterMap<C> {
    fn lookup(&self, name: &str) -> Option<&dyn InterfaceParameter<C>> {
        self.params
            .get(name)
            .map(|param| param.as_ref() as &dyn InterfaceParameter<C>)
    }
}

/// A parameter with a fixed value, independent of the context.
#[derive(Debug, Clone)]
pub struct ConstantParameter {
    name: String,
    values: ValueSequence,
}

impl ConstantParameter {
    /// Creates a constant parameter resolving to `values`.
    pub fn new(name: impl Into<String>, values: impl Into<ValueSequence>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    /// Creates an unnamed constant resolving to a single value.
    ///
    /// The name reported by [`InterfaceParameter::name`] is empty; the
    /// registry key is what templates refer to.
    pub fn single(value: impl Into<crate::value::Value>) -> Self {
        Self::new(String::new(), ValueSequence::single(value))
    }
}

impl<C: ?Sized> InterfaceParameter<C> for ConstantParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, _context: &C) -> Result<ValueSequence, EvaluationError> {
        Ok(self.values.clone())
    }
}

/// A parameter backed by a closure over the context.
///
/// # Examples
///
/// ```
/// use stmt_rs_template::bind::{FnParameter, InterfaceParameter};
/// use stmt_rs_template::value::ValueSequence;
///
/// let param = FnParameter::new("len", |ctx: &str| Ok(ValueSequence::single(ctx.len() as i64)));
/// assert_eq!(param.resolve("abc").unwrap().to_canonical_string(), "3");
/// ```
pub struct FnParameter<F> {
    name: String,
    func: F,
}

impl<F> FnParameter<F> {
    /// Creates a closure-backed parameter.
    pub fn new<C>(name: impl Into<String>, func: F) -> Self
    where
        C: ?Sized,
        F: Fn(&C) -> Result<ValueSequence, EvaluationError> + Send + Sync,
    {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnParameter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnParameter").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<C, F> InterfaceParameter<C> for FnParameter<F>
where
    C: ?Sized,
    F: Fn(&C) -> Result<ValueSequence, EvaluationError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, context: &C) -> Result<ValueSequence, EvaluationError> {
        (self.func)(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_lookup_registered() {
        let params: ParameterMap<()> =
            ParameterMap::new().with("a", ConstantParameter::new("a", Value::from("x")));
        let param = params.lookup("a").unwrap();
        assert_eq!(param.name(), "a");
        assert_eq!(param.resolve(&()).unwrap(), ValueSequence::single("x"));
    }

    #[test]
    fn test_lookup_unregistered_is_none() {
        let params: ParameterMap<()> = ParameterMap::new();
        assert!(params.lookup("anything").is_none());
        assert!(params.is_empty());
    }

    #[test]
    fn test_register_replaces() {
        let mut params: ParameterMap<()> = ParameterMap::new();
        params.register("a", ConstantParameter::single(1));
        params.register("a", ConstantParameter::single(2));
        assert_eq!(params.len(), 1);
        assert_eq!(
            params.lookup("a").unwrap().resolve(&()).unwrap().to_canonical_string(),
            "2"
        );
    }

    #[test]
    fn test_fn_parameter_uses_context() {
        let params: ParameterMap<i64> = ParameterMap::new().with(
            "double",
            FnParameter::new("double", |n: &i64| Ok(ValueSequence::single(n * 2))),
        );
        let seq = params.lookup("double").unwrap().resolve(&21).unwrap();
        assert_eq!(seq.first(), Some(&Value::Integer(42)));
    }

    #[test]
    fn test_fn_parameter_propagates_error() {
        let param = FnParameter::new("bad", |_: &()| {
            Err(EvaluationError::expression("bad", "boom"))
        });
        let err = InterfaceParameter::<()>::resolve(&param, &()).unwrap_err();
        assert_eq!(err.bind(), "bad");
    }

    #[test]
    fn test_provider_by_reference() {
        fn has<P: BindProvider<()>>(provider: P, name: &str) -> bool {
            provider.lookup(name).is_some()
        }

        let params: ParameterMap<()> = ParameterMap::new().with("a", ConstantParameter::single(true));
        assert!(has(&params, "a"));
        assert!(!has(&params, "b"));
    }

    #[test]
    fn test_debug_lists_sorted_names() {
        let params: ParameterMap<()> = ParameterMap::new()
            .with("b", ConstantParameter::single(1))
            .with("a", ConstantParameter::single(2));
        assert_eq!(format!("{params:?}"), r#"ParameterMap { binds: ["a", "b"] }"#);
    }
}
