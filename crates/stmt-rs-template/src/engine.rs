//! Template engine: parses, caches and renders statement templates.
//!
//! The [`Engine`] is the convenience entry point for callers preparing many
//! statements: it optionally caches parsed templates by source text and wraps
//! them as named [`StatementTemplate`]s. Rendering itself is stateless.

use std::sync::Arc;

use stmt_rs_core::error::{StatementError, StatementResult, SyntaxError};
use stmt_rs_core::settings::TemplateSettings;

use crate::bind::BindProvider;
use crate::cache::TemplateCache;
use crate::parser::Template;
use crate::statement::StatementTemplate;

/// The statement template engine.
///
/// # Examples
///
/// ```
/// use stmt_rs_template::bind::{ConstantParameter, ParameterMap};
/// use stmt_rs_template::engine::Engine;
///
/// let engine = Engine::new();
/// let statement = engine
///     .prepare("count", "SELECT COUNT(*) FROM {{{table}}}")
///     .unwrap();
///
/// let provider: ParameterMap<()> =
///     ParameterMap::new().with("table", ConstantParameter::single("orders"));
/// let rendered = statement.apply_templates(&provider, &()).unwrap();
/// assert_eq!(rendered.text, "SELECT COUNT(*) FROM orders");
/// ```
#[derive(Debug)]
pub struct Engine {
    /// Parsed templates keyed by source text, when caching is enabled.
    cache: Option<TemplateCache>,
}

impl Engine {
    /// Creates an engine with an unbounded template cache.
    pub fn new() -> Self {
        Self::from_settings(&TemplateSettings::default())
    }

    /// Creates an engine from the given settings.
    pub fn from_settings(settings: &TemplateSettings) -> Self {
        let cache = settings
            .cache_enabled
            .then(|| TemplateCache::with_capacity(settings.cache_capacity));
        tracing::debug!(
            cache_enabled = settings.cache_enabled,
            cache_capacity = settings.cache_capacity,
            "template engine created"
        );
        Self { cache }
    }

    /// Creates an engine that parses every template afresh.
    pub const fn without_cache() -> Self {
        Self { cache: None }
    }

    /// The template cache, if caching is enabled.
    pub const fn cache(&self) -> Option<&TemplateCache> {
        self.cache.as_ref()
    }

    /// Parses `source`, consulting the cache when enabled.
    ///
    /// # Errors
    ///
    /// Returns the [`SyntaxError`] from parsing.
    pub fn get_template(&self, source: &str) -> Result<Arc<Template>, SyntaxError> {
        match &self.cache {
            Some(cache) => cache.get_or_parse(source),
            None => Template::parse(source).map(Arc::new),
        }
    }

    /// Prepares a named statement from its raw text.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::Syntax`] naming the statement.
    pub fn prepare(&self, name: &str, source: &str) -> StatementResult<StatementTemplate> {
        let template = self
            .get_template(source)
            .map_err(|e| StatementError::syntax(name, e))?;
        Ok(StatementTemplate::new(name, template))
    }

    /// Parses and renders `source` in one step.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for malformed templates or the evaluation error
    /// raised by a bind.
    pub fn render_str<C, P>(&self, source: &str, provider: &P, context: &C) -> StatementResult<String>
    where
        C: ?Sized,
        P: BindProvider<C> + ?Sized,
    {
        let template = self
            .get_template(source)
            .map_err(|e| StatementError::syntax("<inline>", e))?;
        Ok(template.render(provider, context)?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
