//! Caller-owned cache of parsed templates.
//!
//! Templates are keyed by the SHA-256 digest of their source text, so two
//! statements with identical template text share one parsed [`Template`].
//! The cache has no global instance: whoever creates it decides its lifetime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};
use stmt_rs_core::error::SyntaxError;

use crate::parser::Template;

type CacheKey = [u8; 32];

/// A thread-safe map from template source text to parsed templates.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stmt_rs_template::cache::TemplateCache;
///
/// let cache = TemplateCache::new();
/// let a = cache.get_or_parse("SELECT {{col}} FROM t").unwrap();
/// let b = cache.get_or_parse("SELECT {{col}} FROM t").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(cache.len(), 1);
/// ```
pub struct TemplateCache {
    templates: RwLock<HashMap<CacheKey, Arc<Template>>>,
    /// Maximum number of entries; `0` means unbounded.
    capacity: usize,
}

impl TemplateCache {
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a cache holding at most `capacity` templates (`0` = unbounded).
    ///
    /// Once full, further templates are still parsed and returned but are
    /// not retained.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Returns the cached template for `source`, parsing it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the [`SyntaxError`] from parsing. Failed parses are never cached.
    pub fn get_or_parse(&self, source: &str) -> Result<Arc<Template>, SyntaxError> {
        let key = digest(source);

        if let Some(template) = self.read_map().get(&key) {
            tracing::trace!("template cache hit");
            return Ok(Arc::clone(template));
        }

        let parsed = Arc::new(Template::parse(source)?);

        let mut templates = self
            .templates
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(existing) = templates.get(&key) {
            return Ok(Arc::clone(existing));
        }
        if self.capacity == 0 || templates.len() < self.capacity {
            templates.insert(key, Arc::clone(&parsed));
            tracing::trace!(entries = templates.len(), "template cached");
        } else {
            tracing::debug!(capacity = self.capacity, "template cache full, not caching");
        }
        Ok(parsed)
    }

    /// Returns `true` if a template for `source` is cached.
    pub fn contains(&self, source: &str) -> bool {
        self.read_map().contains_key(&digest(source))
    }

    /// Returns the number of cached templates.
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    /// The configured capacity (`0` = unbounded).
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every cached template.
    pub fn clear(&self) {
        self.templates
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Arc<Template>>> {
        self.templates
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

fn digest(source: &str) -> CacheKey {
    Sha256::digest(source.as_bytes()).into()
}
