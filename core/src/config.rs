//! Runtime matcher configuration
//!
//! [`MatcherConfig`] collects a predicate, a callback and metadata fields at
//! runtime, then [`create_matcher`] validates it before any node exists. This
//! is the path for trees assembled from data; trees written in code can use
//! [`MatcherNode::new`] directly, where the predicate is required by the
//! signature.

use crate::{Callback, MatcherError, MatcherNode, Predicate, PredicateFn};
use serde_json::Value;
use std::fmt;

/// Caller-defined attributes attached to a node. Never interpreted by the engine.
pub type Metadata = serde_json::Map<String, Value>;

/// Configuration for a single [`MatcherNode`].
///
/// # Example
///
/// ```
/// use cascade::{create_matcher, MatcherConfig};
///
/// let config = MatcherConfig::new()
///     .predicate(|s: &str| s.starts_with('a'))
///     .field("name", "starts-with-a")
///     .field("priority", 3);
///
/// let node = create_matcher(config).unwrap();
/// assert_eq!(node.get("priority"), Some(&3.into()));
/// assert!(node.evaluate("abc"));
/// ```
pub struct MatcherConfig<T: ?Sized> {
    pub(crate) predicate: Option<Box<dyn Predicate<T>>>,
    pub(crate) on_match: Option<Box<Callback<T>>>,
    pub(crate) metadata: Metadata,
}

impl<T: ?Sized> MatcherConfig<T> {
    /// Create an empty configuration (no predicate, no callback, no fields).
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicate: None,
            on_match: None,
            metadata: Metadata::new(),
        }
    }

    /// Create a configuration whose metadata is the fields of a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidMatcherConfig`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, MatcherError> {
        match value {
            Value::Object(fields) => Ok(Self::new().fields(fields)),
            other => Err(MatcherError::InvalidMatcherConfig {
                reason: format!("expected an object of fields, got {}", json_kind(&other)),
            }),
        }
    }

    /// Set the predicate from a closure.
    #[must_use]
    pub fn predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(PredicateFn::new(predicate)));
        self
    }

    /// Set the predicate from any [`Predicate`] implementation.
    #[must_use]
    pub fn predicate_with(mut self, predicate: impl Predicate<T> + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Set the match callback.
    #[must_use]
    pub fn on_match<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T, &MatcherNode<T>, &[&MatcherNode<T>]) + Send + Sync + 'static,
    {
        self.on_match = Some(Box::new(callback));
        self
    }

    /// Set one metadata field. Later values overwrite earlier ones.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merge metadata fields (shallow copy). Later values overwrite earlier ones.
    #[must_use]
    pub fn fields(mut self, fields: Metadata) -> Self {
        self.metadata.extend(fields);
        self
    }

    /// Returns `true` if a predicate has been set.
    #[must_use]
    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    /// Returns the metadata collected so far.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl<T: ?Sized> Default for MatcherConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for MatcherConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherConfig")
            .field("predicate", &self.predicate.as_ref().map(|p| p.describe()))
            .field("has_callback", &self.on_match.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl<T: ?Sized> TryFrom<MatcherConfig<T>> for MatcherNode<T> {
    type Error = MatcherError;

    fn try_from(config: MatcherConfig<T>) -> Result<Self, Self::Error> {
        Self::from_config(config)
    }
}

/// Build a [`MatcherNode`] from a configuration.
///
/// # Errors
///
/// Returns [`MatcherError::InvalidMatcherConfig`] if the configuration has no
/// predicate, whatever other fields it carries. No node is produced.
pub fn create_matcher<T: ?Sized>(
    config: MatcherConfig<T>,
) -> Result<MatcherNode<T>, MatcherError> {
    MatcherNode::from_config(config)
}

/// Anything that can be attached as a child via [`MatcherNode::attach_child`].
///
/// Implemented for built nodes (always valid), for configurations (validated
/// on attach) and for the result of a previous construction attempt.
pub trait IntoMatcherNode<T: ?Sized> {
    /// Produce a validated node.
    ///
    /// # Errors
    ///
    /// Returns an error describing why no valid node could be produced.
    fn into_matcher_node(self) -> Result<MatcherNode<T>, MatcherError>;
}

impl<T: ?Sized> IntoMatcherNode<T> for MatcherNode<T> {
    fn into_matcher_node(self) -> Result<MatcherNode<T>, MatcherError> {
        Ok(self)
    }
}

impl<T: ?Sized> IntoMatcherNode<T> for MatcherConfig<T> {
    fn into_matcher_node(self) -> Result<MatcherNode<T>, MatcherError> {
        MatcherNode::from_config(self)
    }
}

impl<T: ?Sized> IntoMatcherNode<T> for Result<MatcherNode<T>, MatcherError> {
    fn into_matcher_node(self) -> Result<MatcherNode<T>, MatcherError> {
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
