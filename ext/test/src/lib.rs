//! cascade-test: Test domain for conformance testing
//!
//! Provides a simple value type, a recorder for callback firings and
//! predicate visits, and (with the `fixtures` feature) a YAML fixture runner.
//!
//! # Example
//!
//! ```
//! use cascade_test::prelude::*;
//!
//! let recorder = Recorder::new();
//! let mut root = MatcherNode::from_predicate(recorder.watch("even", Box::new(Even)))
//!     .with_field("name", "even")
//!     .with_on_match(recorder.callback());
//! root.attach_child(
//!     MatcherNode::from_predicate(recorder.watch("big", Box::new(GreaterThan(10))))
//!         .with_field("name", "big")
//!         .with_on_match(recorder.callback()),
//! )
//! .unwrap();
//!
//! assert!(root.evaluate(&TestValue::Int(12)));
//! let recording = recorder.take();
//! assert_eq!(recording.visited, vec!["even", "big"]);
//! assert_eq!(recording.firings[0].chain, vec!["even", "big"]);
//! ```

use cascade::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};


/// Test value: an integer or a string.
///
/// Numeric predicates reject strings and string predicates reject integers,
/// so one tree can mix both kinds of tests.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "fixtures", derive(serde::Deserialize), serde(untagged))]
pub enum TestValue {
    /// An integer.
    Int(i64),
    /// A string.
    Str(String),
}

impl TestValue {
    /// The integer, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(s) => Some(s),
        }
    }
}

impl From<i64> for TestValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for TestValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl std::fmt::Display for TestValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Predicates
// ═══════════════════════════════════════════════════════════════════════════════

/// Accepts even integers.
#[derive(Debug, Clone, Copy)]
pub struct Even;

impl Predicate<TestValue> for Even {
    fn test(&self, value: &TestValue) -> bool {
        value.as_int().is_some_and(|n| n % 2 == 0)
    }

    fn describe(&self) -> String {
        "even".to_string()
    }
}

/// Accepts integers strictly greater than the bound.
#[derive(Debug, Clone, Copy)]
pub struct GreaterThan(pub i64);

impl Predicate<TestValue> for GreaterThan {
    fn test(&self, value: &TestValue) -> bool {
        value.as_int().is_some_and(|n| n > self.0)
    }

    fn describe(&self) -> String {
        format!("gt({})", self.0)
    }
}

/// Accepts integers strictly less than the bound.
#[derive(Debug, Clone, Copy)]
pub struct LessThan(pub i64);

impl Predicate<TestValue> for LessThan {
    fn test(&self, value: &TestValue) -> bool {
        value.as_int().is_some_and(|n| n < self.0)
    }

    fn describe(&self) -> String {
        format!("lt({})", self.0)
    }
}

/// Accepts integers divisible by the factor. A zero factor accepts nothing.
#[derive(Debug, Clone, Copy)]
pub struct MultipleOf(pub i64);

impl Predicate<TestValue> for MultipleOf {
    fn test(&self, value: &TestValue) -> bool {
        self.0 != 0 && value.as_int().is_some_and(|n| n % self.0 == 0)
    }

    fn describe(&self) -> String {
        format!("multiple_of({})", self.0)
    }
}

/// Applies a string predicate to [`TestValue::Str`]; integers are rejected.
#[derive(Debug, Clone)]
pub struct OnStr<P>(pub P);

impl<P: Predicate<str>> Predicate<TestValue> for OnStr<P> {
    fn test(&self, value: &TestValue) -> bool {
        value.as_str().is_some_and(|s| self.0.test(s))
    }

    fn describe(&self) -> String {
        self.0.describe()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Recorder
// ═══════════════════════════════════════════════════════════════════════════════

/// One callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Firing {
    /// The evaluated value.
    pub value: TestValue,
    /// Name of the node whose callback fired.
    pub node: String,
    /// Names of the chain passed to the callback, root first.
    pub chain: Vec<String>,
}

/// Everything observed since the last [`Recorder::take`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recording {
    /// Callback invocations, in order.
    pub firings: Vec<Firing>,
    /// Names of nodes whose predicate ran, in order.
    pub visited: Vec<String>,
}

/// Shared log of callback firings and predicate visits.
///
/// Cloning shares the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Recording>>,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A match callback that records a [`Firing`].
    pub fn callback(
        &self,
    ) -> impl Fn(&TestValue, &MatcherNode<TestValue>, &[&MatcherNode<TestValue>]) + Send + Sync + 'static
    {
        let recorder = self.clone();
        move |value: &TestValue,
              node: &MatcherNode<TestValue>,
              chain: &[&MatcherNode<TestValue>]| {
            recorder.lock().firings.push(Firing {
                value: value.clone(),
                node: node_name(node),
                chain: chain.iter().map(|n| node_name(*n)).collect(),
            });
        }
    }

    /// Wrap a predicate so every call records `name` as visited.
    pub fn watch(&self, name: impl Into<String>, inner: Box<dyn Predicate<TestValue>>) -> Watched {
        Watched {
            name: name.into(),
            inner,
            recorder: self.clone(),
        }
    }

    /// Return and clear everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Recording {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A predicate that records its visits. Created by [`Recorder::watch`].
pub struct Watched {
    name: String,
    inner: Box<dyn Predicate<TestValue>>,
    recorder: Recorder,
}

impl Predicate<TestValue> for Watched {
    fn test(&self, value: &TestValue) -> bool {
        self.recorder.lock().visited.push(self.name.clone());
        self.inner.test(value)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

impl std::fmt::Debug for Watched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watched")
            .field("name", &self.name)
            .field("inner", &self.inner.describe())
            .finish()
    }
}

/// The node's `name` metadata field, or `"?"` when absent.
pub fn node_name<T: ?Sized>(node: &MatcherNode<T>) -> String {
    node.get("name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("?")
        .to_string()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        node_name, Even, Firing, GreaterThan, LessThan, MultipleOf, OnStr, Recorder, Recording,
        TestValue, Watched,
    };
    pub use cascade::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(
        recorder: &Recorder,
        name: &str,
        predicate: impl Predicate<TestValue> + 'static,
    ) -> MatcherNode<TestValue> {
        MatcherNode::from_predicate(recorder.watch(name, Box::new(predicate)))
            .with_field("name", name)
            .with_on_match(recorder.callback())
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(TestValue::from(3).as_int(), Some(3));
        assert_eq!(TestValue::from(3).as_str(), None);
        assert_eq!(TestValue::from("x").as_str(), Some("x"));
        assert_eq!(TestValue::from("x").to_string(), "\"x\"");
    }

    #[test]
    fn test_numeric_predicates_reject_strings() {
        let s = TestValue::from("12");
        assert!(!Even.test(&s));
        assert!(!GreaterThan(0).test(&s));
        assert!(!MultipleOf(3).test(&s));
        assert!(!MultipleOf(0).test(&TestValue::Int(0)));
    }

    #[test]
    fn test_on_str() {
        let p = OnStr(Prefix::new("ab"));
        assert!(p.test(&TestValue::from("abc")));
        assert!(!p.test(&TestValue::Int(1)));
        assert_eq!(p.describe(), r#"prefix("ab")"#);
    }

    #[test]
    fn test_recorder_two_children() {
        let recorder = Recorder::new();
        let root = named(&recorder, "root", Even)
            .with_child(named(&recorder, "big", GreaterThan(10)))
            .and_then(|n| n.with_child(named(&recorder, "triple", MultipleOf(3))))
            .unwrap();

        assert!(root.evaluate(&TestValue::Int(6)));
        let recording = recorder.take();
        assert_eq!(recording.visited, vec!["root", "big", "triple"]);
        assert_eq!(
            recording.firings,
            vec![Firing {
                value: TestValue::Int(6),
                node: "triple".into(),
                chain: vec!["root".into(), "triple".into()],
            }]
        );

        assert!(!root.evaluate(&TestValue::Int(15)));
        let recording = recorder.take();
        assert_eq!(recording.visited, vec!["root"]);
        assert!(recording.firings.is_empty());
    }

    #[test]
    fn test_node_name_default() {
        let node = MatcherNode::<TestValue>::from_predicate(Even);
        assert_eq!(node_name(&node), "?");
    }
}
