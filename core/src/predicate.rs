//! Predicate: the value test held by every [`MatcherNode`](crate::MatcherNode)
//!
//! A predicate decides whether evaluation descends past a node. Predicates are
//! held as `Box<dyn Predicate<T>>`, so closures and concrete matchers mix freely
//! in one tree.
//!
//! # Available Predicates
//!
//! - [`PredicateFn`]: Wraps a closure (see [`from_fn`])
//! - [`Always`] / [`Never`]: Constant predicates
//! - [`Not`], [`All`], [`Any`]: Boolean composition
//! - [`Exact`], [`Prefix`], [`Suffix`], [`Contains`]: String tests for `T: AsRef<str>`

use std::fmt::{self, Debug};

/// Tests a value of type `T`.
///
/// Predicates must be pure: the engine may call them in any order across
/// evaluations and assumes no side effects.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so a finished tree can be shared
/// across threads for read-only evaluation.
///
/// # Example
///
/// ```
/// use cascade::{Predicate, Prefix};
///
/// let p = Prefix::new("/api");
/// assert!(p.test("/api/users"));
/// assert!(!p.test("/static"));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Predicate<{T}>`",
    label = "this type cannot test values of type `{T}`",
    note = "closures can be wrapped with `cascade::from_fn`, or passed directly to `MatcherNode::new`"
)]
pub trait Predicate<T: ?Sized>: Send + Sync {
    /// Returns `true` if the value is accepted.
    fn test(&self, value: &T) -> bool;

    /// Human-readable description, used by `Debug` output and traces.
    fn describe(&self) -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }
}

#[diagnostic::do_not_recommend]
impl<T: ?Sized> Predicate<T> for Box<dyn Predicate<T>> {
    fn test(&self, value: &T) -> bool {
        (**self).test(value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Closures
// ═══════════════════════════════════════════════════════════════════════════════

/// A predicate backed by a closure.
///
/// The optional name shows up in `Debug` output and evaluation traces in place
/// of the opaque closure type.
#[derive(Clone)]
pub struct PredicateFn<F> {
    name: Option<String>,
    f: F,
}

impl<F> PredicateFn<F> {
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { name: None, f }
    }

    /// Wrap a closure under a descriptive name.
    pub fn named(name: impl Into<String>, f: F) -> Self {
        Self {
            name: Some(name.into()),
            f,
        }
    }
}

impl<T, F> Predicate<T> for PredicateFn<F>
where
    T: ?Sized,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn test(&self, value: &T) -> bool {
        (self.f)(value)
    }

    fn describe(&self) -> String {
        self.name.clone().unwrap_or_else(|| "fn".to_string())
    }
}

impl<F> Debug for PredicateFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Wrap a closure as a [`Predicate`].
///
/// ```
/// use cascade::{from_fn, Predicate};
///
/// let even = from_fn(|x: &i64| x % 2 == 0);
/// assert!(even.test(&4));
/// assert!(!even.test(&5));
/// ```
pub fn from_fn<T, F>(f: F) -> PredicateFn<F>
where
    T: ?Sized,
    F: Fn(&T) -> bool + Send + Sync,
{
    PredicateFn::new(f)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Accepts every value. Useful as a catch-all root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Always;

impl<T: ?Sized> Predicate<T> for Always {
    fn test(&self, _value: &T) -> bool {
        true
    }

    fn describe(&self) -> String {
        "always".to_string()
    }
}

/// Rejects every value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Never;

impl<T: ?Sized> Predicate<T> for Never {
    fn test(&self, _value: &T) -> bool {
        false
    }

    fn describe(&self) -> String {
        "never".to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════════════════════════════════════════

/// Inverts the inner predicate (logical NOT).
#[derive(Debug, Clone)]
pub struct Not<P>(pub P);

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    fn test(&self, value: &T) -> bool {
        !self.0.test(value)
    }

    fn describe(&self) -> String {
        format!("not({})", self.0.describe())
    }
}

/// All predicates must accept (logical AND).
///
/// Short-circuits on the first `false`. An empty `All` accepts everything
/// (vacuous truth).
pub struct All<T: ?Sized> {
    predicates: Vec<Box<dyn Predicate<T>>>,
}

impl<T: ?Sized> All<T> {
    /// Create an empty conjunction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Create a conjunction from boxed predicates, kept in iteration order.
    pub fn from_all<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Predicate<T>>>,
    {
        Self {
            predicates: predicates.into_iter().collect(),
        }
    }

    /// Add a predicate (builder pattern).
    #[must_use]
    pub fn with(mut self, predicate: impl Predicate<T> + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if there are no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<T: ?Sized> Default for All<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> From<Vec<Box<dyn Predicate<T>>>> for All<T> {
    fn from(predicates: Vec<Box<dyn Predicate<T>>>) -> Self {
        Self { predicates }
    }
}

impl<T: ?Sized> Predicate<T> for All<T> {
    fn test(&self, value: &T) -> bool {
        self.predicates.iter().all(|p| p.test(value))
    }

    fn describe(&self) -> String {
        describe_list("all", &self.predicates)
    }
}

impl<T: ?Sized> Debug for All<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("All").field(&self.predicates.len()).finish()
    }
}

/// Any predicate must accept (logical OR).
///
/// Short-circuits on the first `true`. An empty `Any` rejects everything.
pub struct Any<T: ?Sized> {
    predicates: Vec<Box<dyn Predicate<T>>>,
}

impl<T: ?Sized> Any<T> {
    /// Create an empty disjunction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Create a disjunction from boxed predicates, kept in iteration order.
    pub fn from_any<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Predicate<T>>>,
    {
        Self {
            predicates: predicates.into_iter().collect(),
        }
    }

    /// Add a predicate (builder pattern).
    #[must_use]
    pub fn with(mut self, predicate: impl Predicate<T> + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if there are no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<T: ?Sized> Default for Any<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> From<Vec<Box<dyn Predicate<T>>>> for Any<T> {
    fn from(predicates: Vec<Box<dyn Predicate<T>>>) -> Self {
        Self { predicates }
    }
}

impl<T: ?Sized> Predicate<T> for Any<T> {
    fn test(&self, value: &T) -> bool {
        self.predicates.iter().any(|p| p.test(value))
    }

    fn describe(&self) -> String {
        describe_list("any", &self.predicates)
    }
}

impl<T: ?Sized> Debug for Any<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Any").field(&self.predicates.len()).finish()
    }
}

fn describe_list<T: ?Sized>(op: &str, predicates: &[Box<dyn Predicate<T>>]) -> String {
    let inner: Vec<String> = predicates.iter().map(|p| p.describe()).collect();
    format!("{op}({})", inner.join(", "))
}

// ═══════════════════════════════════════════════════════════════════════════════
// String Predicates
// ═══════════════════════════════════════════════════════════════════════════════

/// Exact string equality. Case-sensitive, no trimming.
///
/// ```
/// use cascade::{Exact, Predicate};
///
/// let p = Exact::new("hello");
/// assert!(p.test("hello"));
/// assert!(!p.test("Hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exact {
    expected: String,
}

impl Exact {
    /// Create a new exact predicate.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Returns the expected value.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl<T: AsRef<str> + ?Sized> Predicate<T> for Exact {
    fn test(&self, value: &T) -> bool {
        value.as_ref() == self.expected
    }

    fn describe(&self) -> String {
        format!("exact({:?})", self.expected)
    }
}

/// Accepts strings starting with the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    prefix: String,
}

impl Prefix {
    /// Create a new prefix predicate.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the prefix being matched.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<T: AsRef<str> + ?Sized> Predicate<T> for Prefix {
    fn test(&self, value: &T) -> bool {
        value.as_ref().starts_with(&self.prefix)
    }

    fn describe(&self) -> String {
        format!("prefix({:?})", self.prefix)
    }
}

/// Accepts strings ending with the suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    suffix: String,
}

impl Suffix {
    /// Create a new suffix predicate.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Returns the suffix being matched.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl<T: AsRef<str> + ?Sized> Predicate<T> for Suffix {
    fn test(&self, value: &T) -> bool {
        value.as_ref().ends_with(&self.suffix)
    }

    fn describe(&self) -> String {
        format!("suffix({:?})", self.suffix)
    }
}

/// Accepts strings containing the substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    substring: String,
}

impl Contains {
    /// Create a new contains predicate.
    pub fn new(substring: impl Into<String>) -> Self {
        Self {
            substring: substring.into(),
        }
    }

    /// Returns the substring being searched for.
    #[must_use]
    pub fn substring(&self) -> &str {
        &self.substring
    }
}

impl<T: AsRef<str> + ?Sized> Predicate<T> for Contains {
    fn test(&self, value: &T) -> bool {
        value.as_ref().contains(&self.substring)
    }

    fn describe(&self) -> String {
        format!("contains({:?})", self.substring)
    }
}
