//! cascade - hierarchical first-branch matcher trees
//!
//! A tree of predicate nodes. A value is tested depth-first against each
//! node's predicate, descending into the first accepting child, and the
//! callback of the deepest accepting node fires.
//!
//! # Architecture
//!
//! - [`Predicate<T>`]: Pure value test held by every node (closures or concrete types)
//! - [`MatcherNode<T>`]: Predicate + optional callback + ordered children + metadata
//! - [`MatcherConfig<T>`]: Runtime assembly, validated by [`create_matcher`]
//! - [`MatchPath`]: The accepted path of one evaluation, returned by [`MatcherNode::find`]
//! - [`EvalTrace`]: Full record of which predicates ran, for debugging
//!
//! # Key Semantics
//!
//! 1. **Rejection stops descent**: if a node's predicate rejects the value, none
//!    of its descendants are visited and nothing fires.
//!
//! 2. **First branch wins**: children are tried in insertion order; the first
//!    child that accepts claims the match and later siblings are never visited.
//!
//! 3. **Deepest match fires**: the callback fires at most once per evaluation,
//!    on the deepest accepting node, with the chain of accepting nodes from the
//!    evaluation root down to it.
//!
//! # Example
//!
//! ```
//! use cascade::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let fired = Arc::new(Mutex::new(Vec::new()));
//! let log = Arc::clone(&fired);
//! let record = move |value: &i64, node: &MatcherNode<i64>, chain: &[&MatcherNode<i64>]| {
//!     let name = node.get("name").and_then(|v| v.as_str()).unwrap_or("?");
//!     log.lock().unwrap().push((*value, name.to_string(), chain.len()));
//! };
//!
//! let mut root = MatcherNode::new(|x: &i64| x % 2 == 0)
//!     .with_field("name", "even")
//!     .with_on_match(record.clone());
//! root.attach_child(
//!     MatcherNode::new(|x: &i64| *x > 10)
//!         .with_field("name", "big")
//!         .with_on_match(record),
//! )
//! .unwrap();
//!
//! assert!(root.evaluate(&2));
//! assert!(root.evaluate(&12));
//! assert!(!root.evaluate(&11));
//!
//! let fired = fired.lock().unwrap();
//! assert_eq!(*fired, vec![(2, "even".into(), 1), (12, "big".into(), 2)]);
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod config;
mod node;
mod path;
mod predicate;
mod trace;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use config::{create_matcher, IntoMatcherNode, MatcherConfig, Metadata};
pub use node::{Callback, ChildMut, MatchTree, MatcherNode};
pub use path::MatchPath;

// Predicates
pub use predicate::{
    from_fn, All, Always, Any, Contains, Exact, Never, Not, Predicate, PredicateFn, Prefix,
    Suffix,
};

// Trace types
pub use trace::{EvalTrace, NodeTrace};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use cascade::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Construction
        create_matcher,
        from_fn,
        // Predicates
        All,
        Always,
        Any,
        ChildMut,
        Contains,
        // Trace types
        EvalTrace,
        Exact,
        IntoMatcherNode,
        MatchPath,
        MatchTree,
        MatcherConfig,
        // Errors
        MatcherError,
        // Core types
        MatcherNode,
        Metadata,
        Never,
        NodeTrace,
        Not,
        Predicate,
        PredicateFn,
        Prefix,
        Suffix,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth of a matcher tree.
///
/// Evaluation recurses once per level, so this bounds stack usage.
/// Validate at load time via [`MatcherNode::validate`].
pub const MAX_DEPTH: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from matcher construction, attachment and validation.
///
/// Evaluation itself never returns an error: a panicking predicate or
/// callback unwinds through [`MatcherNode::evaluate`] untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    /// The configuration cannot produce a node (no predicate, or a
    /// configuration value that is not an object).
    #[error("invalid matcher config: {reason}")]
    InvalidMatcherConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The argument to [`MatcherNode::attach_child`] is not a valid matcher
    /// node. The parent is left unchanged.
    #[error("invalid child matcher: {reason}")]
    InvalidChild {
        /// Why the child was rejected.
        reason: String,
    },

    /// Tree depth exceeds [`MAX_DEPTH`].
    #[error(
        "matcher tree depth is {depth}, but maximum allowed is {max}; \
         flatten the tree or split it into several roots"
    )]
    DepthExceeded {
        /// Actual depth of the tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}
