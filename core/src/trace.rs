//! Evaluation trace types for debugging matcher behavior.
//!
//! [`NodeTrace`] mirrors the [`MatcherNode`](crate::MatcherNode) structure but
//! captures predicate results instead of predicates. Use
//! [`MatcherNode::evaluate_with_trace`](crate::MatcherNode::evaluate_with_trace)
//! to see exactly which predicates ran and which branch claimed the match.
//!
//! # Example
//!
//! ```
//! use cascade::{MatcherNode, Prefix};
//!
//! let root = MatcherNode::<str>::from_predicate(Prefix::new("/api"))
//!     .with_child(MatcherNode::from_predicate(Prefix::new("/api/v1")))
//!     .unwrap();
//!
//! let trace = root.evaluate_with_trace("/api/v2");
//! assert!(trace.matched);
//! assert!(trace.path.is_empty()); // root is the deepest match
//! assert_eq!(trace.visited(), 2);
//! ```

use crate::Metadata;
use std::fmt;

/// Trace of one visited node.
///
/// Children are recorded in visiting order and stop after the claiming
/// child, so the trace never shows a sibling that evaluation skipped.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeTrace {
    /// Did this node's predicate accept the value?
    pub matched: bool,
    /// [`Predicate::describe`](crate::Predicate::describe) of the node's predicate.
    pub predicate: String,
    /// The node's metadata at evaluation time.
    pub metadata: Metadata,
    /// Visited children. Empty when the predicate rejected the value.
    pub children: Vec<NodeTrace>,
    /// Index of the child that claimed the match, if any.
    pub claimed_by: Option<usize>,
}

impl NodeTrace {
    /// Returns `true` if this node accepted the value and no child claimed it.
    #[must_use]
    pub fn is_deepest(&self) -> bool {
        self.matched && self.claimed_by.is_none()
    }

    /// Number of predicates evaluated in this subtree.
    #[must_use]
    pub fn visited(&self) -> usize {
        1 + self.children.iter().map(NodeTrace::visited).sum::<usize>()
    }
}

impl fmt::Debug for NodeTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTrace")
            .field("matched", &self.matched)
            .field("predicate", &self.predicate)
            .field("claimed_by", &self.claimed_by)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Trace of a full evaluation.
///
/// # INV: `matched` == `evaluate()` result
///
/// # INV: `path` == `find()` indices
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvalTrace {
    /// The final result (identical to what `evaluate()` returns).
    pub matched: bool,
    /// Child index taken at each level down to the deepest match.
    /// Empty when the root is the deepest match or nothing matched.
    pub path: Vec<usize>,
    /// Trace of the evaluation root.
    pub root: NodeTrace,
}

impl EvalTrace {
    /// The deepest matching node's trace, following `path`.
    #[must_use]
    pub fn deepest(&self) -> Option<&NodeTrace> {
        if !self.matched {
            return None;
        }
        let mut node = &self.root;
        for &index in &self.path {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// Number of predicates evaluated.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.root.visited()
    }
}

impl fmt::Debug for EvalTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalTrace")
            .field("matched", &self.matched)
            .field("path", &self.path)
            .field("root", &self.root)
            .finish()
    }
}
