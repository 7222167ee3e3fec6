//! `MatcherNode`: predicate tree with deepest-match callbacks
//!
//! A node holds a predicate, an optional callback, ordered children and
//! metadata. Any node can act as the evaluation root.

use crate::{
    trace::NodeTrace, EvalTrace, IntoMatcherNode, MatchPath, MatcherConfig, MatcherError,
    Metadata, Predicate, PredicateFn, MAX_DEPTH,
};
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace, warn};

/// Match callback: `(value, matched_node, chain)`.
///
/// `chain` holds every node that accepted the value, from the evaluation
/// root down to `matched_node` (inclusive).
pub type Callback<T> = dyn Fn(&T, &MatcherNode<T>, &[&MatcherNode<T>]) + Send + Sync;

/// Read-only view shared by everything that can be evaluated as a tree.
pub trait MatchTree<T: ?Sized> {
    /// Evaluate a value, firing the deepest match's callback.
    fn evaluate(&self, value: &T) -> bool;

    /// Ordered children, in sibling priority order.
    fn children(&self) -> &[MatcherNode<T>];
}

/// A node of a matcher tree.
///
/// # INV: Rejection stops descent
///
/// If the predicate rejects a value, no descendant is visited and no callback
/// fires.
///
/// # INV: First branch wins
///
/// Children are evaluated in insertion order. The first child that accepts
/// claims the match, even if a later sibling would reach a deeper node.
///
/// # INV: At most one callback per evaluation
///
/// Only the deepest accepting node of the claimed branch fires.
///
/// # Ownership
///
/// [`attach_child`](Self::attach_child) moves the child into its parent, so a
/// node cannot be attached twice or below itself. Evaluation borrows the tree
/// immutably; the tree cannot change while an evaluation is in flight. A
/// finished tree is `Send + Sync` and may be shared (e.g. in an `Arc`) for
/// concurrent evaluation; mutating a shared tree needs external locking.
///
/// # Example
///
/// ```
/// use cascade::MatcherNode;
///
/// let mut root = MatcherNode::new(|x: &i64| x % 2 == 0);
/// root.attach_child(MatcherNode::new(|x: &i64| *x > 10)).unwrap();
///
/// let path = root.find(&12).unwrap();
/// assert_eq!(path.indices(), &[0]);
/// assert!(root.find(&11).is_none());
/// ```
pub struct MatcherNode<T: ?Sized> {
    predicate: Box<dyn Predicate<T>>,
    on_match: Option<Box<Callback<T>>>,
    children: Vec<MatcherNode<T>>,
    metadata: Metadata,
}

impl<T: ?Sized> MatcherNode<T> {
    /// Create a node from a predicate closure.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::from_predicate(PredicateFn::new(predicate))
    }

    /// Create a node from any [`Predicate`] implementation.
    pub fn from_predicate(predicate: impl Predicate<T> + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
            on_match: None,
            children: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Create a node from a runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidMatcherConfig`] if the configuration
    /// has no predicate.
    pub fn from_config(config: MatcherConfig<T>) -> Result<Self, MatcherError> {
        let MatcherConfig {
            predicate,
            on_match,
            metadata,
        } = config;

        let Some(predicate) = predicate else {
            debug!(fields = metadata.len(), "rejected matcher config without predicate");
            return Err(MatcherError::InvalidMatcherConfig {
                reason: "no predicate was provided".to_string(),
            });
        };

        Ok(Self {
            predicate,
            on_match,
            children: Vec::new(),
            metadata,
        })
    }

    /// Set the match callback (builder pattern).
    #[must_use]
    pub fn with_on_match<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T, &MatcherNode<T>, &[&MatcherNode<T>]) + Send + Sync + 'static,
    {
        self.set_on_match(callback);
        self
    }

    /// Set one metadata field (builder pattern).
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merge metadata fields (builder pattern).
    #[must_use]
    pub fn with_metadata(mut self, fields: Metadata) -> Self {
        self.metadata.extend(fields);
        self
    }

    /// Attach a child and return `self` (builder pattern).
    ///
    /// # Errors
    ///
    /// Same as [`attach_child`](Self::attach_child).
    pub fn with_child(mut self, child: impl IntoMatcherNode<T>) -> Result<Self, MatcherError> {
        self.attach_child(child)?;
        Ok(self)
    }

    /// Replace the match callback.
    pub fn set_on_match<F>(&mut self, callback: F)
    where
        F: Fn(&T, &MatcherNode<T>, &[&MatcherNode<T>]) + Send + Sync + 'static,
    {
        self.on_match = Some(Box::new(callback));
    }

    /// Remove the match callback.
    pub fn clear_on_match(&mut self) {
        self.on_match = None;
    }

    /// Append a child. It is tried after all existing children.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidChild`] if `child` cannot produce a
    /// valid node (e.g. a configuration without predicate). The children
    /// list is left unchanged.
    pub fn attach_child(&mut self, child: impl IntoMatcherNode<T>) -> Result<(), MatcherError> {
        let child = child.into_matcher_node().map_err(|e| {
            debug!(error = %e, "rejected child matcher");
            MatcherError::InvalidChild {
                reason: e.to_string(),
            }
        })?;
        self.children.push(child);
        Ok(())
    }

    /// Evaluate a value against this subtree.
    ///
    /// Returns `true` if this node's predicate accepts the value. In that case
    /// the callback of the deepest accepting node on the first accepting
    /// branch fires once, with the chain of accepting nodes.
    ///
    /// Panics raised by predicates or callbacks propagate to the caller.
    pub fn evaluate(&self, value: &T) -> bool {
        let Some(path) = self.find(value) else {
            return false;
        };

        let deepest = path.deepest();
        if let Some(callback) = &deepest.on_match {
            debug!(
                depth = path.depth(),
                path = ?path.indices(),
                "firing match callback"
            );
            callback(value, deepest, path.chain());
        }
        true
    }

    /// Find the accepted path without firing any callback.
    ///
    /// Walks the tree exactly like [`evaluate`](Self::evaluate), so the
    /// returned [`MatchPath::deepest`] is the node `evaluate` would fire.
    pub fn find(&self, value: &T) -> Option<MatchPath<'_, T>> {
        let mut chain = Vec::new();
        let mut indices = Vec::new();
        let deepest = self.descend(value, &mut chain, &mut indices)?;
        Some(MatchPath::new(chain, indices, deepest))
    }

    fn descend<'a>(
        &'a self,
        value: &T,
        chain: &mut Vec<&'a MatcherNode<T>>,
        indices: &mut Vec<usize>,
    ) -> Option<&'a MatcherNode<T>> {
        if !self.predicate.test(value) {
            trace!(depth = chain.len(), "predicate rejected value");
            return None;
        }

        chain.push(self);
        for (index, child) in self.children.iter().enumerate() {
            indices.push(index);
            if let Some(deepest) = child.descend(value, chain, indices) {
                trace!(depth = chain.len(), index, "child claimed match");
                return Some(deepest);
            }
            indices.pop();
        }
        Some(self)
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Visits the same nodes as [`evaluate`](Self::evaluate) but fires no
    /// callback. `trace.matched` always equals what `evaluate` returns.
    #[must_use]
    pub fn evaluate_with_trace(&self, value: &T) -> EvalTrace {
        let mut path = Vec::new();
        let root = self.trace_node(value, &mut path);
        EvalTrace {
            matched: root.matched,
            path,
            root,
        }
    }

    fn trace_node(&self, value: &T, path: &mut Vec<usize>) -> NodeTrace {
        let matched = self.predicate.test(value);
        let mut children = Vec::new();
        let mut claimed_by = None;

        if matched {
            for (index, child) in self.children.iter().enumerate() {
                path.push(index);
                let child_trace = child.trace_node(value, path);
                let claimed = child_trace.matched;
                children.push(child_trace);
                if claimed {
                    claimed_by = Some(index);
                    break;
                }
                path.pop();
            }
        }

        NodeTrace {
            matched,
            predicate: self.predicate.describe(),
            metadata: self.metadata.clone(),
            children,
            claimed_by,
        }
    }

    /// Test only this node's predicate, ignoring children.
    pub fn accepts(&self, value: &T) -> bool {
        self.predicate.test(value)
    }

    /// The node's predicate.
    #[must_use]
    pub fn predicate(&self) -> &dyn Predicate<T> {
        &*self.predicate
    }

    /// Returns `true` if a callback is set.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.on_match.is_some()
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[MatcherNode<T>] {
        &self.children
    }

    /// Child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&MatcherNode<T>> {
        self.children.get(index)
    }

    /// Append-only handle to the child at `index`, e.g. to attach
    /// grandchildren or replace its callback.
    ///
    /// The handle never exposes `&mut MatcherNode`, so the child itself
    /// cannot be replaced, swapped out or removed.
    pub fn child_mut(&mut self, index: usize) -> Option<ChildMut<'_, T>> {
        self.children.get_mut(index).map(|node| ChildMut { node })
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has no children, so it can only fire its
    /// own callback.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(MatcherNode::node_count)
            .sum::<usize>()
    }

    /// Number of levels in this subtree (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(MatcherNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Validate this tree against safety constraints.
    ///
    /// Checks that the depth does not exceed [`MAX_DEPTH`]. Call this when
    /// loading trees built from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::DepthExceeded`] if the tree is too deep.
    pub fn validate(&self) -> Result<(), MatcherError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            warn!(depth, max = MAX_DEPTH, "matcher tree exceeds maximum depth");
            return Err(MatcherError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }

    /// Caller-defined metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Metadata field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ChildMut
// ═══════════════════════════════════════════════════════════════════════════════

/// Append-only mutable access to an attached child, from
/// [`MatcherNode::child_mut`].
///
/// Allows growing the subtree and changing the callback. Reads go through
/// `Deref<Target = MatcherNode<T>>`; there is no `DerefMut`.
///
/// Replacing the child through the handle does not compile:
///
/// ```compile_fail
/// use cascade::MatcherNode;
///
/// let mut root = MatcherNode::new(|_: &i64| true)
///     .with_child(MatcherNode::new(|_: &i64| true))
///     .unwrap();
/// *root.child_mut(0).unwrap() = MatcherNode::new(|_: &i64| false);
/// ```
pub struct ChildMut<'a, T: ?Sized> {
    node: &'a mut MatcherNode<T>,
}

impl<T: ?Sized> ChildMut<'_, T> {
    /// Append a grandchild. See [`MatcherNode::attach_child`].
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidChild`] if `child` cannot produce a
    /// valid node. The children list is left unchanged.
    pub fn attach_child(&mut self, child: impl IntoMatcherNode<T>) -> Result<(), MatcherError> {
        self.node.attach_child(child)
    }

    /// Replace this child's match callback.
    pub fn set_on_match<F>(&mut self, callback: F)
    where
        F: Fn(&T, &MatcherNode<T>, &[&MatcherNode<T>]) + Send + Sync + 'static,
    {
        self.node.set_on_match(callback);
    }

    /// Remove this child's match callback.
    pub fn clear_on_match(&mut self) {
        self.node.clear_on_match();
    }

    /// Append-only handle to the grandchild at `index`.
    pub fn child_mut(&mut self, index: usize) -> Option<ChildMut<'_, T>> {
        self.node.child_mut(index)
    }
}

impl<T: ?Sized> std::ops::Deref for ChildMut<'_, T> {
    type Target = MatcherNode<T>;

    fn deref(&self) -> &MatcherNode<T> {
        self.node
    }
}

impl<T: ?Sized> fmt::Debug for ChildMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChildMut").field(&*self.node).finish()
    }
}

impl<T: ?Sized> MatchTree<T> for MatcherNode<T> {
    fn evaluate(&self, value: &T) -> bool {
        MatcherNode::evaluate(self, value)
    }

    fn children(&self) -> &[MatcherNode<T>] {
        MatcherNode::children(self)
    }
}

impl<T: ?Sized> fmt::Debug for MatcherNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherNode")
            .field("predicate", &self.predicate.describe())
            .field("has_callback", &self.on_match.is_some())
            .field("metadata", &self.metadata)
            .field("children", &self.children)
            .finish()
    }
}
