//! `MatchPath`: the accepted path of one evaluation

use crate::MatcherNode;
use std::fmt;

/// The nodes that accepted a value, from the evaluation root down to the
/// deepest match, plus the child index taken at each level.
///
/// Returned by [`MatcherNode::find`]. `chain()` is exactly what the deepest
/// node's callback receives from [`MatcherNode::evaluate`].
///
/// # INV: `indices().len() + 1 == chain().len()`
pub struct MatchPath<'a, T: ?Sized> {
    chain: Vec<&'a MatcherNode<T>>,
    indices: Vec<usize>,
    deepest: &'a MatcherNode<T>,
}

impl<'a, T: ?Sized> MatchPath<'a, T> {
    pub(crate) fn new(
        chain: Vec<&'a MatcherNode<T>>,
        indices: Vec<usize>,
        deepest: &'a MatcherNode<T>,
    ) -> Self {
        debug_assert_eq!(indices.len() + 1, chain.len());
        Self {
            chain,
            indices,
            deepest,
        }
    }

    /// Accepting nodes, root first, deepest last.
    #[must_use]
    pub fn chain(&self) -> &[&'a MatcherNode<T>] {
        &self.chain
    }

    /// The deepest accepting node (the one whose callback fires).
    #[must_use]
    pub fn deepest(&self) -> &'a MatcherNode<T> {
        self.deepest
    }

    /// The evaluation root.
    #[must_use]
    pub fn root(&self) -> &'a MatcherNode<T> {
        self.chain.first().copied().unwrap_or(self.deepest)
    }

    /// Child index taken at each level below the root.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of accepting nodes (the root alone has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Consume the path, keeping only the chain.
    #[must_use]
    pub fn into_chain(self) -> Vec<&'a MatcherNode<T>> {
        self.chain
    }
}

impl<T: ?Sized> fmt::Debug for MatchPath<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchPath")
            .field("depth", &self.chain.len())
            .field("indices", &self.indices)
            .finish()
    }
}
