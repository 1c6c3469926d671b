//! Ghost layer - read-only copies of leaves owned by other ranks.

use std::ops::Range;

use crate::connectivity::TreeId;
use crate::dim::Dim;
use crate::error::ForestError;
use crate::quadrant::Quadrant;

use super::validate_tree;

/// Where a ghost leaf lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostOwner {
  pub tree: TreeId,
  pub rank: usize,
}

/// Off-rank leaves sorted by tree, then Morton order, with a per-tree
/// offset table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GhostLayer<D: Dim> {
  quadrants: Vec<Quadrant<D>>,
  owners: Vec<GhostOwner>,
  tree_offsets: Vec<usize>,
}

impl<D: Dim> GhostLayer<D> {
  /// Sort `entries` into a layer.
  ///
  /// Within a tree the ghosts must be valid, distinct and non-overlapping;
  /// error indices count from the start of that tree's sorted range.
  pub fn new(num_trees: usize, mut entries: Vec<(Quadrant<D>, GhostOwner)>) -> Result<Self, ForestError> {
    if let Some((_, owner)) = entries.iter().find(|(_, owner)| owner.tree >= num_trees) {
      return Err(ForestError::TreeOutOfRange { tree: owner.tree, num_trees });
    }
    entries.sort_by(|a, b| a.1.tree.cmp(&b.1.tree).then_with(|| a.0.cmp(&b.0)));

    let mut tree_offsets = vec![0; num_trees + 1];
    for (_, owner) in &entries {
      tree_offsets[owner.tree + 1] += 1;
    }
    for t in 0..num_trees {
      tree_offsets[t + 1] += tree_offsets[t];
    }

    let (quadrants, owners): (Vec<Quadrant<D>>, Vec<GhostOwner>) = entries.into_iter().unzip();
    for t in 0..num_trees {
      validate_tree(t, &quadrants[tree_offsets[t]..tree_offsets[t + 1]])?;
    }
    Ok(Self {
      quadrants,
      owners,
      tree_offsets,
    })
  }

  /// No ghosts at all.
  pub fn empty(num_trees: usize) -> Self {
    Self {
      quadrants: Vec::new(),
      owners: Vec::new(),
      tree_offsets: vec![0; num_trees + 1],
    }
  }

  #[inline]
  pub fn quadrants(&self) -> &[Quadrant<D>] {
    &self.quadrants
  }

  #[inline]
  pub fn owners(&self) -> &[GhostOwner] {
    &self.owners
  }

  /// `num_trees + 1` offsets; tree `t` owns `tree_offsets[t]..tree_offsets[t + 1]`.
  #[inline]
  pub fn tree_offsets(&self) -> &[usize] {
    &self.tree_offsets
  }

  #[inline]
  pub fn tree_range(&self, t: TreeId) -> Range<usize> {
    self.tree_offsets[t]..self.tree_offsets[t + 1]
  }

  #[inline]
  pub fn num_trees(&self) -> usize {
    self.tree_offsets.len() - 1
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.quadrants.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.quadrants.is_empty()
  }
}

#[cfg(test)]
#[path = "ghost_test.rs"]
mod ghost_test;
