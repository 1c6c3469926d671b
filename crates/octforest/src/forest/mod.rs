//! Forest - the local leaves of every tree plus the mesh they live on.
//!
//! A forest held by one rank stores only its own contiguous slice of the
//! global leaf order; leaves of other ranks that border the slice are seen
//! through a [`GhostLayer`].
//!
//! ```text
//!   global order:   [ tree 0 .......... | tree 1 .......... ]
//!   rank 0 of 2:    [ local ...... ]
//!   rank 1 of 2:                   [ local ........... ]
//! ```

mod ghost;

use std::sync::Arc;

pub use ghost::{GhostLayer, GhostOwner};

use crate::connectivity::{Connectivity, TreeId};
use crate::dim::Dim;
use crate::error::ForestError;
use crate::quadrant::Quadrant;

/// Local leaves of one tree in Morton order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree<D: Dim> {
  pub quadrants: Vec<Quadrant<D>>,
}

impl<D: Dim> Tree<D> {
  pub fn new(quadrants: Vec<Quadrant<D>>) -> Self {
    Self { quadrants }
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

#[derive(Clone, Debug)]
pub struct Forest<D: Dim> {
  connectivity: Arc<Connectivity<D>>,
  trees: Vec<Tree<D>>,
  rank: usize,
  num_ranks: usize,
}

impl<D: Dim> Forest<D> {
  /// Serial forest from per-tree leaves.
  ///
  /// Every tree's leaves must be valid, strictly increasing in Morton order
  /// and non-overlapping. Two-to-one balance is not checked.
  pub fn new(connectivity: Arc<Connectivity<D>>, trees: Vec<Tree<D>>) -> Result<Self, ForestError> {
    if trees.len() != connectivity.num_trees() {
      return Err(ForestError::TableSize {
        table: "trees",
        expected: connectivity.num_trees(),
        found: trees.len(),
      });
    }
    for (t, tree) in trees.iter().enumerate() {
      validate_tree(t, &tree.quadrants)?;
    }
    Ok(Self {
      connectivity,
      trees,
      rank: 0,
      num_ranks: 1,
    })
  }

  /// Every tree refined uniformly to `level`.
  pub fn uniform(connectivity: Arc<Connectivity<D>>, level: u8) -> Self {
    let level = level.min(D::QMAX_LEVEL);
    let per_axis = 1i32 << level;
    let count = (per_axis as usize).pow(D::DIM as u32);
    let mut quadrants: Vec<Quadrant<D>> = (0..count)
      .map(|i| {
        let mut grid = [0i32; 3];
        let mut rest = i;
        for g in grid.iter_mut().take(D::DIM) {
          *g = (rest % per_axis as usize) as i32;
          rest /= per_axis as usize;
        }
        Quadrant::from_grid(grid, level)
      })
      .collect();
    quadrants.sort_unstable();

    let trees = (0..connectivity.num_trees())
      .map(|_| Tree::new(quadrants.clone()))
      .collect();
    Self {
      connectivity,
      trees,
      rank: 0,
      num_ranks: 1,
    }
  }

  /// Replace every local leaf selected by `pred` with its children.
  ///
  /// A single pass; newly created children are not offered to `pred`.
  /// Keeping the result balanced is up to the caller.
  pub fn refine(&mut self, mut pred: impl FnMut(TreeId, &Quadrant<D>) -> bool) {
    for (t, tree) in self.trees.iter_mut().enumerate() {
      let mut out = Vec::with_capacity(tree.len());
      for q in &tree.quadrants {
        if q.level < D::QMAX_LEVEL && pred(t, q) {
          out.extend(q.children());
        } else {
          out.push(*q);
        }
      }
      tree.quadrants = out;
    }
  }

  /// Split a serial forest into `num_ranks` contiguous slices of the global
  /// leaf order, each with a ghost layer holding every leaf it does not own.
  pub fn partition(&self, num_ranks: usize) -> Result<Vec<(Forest<D>, GhostLayer<D>)>, ForestError> {
    if num_ranks == 0 {
      return Err(ForestError::RankOutOfRange { rank: 0, num_ranks });
    }
    let global: Vec<(TreeId, Quadrant<D>)> = self
      .trees
      .iter()
      .enumerate()
      .flat_map(|(t, tree)| tree.quadrants.iter().map(move |q| (t, *q)))
      .collect();
    let total = global.len();
    let owner_of = |i: usize| (0..num_ranks).find(|&r| i < total * (r + 1) / num_ranks).unwrap_or(num_ranks - 1);

    let mut out = Vec::with_capacity(num_ranks);
    for rank in 0..num_ranks {
      let (lo, hi) = (total * rank / num_ranks, total * (rank + 1) / num_ranks);
      let mut trees = vec![Tree::default(); self.trees.len()];
      for &(t, q) in &global[lo..hi] {
        trees[t].quadrants.push(q);
      }
      let ghosts = global
        .iter()
        .enumerate()
        .filter(|&(i, _)| i < lo || i >= hi)
        .map(|(i, &(tree, q))| (q, GhostOwner { tree, rank: owner_of(i) }))
        .collect();
      let ghost = GhostLayer::new(self.trees.len(), ghosts)?;
      let forest = Forest {
        connectivity: Arc::clone(&self.connectivity),
        trees,
        rank,
        num_ranks,
      };
      out.push((forest, ghost));
    }
    Ok(out)
  }

  #[inline]
  pub fn connectivity(&self) -> &Connectivity<D> {
    &self.connectivity
  }

  #[inline]
  pub fn trees(&self) -> &[Tree<D>] {
    &self.trees
  }

  #[inline]
  pub fn tree(&self, t: TreeId) -> &Tree<D> {
    &self.trees[t]
  }

  #[inline]
  pub fn num_trees(&self) -> usize {
    self.trees.len()
  }

  #[inline]
  pub fn rank(&self) -> usize {
    self.rank
  }

  #[inline]
  pub fn num_ranks(&self) -> usize {
    self.num_ranks
  }

  pub fn local_num_quadrants(&self) -> usize {
    self.trees.iter().map(Tree::len).sum()
  }

  /// First tree holding a local leaf, `None` if this rank owns nothing.
  pub fn first_local_tree(&self) -> Option<TreeId> {
    self.trees.iter().position(|tree| !tree.is_empty())
  }

  /// Local leaves in forest order as `(tree, index in tree, quadrant)`.
  pub fn local_quadrants(&self) -> impl Iterator<Item = (TreeId, usize, &Quadrant<D>)> + '_ {
    self
      .trees
      .iter()
      .enumerate()
      .flat_map(|(t, tree)| tree.quadrants.iter().enumerate().map(move |(i, q)| (t, i, q)))
  }
}

fn validate_tree<D: Dim>(tree: TreeId, quadrants: &[Quadrant<D>]) -> Result<(), ForestError> {
  for (index, q) in quadrants.iter().enumerate() {
    if !q.is_valid() {
      return Err(ForestError::InvalidQuadrant { tree, index });
    }
    if index > 0 {
      let prev = &quadrants[index - 1];
      if prev >= q || prev.is_ancestor(q) {
        return Err(ForestError::QuadrantOrder { tree, index });
      }
    }
  }
  Ok(())
}
