//! Per-call scratch state shared by every assembler.
//!
//! Search areas are stored as rows of bounds, one row per side and
//! partition type (`sidetype = 2 * side + type`). Within a row, the bounds
//! of level `l` occupy `STRIDE = CHILDREN + 1` slots starting at
//! `l * STRIDE`; the area of child `k` at level `l` is
//! `row[l * STRIDE + k] .. row[l * STRIDE + k + 1]`.
//!
//! ```text
//!   row:  | level 0 | level 1 (split of level 0) | level 2 | ...
//!         [ b0 b1 . . ][ b0 b1 b2 b3 b4 . . . . ][ ... ]
//! ```

use crate::connectivity::TreeId;
use crate::dim::Dim;
use crate::forest::{Forest, GhostLayer};
use crate::quadrant::Quadrant;

use super::info::{Origin, QuadRef};
use super::tier::{SeqId, TierCache};
use super::Visits;

pub(crate) const LOCAL: usize = 0;
pub(crate) const GHOST: usize = 1;

/// What an assembler does after examining one search branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
  /// Move on to the next branch at the current level.
  Advance,
  /// Split the branch and search its children.
  Descend,
}

#[inline]
pub(crate) fn stride<D: Dim>() -> usize {
  D::CHILDREN + 1
}

pub(crate) struct IterContext<'a, D: Dim> {
  forest: &'a Forest<D>,
  ghosts: &'a [Quadrant<D>],
  ghost_offsets: &'a [usize],
  pub visits: Visits,
  pub loop_edge: bool,
  pub loop_corner: bool,
  pub alloc_size: usize,
  /// Level of the branch currently being searched.
  pub level: usize,
  /// Branch counter per level.
  pub level_num: Vec<usize>,
  side_trees: Vec<TreeId>,
  index: Vec<usize>,
  row_len: usize,
  pub first_index: Vec<usize>,
  pub count: Vec<usize>,
  pub test_level: Vec<Option<u8>>,
  pub refine: Vec<bool>,
  pub tiers: TierCache,
}

impl<'a, D: Dim> IterContext<'a, D> {
  /// Size every buffer for the largest edge and corner fan-in of the mesh.
  pub fn new(forest: &'a Forest<D>, ghost: &'a GhostLayer<D>, visits: Visits) -> Self {
    let conn = forest.connectivity();
    let loop_edge = D::EDGES > 0 && (visits.edge || visits.corner);
    let loop_corner = visits.corner;

    let mut alloc_size = 4;
    let mut max_corner = D::CHILDREN;
    if loop_edge {
      let max_edge = conn.max_edge_size();
      alloc_size = alloc_size.max(2 * max_edge);
      max_corner = max_corner.max(2 * max_edge);
    }
    if loop_corner {
      max_corner = max_corner.max(conn.max_corner_size());
      alloc_size = alloc_size.max(2 * max_corner);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(alloc_size, max_corner, loop_edge, loop_corner, "iterate context");

    let levels = D::QMAX_LEVEL as usize + 1;
    let row_len = levels * stride::<D>();
    Self {
      forest,
      ghosts: ghost.quadrants(),
      ghost_offsets: ghost.tree_offsets(),
      visits,
      loop_edge,
      loop_corner,
      alloc_size,
      level: 0,
      level_num: vec![0; levels],
      side_trees: vec![0; alloc_size / 2],
      index: vec![0; alloc_size * row_len],
      row_len,
      first_index: vec![0; alloc_size],
      count: vec![0; alloc_size],
      test_level: vec![None; alloc_size],
      refine: vec![false; alloc_size / 2],
      tiers: TierCache::new::<D>(forest.num_ranks()),
    }
  }

  #[inline]
  fn seq(&self, sidetype: usize) -> SeqId {
    if sidetype % 2 == GHOST {
      SeqId::Ghost
    } else {
      SeqId::Local(self.side_trees[sidetype / 2])
    }
  }

  /// Quadrant sequence searched by `sidetype`.
  #[inline]
  pub fn quads(&self, sidetype: usize) -> &'a [Quadrant<D>] {
    match self.seq(sidetype) {
      SeqId::Local(t) => &self.forest.tree(t).quadrants,
      SeqId::Ghost => self.ghosts,
    }
  }

  #[inline]
  fn bound(&self, sidetype: usize, pos: usize) -> usize {
    self.index[sidetype * self.row_len + pos]
  }

  /// Point `side` at the area whose bounds start at `pos` in its rows.
  #[inline]
  pub fn load_area(&mut self, side: usize, pos: usize) {
    for ty in [LOCAL, GHOST] {
      let st = side * 2 + ty;
      let first = self.bound(st, pos);
      self.first_index[st] = first;
      self.count[st] = self.bound(st, pos + 1) - first;
    }
  }

  /// Whether any of the first `num_sides` sides has local quadrants in its
  /// current area.
  #[inline]
  pub fn any_local(&self, num_sides: usize) -> bool {
    (0..num_sides).any(|side| self.count[side * 2 + LOCAL] > 0)
  }

  /// Record the level of the first quadrant of each partition of `side`.
  #[inline]
  pub fn load_tests(&mut self, side: usize) {
    for ty in [LOCAL, GHOST] {
      let st = side * 2 + ty;
      self.test_level[st] = if self.count[st] > 0 {
        Some(self.quads(st)[self.first_index[st]].level)
      } else {
        None
      };
    }
  }

  #[inline]
  pub fn at_level(&self, sidetype: usize) -> bool {
    self.test_level[sidetype] == Some(self.level as u8)
  }

  /// The first quadrant of `sidetype`'s current area.
  #[inline]
  pub fn quad_ref(&self, sidetype: usize) -> QuadRef<'a, D> {
    let index = self.first_index[sidetype];
    QuadRef {
      quad: &self.quads(sidetype)[index],
      origin: if sidetype % 2 == LOCAL { Origin::Local } else { Origin::Ghost },
      index,
    }
  }

  /// Split both partitions of `side`'s current area by child and store the
  /// result as the next level's bounds.
  pub fn split(&mut self, side: usize, level_idx2: usize) {
    let stride = stride::<D>();
    let pos = level_idx2 + stride;
    for ty in [LOCAL, GHOST] {
      let st = side * 2 + ty;
      let first = self.first_index[st];
      let view = &self.quads(st)[first..first + self.count[st]];
      let seq = self.seq(st);
      let bounds = self.tiers.split(seq, first, view, self.level);
      let row = st * self.row_len + pos;
      self.index[row..row + stride].copy_from_slice(&bounds[..stride]);
    }
  }

  /// Duplicate the bounds of the first `old_num` sides onto `new_num`
  /// sides, each at its own starting child.
  pub fn copy_indices(&mut self, start_idx2: &[usize], old_num: usize, new_num: usize) {
    debug_assert_eq!(new_num % old_num, 0);
    debug_assert!(new_num <= self.alloc_size / 2);
    let base = self.level * stride::<D>();
    for side in 0..new_num {
      let pos = base + start_idx2[side];
      for ty in [LOCAL, GHOST] {
        let src = ((side % old_num) * 2 + ty) * self.row_len + pos;
        let dst = (side * 2 + ty) * self.row_len + pos;
        self.index[dst] = self.index[src];
        self.index[dst + 1] = self.index[src + 1];
      }
    }
  }

  /// Reset the search to level 0 with the given tree per side.
  ///
  /// Side `s` searches `trees(s)` locally and the ghost layer range of the
  /// same tree.
  fn init_loop(&mut self, num_sides: usize, trees: impl Fn(usize) -> TreeId) {
    self.level = 0;
    self.level_num[0] = 0;
    for side in 0..self.alloc_size / 2 {
      self.side_trees[side] = trees(side);
    }
    for side in 0..num_sides {
      let t = self.side_trees[side];
      let local = (side * 2 + LOCAL) * self.row_len;
      self.index[local] = 0;
      self.index[local + 1] = self.forest.tree(t).len();
      let ghost = (side * 2 + GHOST) * self.row_len;
      self.index[ghost] = self.ghost_offsets[t];
      self.index[ghost + 1] = self.ghost_offsets[t + 1];
    }
  }

  pub fn init_loop_volume(&mut self, t: TreeId) {
    self.init_loop(2, |_| t);
  }

  pub fn init_loop_face(&mut self, t: TreeId, nt: TreeId) {
    self.init_loop(2, |side| if side % 2 == 0 { t } else { nt });
  }

  pub fn init_loop_outside_face(&mut self, t: TreeId) {
    self.init_loop(1, |_| t);
  }

  /// Sides `0..n` search the given trees; with corners enabled, sides
  /// `n..2n` repeat them for the corners between edge branches.
  pub fn init_loop_entity(&mut self, trees: &[TreeId]) {
    let n = trees.len();
    self.init_loop(n, |side| trees[side % n]);
  }
}
