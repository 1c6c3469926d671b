//! Corner assembler.
//!
//! By the time a corner is searched, every side's area is a quadrant-sized
//! region whose `corner` touches the shared point, so the search reduces to
//! finding, per side, the single quadrant in the area containing that
//! corner. No further refinement is needed.

use smallvec::SmallVec;

use crate::connectivity::{Connectivity, TreeId};
use crate::dim::Dim;
use crate::quadrant::Quadrant;

use super::context::{stride, IterContext, GHOST, LOCAL};
use super::info::{CornerInfo, CornerSide};
use super::Visitor;

pub(crate) struct CornerArgs<'a, D: Dim> {
  /// Child index of each side's area within the level's bounds.
  pub start_idx2: SmallVec<[usize; 8]>,
  pub info: CornerInfo<'a, D>,
}

impl<'a, D: Dim> CornerArgs<'a, D> {
  pub fn empty() -> Self {
    Self {
      start_idx2: SmallVec::new(),
      info: CornerInfo::default(),
    }
  }

  fn push(&mut self, tree: TreeId, corner: usize, start: usize) {
    self.info.sides.push(CornerSide {
      tree,
      corner: corner as u8,
      quad: None,
    });
    self.start_idx2.push(start);
  }

  /// The corner shared by all children of a volume.
  pub fn from_volume(tree: TreeId) -> Self {
    let mut args = Self::empty();
    for i in 0..D::CHILDREN {
      args.push(tree, D::CHILDREN - 1 - i, i);
    }
    args
  }

  /// The corner at the middle of a face: `HALF` children on each of the
  /// `trees.len()` sides.
  pub fn from_face(trees: &[TreeId], num_to_child: &[usize]) -> Self {
    let mut args = Self::empty();
    for j in 0..D::HALF {
      for (k, &tree) in trees.iter().enumerate() {
        let corner = num_to_child[k * D::HALF + D::HALF - 1 - j];
        args.push(tree, corner, num_to_child[k * D::HALF + j]);
      }
    }
    args
  }

  /// The corner at the middle of an edge. Each edge side contributes two
  /// sides, one per half of the edge.
  pub fn from_edge(trees: &[TreeId], common_corners: &[SmallVec<[usize; 8]>; 2]) -> Self {
    let n = trees.len();
    let mut args = Self::empty();
    for j in 0..2 * n {
      let k = j % n;
      if j == k {
        args.push(trees[k], common_corners[1][k], common_corners[0][k]);
      } else {
        args.push(trees[k], common_corners[0][k], common_corners[1][k]);
      }
    }
    args
  }

  /// Corner `c` of tree `t` with every tree corner meeting there, or
  /// `None` if another of them owns the corner.
  pub fn from_tree(conn: &Connectivity<D>, t: TreeId, c: usize) -> Option<Self> {
    let orig = Quadrant::<D>::root().child(c);
    debug_assert!(orig.touches_corner(c));
    let mut args = Self::empty();
    args.push(t, c, 0);
    for &f in D::corner_faces(c) {
      if let Some((q, nt)) = conn.face_neighbor_extra(&orig, t, f as usize) {
        args.push(nt, q.child_id(), 0);
      }
    }
    for &e in D::corner_edges(c) {
      for (q, nt) in conn.edge_neighbor_extra(&orig, t, e as usize) {
        args.push(nt, q.child_id(), 0);
      }
    }
    for (q, nt) in conn.corner_neighbor_extra(&orig, t, c) {
      args.push(nt, q.child_id(), 0);
    }

    let owner = args
      .info
      .sides
      .iter()
      .all(|s| (s.tree, s.corner as usize) >= (t, c));
    owner.then_some(args)
  }

  pub fn num_sides(&self) -> usize {
    self.info.sides.len()
  }

  pub fn trees(&self) -> SmallVec<[TreeId; 8]> {
    self.info.sides.iter().map(|s| s.tree).collect()
  }
}

/// Find the quadrant touching the corner on every side and report the corner
/// if any of them is local.
pub(crate) fn corner_iterate<'a, D: Dim, V: Visitor<D>>(
  ctx: &mut IterContext<'a, D>,
  args: &mut CornerArgs<'a, D>,
  visitor: &mut V,
) {
  let level = ctx.level;
  let level_idx2 = level * stride::<D>();
  let num_sides = args.num_sides();
  for side in 0..num_sides {
    ctx.load_area(side, level_idx2 + args.start_idx2[side]);
  }
  if !ctx.any_local(num_sides) {
    return;
  }

  let mut has_local = false;
  for side in 0..num_sides {
    let corner = args.info.sides[side].corner as usize;
    let mut found = None;
    for ty in [LOCAL, GHOST] {
      let st = side * 2 + ty;
      let count = ctx.count[st];
      if count == 0 {
        continue;
      }
      let first = ctx.first_index[st];
      let quads = &ctx.quads(st)[first..first + count];
      let guess = if count > 1 && corner == D::CHILDREN - 1 { count - 1 } else { 0 };
      let probe = quads[guess].ancestor(level as u8).corner_descendant(corner, D::QMAX_LEVEL);
      let hit = if count == 1 || corner == 0 || corner == D::CHILDREN - 1 {
        quads[guess].contains(&probe).then_some(guess)
      } else {
        quads.binary_search_by(|q| q.compare_contains(&probe)).ok()
      };
      if let Some(i) = hit {
        ctx.first_index[st] = first + i;
        found = Some(ctx.quad_ref(st));
        has_local |= ty == LOCAL;
        break;
      }
    }
    args.info.sides[side].quad = found;
  }

  if has_local {
    visitor.corner(&args.info);
  }
}
