//! Edge assembler (3D).
//!
//! An edge is searched as a set of sides, one per tree edge meeting there.
//! Each branch halves the edge: branch `k` follows, on every side, the child
//! area given by `common_corners[k]`. Once some side holds a quadrant as
//! large as the current area, the remaining sides are at most one level
//! finer and the edge is reported, with those sides hanging.
//!
//! ```text
//!   level l      level l+1
//!   +-------+    +---+---+
//!   |       |    | 0 | 1 |   branch k = common_corners[k][side]
//!   +-------+    +---+---+
//! ```

use smallvec::SmallVec;

use crate::connectivity::{Connectivity, TreeId};
use crate::dim::Dim;
use crate::quadrant::Quadrant;

use super::context::{stride, IterContext, Step, GHOST, LOCAL};
use super::corner::{corner_iterate, CornerArgs};
use super::info::{EdgeInfo, EdgeSide, SideQuads};
use super::Visitor;

pub(crate) struct EdgeArgs<'a, D: Dim> {
  pub start_idx2: SmallVec<[usize; 8]>,
  /// Per side, the child ids touching the lower and upper half of the edge.
  pub common_corners: [SmallVec<[usize; 8]>; 2],
  /// The corner in the middle of the edge, when corners are visited.
  pub corner_args: Option<CornerArgs<'a, D>>,
  pub info: EdgeInfo<'a, D>,
}

impl<'a, D: Dim> EdgeArgs<'a, D> {
  fn empty() -> Self {
    Self {
      start_idx2: SmallVec::new(),
      common_corners: [SmallVec::new(), SmallVec::new()],
      corner_args: None,
      info: EdgeInfo::default(),
    }
  }

  fn push(&mut self, tree: TreeId, edge: usize, orientation: u8, start: usize, cc: (usize, usize)) {
    self.info.sides.push(EdgeSide {
      tree,
      edge: edge as u8,
      orientation,
      quads: SideQuads::default(),
    });
    self.start_idx2.push(start);
    self.common_corners[0].push(cc.0);
    self.common_corners[1].push(cc.1);
  }

  pub fn trees(&self) -> SmallVec<[TreeId; 8]> {
    self.info.sides.iter().map(|s| s.tree).collect()
  }

  fn finish(mut self, loop_corner: bool) -> Self {
    if loop_corner {
      self.corner_args = Some(CornerArgs::from_edge(&self.trees(), &self.common_corners));
    }
    self
  }

  pub fn num_sides(&self) -> usize {
    self.info.sides.len()
  }

  /// One of the six edges between the children of a volume: the half of
  /// the axis-`dir` center line on the `side` half of the volume.
  pub fn from_volume(tree: TreeId, dir: usize, side: usize, loop_corner: bool) -> Self {
    let mut args = Self::empty();
    let low = D::face_corners(2 * dir);
    let high = D::face_corners(2 * dir + 1);
    let starts = D::face_corners(2 * dir + side);
    for i in 0..4 {
      args.push(
        tree,
        4 * dir + 3 - i,
        0,
        starts[i] as usize,
        (low[3 - i] as usize, high[3 - i] as usize),
      );
    }
    args.finish(loop_corner)
  }

  /// One of the four edges between the children touching a face, given the
  /// face's per-side trees and child numbering.
  pub fn from_face(trees: &[TreeId], num_to_child: &[usize], dir: usize, side: usize, loop_corner: bool) -> Self {
    let pos = [[0, if dir == 1 { 2 } else { 1 }], [if dir == 1 { 1 } else { 2 }, 3]];
    let mut args = Self::empty();
    for j in 0..2 {
      for (k, &tree) in trees.iter().enumerate() {
        let ntc = &num_to_child[k * D::HALF..(k + 1) * D::HALF];
        let c0 = ntc[pos[1 - j][0]];
        let c1 = ntc[pos[1 - j][1]];
        let edge = D::child_corner_edges(c0, c1).unwrap_or_default();
        args.push(tree, edge, u8::from(c0 > c1), ntc[pos[j][side]], (c0, c1));
      }
    }
    args.finish(loop_corner)
  }

  /// The sides of edge `e` of tree `t`, or `None` if another tree edge
  /// meeting there is the canonical owner.
  pub fn from_tree(conn: &Connectivity<D>, t: TreeId, e: usize, loop_corner: bool) -> Option<Self> {
    let orient = conn
      .edge_links(t, e)
      .iter()
      .find(|l| l.tree == t && l.edge as usize == e)
      .map_or(0, |l| l.flip);
    let corners = D::edge_corners(e);
    let (c0, c1) = (corners[0] as usize, corners[1] as usize);
    let orig = Quadrant::<D>::root().child(c1).child(c0);

    let ordered = |a: usize, b: usize| if orient == 0 { (a, b) } else { (b, a) };
    let mut args = Self::empty();
    args.push(t, e, orient, 0, ordered(c0, c1));

    let push_neighbor = |args: &mut Self, q: &Quadrant<D>, nt: TreeId| {
      let n0 = q.child_id();
      let n1 = q.parent().child_id();
      if let Some(ne) = D::child_corner_edges(n0, n1) {
        args.push(nt, ne, u8::from(n0 > n1), 0, ordered(n0, n1));
      }
    };
    for &f in D::edge_faces(e) {
      if let Some((q, nt)) = conn.face_neighbor_extra(&orig, t, f as usize) {
        push_neighbor(&mut args, &q, nt);
      }
    }
    for (q, nt) in conn.edge_neighbor_extra(&orig, t, e) {
      push_neighbor(&mut args, &q, nt);
    }

    let owner = args
      .info
      .sides
      .iter()
      .all(|s| (s.tree, s.edge as usize) >= (t, e));
    owner.then(|| args.finish(loop_corner))
  }
}

/// Search the edge from the current level, reporting every piece of it that
/// touches a local quadrant and every corner in between.
pub(crate) fn edge_iterate<'a, D: Dim, V: Visitor<D>>(
  ctx: &mut IterContext<'a, D>,
  args: &mut EdgeArgs<'a, D>,
  visitor: &mut V,
) {
  let stride = stride::<D>();
  let start_level = ctx.level;
  let num_sides = args.num_sides();
  let mut level_idx2 = start_level * stride;
  for side in 0..num_sides {
    ctx.load_area(side, level_idx2 + args.start_idx2[side]);
  }
  if !ctx.any_local(num_sides) {
    return;
  }

  let visit_edge = ctx.visits.edge;
  ctx.level_num[start_level] = 0;
  'search: loop {
    let step = edge_branch(ctx, args, visitor, visit_edge, level_idx2);
    match step {
      Step::Descend => {
        ctx.level += 1;
        ctx.level_num[ctx.level] = 0;
        level_idx2 += stride;
      }
      Step::Advance => ctx.level_num[ctx.level] += 1,
    }

    loop {
      if ctx.level_num[start_level] > 0 {
        break 'search;
      }
      let level = ctx.level;
      if ctx.level_num[level] == 2 {
        if let Some(corner_args) = args.corner_args.as_mut() {
          ctx.copy_indices(&corner_args.start_idx2, num_sides, 2 * num_sides);
          corner_iterate(ctx, corner_args, visitor);
        }
        ctx.level -= 1;
        ctx.level_num[ctx.level] += 1;
        level_idx2 -= stride;
        continue;
      }

      let branch = ctx.level_num[level];
      for side in 0..num_sides {
        ctx.load_area(side, level_idx2 + args.common_corners[branch][side]);
      }
      if ctx.any_local(num_sides) {
        continue 'search;
      }
      ctx.level_num[level] += 1;
    }
  }
  debug_assert_eq!(ctx.level, start_level);
}

fn edge_branch<'a, D: Dim, V: Visitor<D>>(
  ctx: &mut IterContext<'a, D>,
  args: &mut EdgeArgs<'a, D>,
  visitor: &mut V,
  visit_edge: bool,
  level_idx2: usize,
) -> Step {
  let num_sides = args.num_sides();
  let mut stop_refine = false;
  let mut has_local = false;
  for side in 0..num_sides {
    ctx.load_tests(side);
    ctx.refine[side] = true;
  }

  for side in 0..num_sides {
    for ty in [LOCAL, GHOST] {
      let st = side * 2 + ty;
      if !ctx.at_level(st) {
        continue;
      }
      if !visit_edge {
        return Step::Advance;
      }
      debug_assert_eq!(ctx.count[st], 1);
      ctx.refine[side] = false;
      stop_refine = true;
      args.info.sides[side].quads = SideQuads::Full(Some(ctx.quad_ref(st)));
      has_local |= ty == LOCAL;
    }
  }

  if stop_refine {
    for side in 0..num_sides {
      if ctx.count[side * 2 + LOCAL] == 0 && ctx.count[side * 2 + GHOST] == 0 {
        args.info.sides[side].quads = SideQuads::Full(None);
        ctx.refine[side] = false;
      }
    }
  }

  if !ctx.refine[..num_sides].contains(&true) {
    visitor.edge(&args.info);
    return Step::Advance;
  }

  for side in 0..num_sides {
    if ctx.refine[side] {
      ctx.split(side, level_idx2);
    }
  }

  if !stop_refine {
    return Step::Descend;
  }

  let stride = stride::<D>();
  for side in 0..num_sides {
    if !ctx.refine[side] {
      continue;
    }
    let mut slots: SmallVec<[_; 4]> = SmallVec::from_elem(None, 2);
    for i in 0..2 {
      let child = args.common_corners[i][side];
      let slot = usize::from(child >= args.common_corners[1 - i][side]);
      ctx.load_area(side, level_idx2 + stride + child);
      for ty in [LOCAL, GHOST] {
        let st = side * 2 + ty;
        if ctx.count[st] > 0 {
          debug_assert_eq!(ctx.count[st], 1);
          debug_assert_eq!(ctx.quads(st)[ctx.first_index[st]].level as usize, ctx.level + 1);
          slots[slot] = Some(ctx.quad_ref(st));
          has_local |= ty == LOCAL;
        }
      }
    }
    args.info.sides[side].quads = SideQuads::Hanging(slots);
  }
  if has_local {
    visitor.edge(&args.info);
  }
  Step::Advance
}
