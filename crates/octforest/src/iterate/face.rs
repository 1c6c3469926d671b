//! Face assembler.
//!
//! A face has two sides (one on the domain boundary). Each branch follows
//! the same quarter (half in 2D) of the face on both sides: on side `s`,
//! branch `i` is child `num_to_child[s * HALF + i]`, which pairs children
//! across tree rotations. The search stops as soon as one side holds a
//! quadrant as large as the current area; the other side is then either the
//! same size or hanging.
//!
//! Between branches the face's interior edges (3D) and its center corner
//! are searched with the same areas.

use smallvec::SmallVec;

use crate::connectivity::{Connectivity, TreeId};
use crate::dim::Dim;
use crate::quadrant::Quadrant;

use super::context::{stride, IterContext, Step, GHOST, LOCAL};
use super::corner::{corner_iterate, CornerArgs};
use super::edge::{edge_iterate, EdgeArgs};
use super::info::{FaceInfo, FaceSide, SideQuads};
use super::Visitor;

pub(crate) struct FaceArgs<'a, D: Dim> {
  pub start_idx2: [usize; 2],
  pub num_to_child: [usize; 8],
  pub outside_face: bool,
  /// Edges between the face's children, indexed `dir * 2 + side`.
  pub edge_args: Vec<EdgeArgs<'a, D>>,
  pub corner_args: Option<CornerArgs<'a, D>>,
  pub info: FaceInfo<'a, D>,
}

impl<'a, D: Dim> FaceArgs<'a, D> {
  #[inline]
  pub fn num_sides(&self) -> usize {
    if self.outside_face {
      1
    } else {
      2
    }
  }

  fn side(tree: TreeId, face: usize) -> FaceSide<'a, D> {
    FaceSide {
      tree,
      face: face as u8,
      quads: SideQuads::default(),
    }
  }

  pub fn trees(&self) -> SmallVec<[TreeId; 2]> {
    self.info.sides.iter().map(|s| s.tree).collect()
  }

  fn finish(mut self, loop_edge: bool, loop_corner: bool) -> Self {
    let trees = self.trees();
    if loop_edge {
      for dir in 0..2 {
        for side in 0..2 {
          self
            .edge_args
            .push(EdgeArgs::from_face(&trees, &self.num_to_child, dir, side, loop_corner));
        }
      }
    }
    if loop_corner {
      self.corner_args = Some(CornerArgs::from_face(&trees, &self.num_to_child));
    }
    self
  }

  /// The face between the children of a volume at `pos` across axis `dir`.
  pub fn from_volume(tree: TreeId, dir: usize, pos: usize, loop_edge: bool, loop_corner: bool) -> Self {
    let low = D::face_corners(2 * dir);
    let high = D::face_corners(2 * dir + 1);
    let mut num_to_child = [0; 8];
    for j in 0..D::HALF {
      num_to_child[j] = high[j] as usize;
      num_to_child[D::HALF + j] = low[j] as usize;
    }
    let mut sides = SmallVec::new();
    sides.push(Self::side(tree, 2 * dir + 1));
    sides.push(Self::side(tree, 2 * dir));
    Self {
      start_idx2: [low[pos] as usize, high[pos] as usize],
      num_to_child,
      outside_face: false,
      edge_args: Vec::new(),
      corner_args: None,
      info: FaceInfo { orientation: 0, sides },
    }
    .finish(loop_edge, loop_corner)
  }

  /// Face `f` of tree `t`, or `None` if the tree across it owns the face.
  pub fn from_tree(conn: &Connectivity<D>, t: TreeId, f: usize, loop_edge: bool, loop_corner: bool) -> Option<Self> {
    let root = Quadrant::<D>::root();
    let mut num_to_child = [0; 8];
    for (i, &c) in D::face_corners(f).iter().enumerate() {
      num_to_child[i] = c as usize;
      if let Some((q, _)) = conn.face_neighbor_extra(&root.child(c as usize), t, f) {
        num_to_child[D::HALF + i] = q.child_id();
      }
    }

    let mut sides = SmallVec::new();
    sides.push(Self::side(t, f));
    let mut orientation = 0;
    let neighbor = conn.face_neighbor(t, f);
    if let Some((nt, nf, o)) = neighbor {
      if (nt, nf) < (t, f) {
        return None;
      }
      sides.push(Self::side(nt, nf));
      orientation = o as u8;
    }

    Some(
      Self {
        start_idx2: [0, 0],
        num_to_child,
        outside_face: neighbor.is_none(),
        edge_args: Vec::new(),
        corner_args: None,
        info: FaceInfo { orientation, sides },
      }
      .finish(loop_edge, loop_corner),
    )
  }
}

/// Search the face from the current level, reporting every piece of it that
/// touches a local quadrant along with the edges and corners inside it.
pub(crate) fn face_iterate<'a, D: Dim, V: Visitor<D>>(
  ctx: &mut IterContext<'a, D>,
  args: &mut FaceArgs<'a, D>,
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

  let visit_face = ctx.visits.face;
  ctx.level_num[start_level] = 0;
  'search: loop {
    match face_branch(ctx, args, visitor, visit_face, level_idx2) {
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
      if ctx.level_num[level] == D::HALF {
        for edge_args in args.edge_args.iter_mut() {
          ctx.copy_indices(&edge_args.start_idx2, num_sides, 2 * num_sides);
          edge_iterate(ctx, edge_args, visitor);
        }
        if let Some(corner_args) = args.corner_args.as_mut() {
          ctx.copy_indices(&corner_args.start_idx2, num_sides, D::HALF * num_sides);
          corner_iterate(ctx, corner_args, visitor);
        }
        ctx.level -= 1;
        ctx.level_num[ctx.level] += 1;
        level_idx2 -= stride;
        continue;
      }

      let branch = ctx.level_num[level];
      for side in 0..num_sides {
        ctx.load_area(side, level_idx2 + args.num_to_child[side * D::HALF + branch]);
      }
      if ctx.any_local(num_sides) {
        continue 'search;
      }
      ctx.level_num[level] += 1;
    }
  }
  debug_assert_eq!(ctx.level, start_level);
}

fn face_branch<'a, D: Dim, V: Visitor<D>>(
  ctx: &mut IterContext<'a, D>,
  args: &mut FaceArgs<'a, D>,
  visitor: &mut V,
  visit_face: bool,
  level_idx2: usize,
) -> Step {
  let num_sides = args.num_sides();
  for side in 0..num_sides {
    ctx.load_tests(side);
    ctx.refine[side] = true;
  }

  let mut has_local = false;
  for side in 0..num_sides {
    for ty in [LOCAL, GHOST] {
      let st = side * 2 + ty;
      if !ctx.at_level(st) {
        continue;
      }
      if !visit_face {
        return Step::Advance;
      }
      debug_assert_eq!(ctx.count[st], 1);
      args.info.sides[side].quads = SideQuads::Full(Some(ctx.quad_ref(st)));
      ctx.refine[side] = false;
      has_local = ty == LOCAL;
      if args.outside_face {
        visitor.face(&args.info);
        return Step::Advance;
      }

      let n_side = side ^ 1;
      for n_ty in ty..=GHOST {
        let nst = n_side * 2 + n_ty;
        if (n_ty > ty || n_side > side) && ctx.at_level(nst) {
          debug_assert!(ty == LOCAL || n_ty == LOCAL);
          args.info.sides[n_side].quads = SideQuads::Full(Some(ctx.quad_ref(nst)));
          visitor.face(&args.info);
          return Step::Advance;
        }
      }
      if ctx.count[n_side * 2 + LOCAL] == 0 && ctx.count[n_side * 2 + GHOST] == 0 {
        args.info.sides[n_side].quads = SideQuads::Full(None);
        visitor.face(&args.info);
        return Step::Advance;
      }
    }
  }

  for side in 0..num_sides {
    if ctx.refine[side] {
      ctx.split(side, level_idx2);
    }
  }

  let stride = stride::<D>();
  for side in 0..num_sides {
    if ctx.refine[side] {
      continue;
    }
    let n_side = side ^ 1;
    let n_face = args.info.sides[n_side].face as usize;
    let mut slots: SmallVec<[_; 4]> = SmallVec::from_elem(None, D::HALF);
    for i in 0..D::HALF {
      let child = args.num_to_child[n_side * D::HALF + i];
      let slot = D::corner_face_corners(child, n_face).unwrap_or(i);
      ctx.load_area(n_side, level_idx2 + stride + child);
      for ty in [LOCAL, GHOST] {
        let st = n_side * 2 + ty;
        if ctx.count[st] > 0 {
          debug_assert_eq!(ctx.count[st], 1);
          debug_assert_eq!(ctx.quads(st)[ctx.first_index[st]].level as usize, ctx.level + 1);
          slots[slot] = Some(ctx.quad_ref(st));
          has_local |= ty == LOCAL;
        }
      }
    }
    args.info.sides[n_side].quads = SideQuads::Hanging(slots);
    if has_local {
      visitor.face(&args.info);
    }
    return Step::Advance;
  }
  Step::Descend
}
