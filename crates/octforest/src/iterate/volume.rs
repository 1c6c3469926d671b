//! Volume driver.
//!
//! Walks one tree's quadrants depth first. Each leaf reached is reported as
//! a volume; after the children of an area are exhausted, the faces, edges
//! and the corner between those children are searched.
//!
//! ```text
//!   +---+---+      faces between children: dir * HALF + pos
//!   | 2 | 3 |      edges between children (3D): dir * 2 + side
//!   +---+---+      corner in the middle
//!   | 0 | 1 |
//!   +---+---+
//! ```

use crate::connectivity::TreeId;
use crate::dim::Dim;

use super::context::{stride, IterContext, Step, GHOST, LOCAL};
use super::corner::{corner_iterate, CornerArgs};
use super::edge::{edge_iterate, EdgeArgs};
use super::face::{face_iterate, FaceArgs};
use super::info::VolumeInfo;
use super::Visitor;

pub(crate) struct VolumeArgs<'a, D: Dim> {
  pub tree: TreeId,
  pub face_args: Vec<FaceArgs<'a, D>>,
  pub edge_args: Vec<EdgeArgs<'a, D>>,
  pub corner_args: Option<CornerArgs<'a, D>>,
}

impl<'a, D: Dim> VolumeArgs<'a, D> {
  pub fn new(tree: TreeId, loop_edge: bool, loop_corner: bool) -> Self {
    let mut face_args = Vec::with_capacity(D::DIM * D::HALF);
    let mut edge_args = Vec::new();
    for dir in 0..D::DIM {
      for pos in 0..D::HALF {
        face_args.push(FaceArgs::from_volume(tree, dir, pos, loop_edge, loop_corner));
      }
    }
    if loop_edge {
      for dir in 0..D::DIM {
        for side in 0..2 {
          edge_args.push(EdgeArgs::from_volume(tree, dir, side, loop_corner));
        }
      }
    }
    Self {
      tree,
      face_args,
      edge_args,
      corner_args: loop_corner.then(|| CornerArgs::from_volume(tree)),
    }
  }

  /// Point every nested record at tree `t`. Everything else about the
  /// interior entities is the same in every tree.
  pub fn retarget(&mut self, t: TreeId) {
    self.tree = t;
    let retarget_edge = |edge: &mut EdgeArgs<'a, D>| {
      for side in edge.info.sides.iter_mut() {
        side.tree = t;
      }
      if let Some(corner) = edge.corner_args.as_mut() {
        for side in corner.info.sides.iter_mut() {
          side.tree = t;
        }
      }
    };
    for face in self.face_args.iter_mut() {
      for side in face.info.sides.iter_mut() {
        side.tree = t;
      }
      face.edge_args.iter_mut().for_each(retarget_edge);
      if let Some(corner) = face.corner_args.as_mut() {
        for side in corner.info.sides.iter_mut() {
          side.tree = t;
        }
      }
    }
    self.edge_args.iter_mut().for_each(retarget_edge);
    if let Some(corner) = self.corner_args.as_mut() {
      for side in corner.info.sides.iter_mut() {
        side.tree = t;
      }
    }
  }
}

/// Visit every leaf of the tree searched by side 0, plus the faces, edges
/// and corners interior to that tree.
pub(crate) fn volume_iterate<'a, D: Dim, V: Visitor<D>>(
  ctx: &mut IterContext<'a, D>,
  args: &mut VolumeArgs<'a, D>,
  visitor: &mut V,
) {
  let stride = stride::<D>();
  let start_level = ctx.level;
  let mut level_idx2 = start_level * stride;
  ctx.load_area(0, level_idx2);
  if !ctx.any_local(1) {
    return;
  }

  ctx.level_num[start_level] = 0;
  'search: loop {
    match volume_branch(ctx, args.tree, visitor, level_idx2) {
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
      if ctx.level_num[level] == D::CHILDREN {
        for face_args in args.face_args.iter_mut() {
          ctx.copy_indices(&face_args.start_idx2, 1, 2);
          face_iterate(ctx, face_args, visitor);
        }
        for edge_args in args.edge_args.iter_mut() {
          ctx.copy_indices(&edge_args.start_idx2, 1, 4);
          edge_iterate(ctx, edge_args, visitor);
        }
        if let Some(corner_args) = args.corner_args.as_mut() {
          ctx.copy_indices(&corner_args.start_idx2, 1, D::CHILDREN);
          corner_iterate(ctx, corner_args, visitor);
        }
        ctx.level -= 1;
        ctx.level_num[ctx.level] += 1;
        level_idx2 -= stride;
        continue;
      }

      ctx.load_area(0, level_idx2 + ctx.level_num[level]);
      if ctx.any_local(1) {
        continue 'search;
      }
      ctx.level_num[level] += 1;
    }
  }
  debug_assert_eq!(ctx.level, start_level);
}

fn volume_branch<D: Dim, V: Visitor<D>>(
  ctx: &mut IterContext<'_, D>,
  tree: TreeId,
  visitor: &mut V,
  level_idx2: usize,
) -> Step {
  ctx.load_tests(0);
  if ctx.at_level(LOCAL) {
    if ctx.visits.volume {
      let quad = ctx.quad_ref(LOCAL);
      visitor.volume(&VolumeInfo {
        tree,
        quad: quad.quad,
        index: quad.index,
      });
    }
    return Step::Advance;
  }
  if ctx.at_level(GHOST) {
    return Step::Advance;
  }
  ctx.split(0, level_idx2);
  Step::Descend
}
