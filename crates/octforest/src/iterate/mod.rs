//! Forest traversal.
//!
//! [`iterate`] visits every volume, face, edge (3D) and corner of the local
//! part of a forest exactly once and hands each a record of all quadrants
//! touching it, local or ghost, including hanging neighbors one level finer.
//!
//! The traversal is a depth-first search over the quadrant sequences. The
//! search area of an entity is described by index bounds into each side's
//! local and ghost sequence; descending splits the areas by child id.
//!
//! ```text
//!   iterate
//!     for each tree t
//!       volume_iterate(t)          leaves, and entities between children
//!         -> face_iterate -> edge_iterate -> corner_iterate
//!       face_iterate(t, f)         tree faces owned by t
//!       edge_iterate(t, e)         tree edges owned by t (3D)
//!       corner_iterate(t, c)       tree corners owned by t
//! ```
//!
//! Entities shared by several trees are visited from the lexicographically
//! smallest `(tree, entity)` pair. An entity is reported only if at least
//! one local quadrant touches it.

mod batch;
mod context;
mod corner;
mod edge;
mod face;
mod info;
mod tier;
mod volume;

#[cfg(test)]
pub mod test_utils;

pub use batch::{iterate_ranks, RankRun};
pub use info::{
  CornerInfo, CornerSide, EdgeInfo, EdgeSide, FaceInfo, FaceSide, Origin, QuadRef, SideQuads, VolumeInfo,
};

use crate::dim::Dim;
use crate::forest::{Forest, GhostLayer};

use context::IterContext;
use corner::{corner_iterate, CornerArgs};
use edge::{edge_iterate, EdgeArgs};
use face::{face_iterate, FaceArgs};
use volume::{volume_iterate, VolumeArgs};

/// Which callbacks of a [`Visitor`] are active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Visits {
  pub volume: bool,
  pub face: bool,
  /// Ignored in 2D.
  pub edge: bool,
  pub corner: bool,
}

impl Visits {
  pub const NONE: Self = Self {
    volume: false,
    face: false,
    edge: false,
    corner: false,
  };

  pub const ALL: Self = Self {
    volume: true,
    face: true,
    edge: true,
    corner: true,
  };

  pub fn with_volume(mut self) -> Self {
    self.volume = true;
    self
  }

  pub fn with_face(mut self) -> Self {
    self.face = true;
    self
  }

  pub fn with_edge(mut self) -> Self {
    self.edge = true;
    self
  }

  pub fn with_corner(mut self) -> Self {
    self.corner = true;
    self
  }

  /// Whether anything besides volumes is requested.
  fn needs_search(&self) -> bool {
    self.face || self.edge || self.corner
  }
}

/// Callbacks invoked by [`iterate`].
///
/// Only the callbacks selected by [`Visitor::visits`] are called. Records
/// borrow from the forest and ghost layer and are only valid for the call.
pub trait Visitor<D: Dim> {
  fn visits(&self) -> Visits;

  fn volume(&mut self, _info: &VolumeInfo<'_, D>) {}

  fn face(&mut self, _info: &FaceInfo<'_, D>) {}

  fn edge(&mut self, _info: &EdgeInfo<'_, D>) {}

  fn corner(&mut self, _info: &CornerInfo<'_, D>) {}
}

/// Visit every entity of the local forest touching a local quadrant.
///
/// `ghost` holds the remote quadrants adjacent to the local partition;
/// `None` behaves like an empty layer. Remote neighbors missing from the
/// layer appear as `None` in the records.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "iterate::iterate"))]
pub fn iterate<D: Dim, V: Visitor<D>>(forest: &Forest<D>, ghost: Option<&GhostLayer<D>>, visitor: &mut V) {
  let empty;
  let ghost = match ghost {
    Some(ghost) => ghost,
    None => {
      empty = GhostLayer::empty(forest.num_trees());
      &empty
    }
  };
  debug_assert_eq!(ghost.num_trees(), forest.num_trees());

  if forest.first_local_tree().is_none() {
    return;
  }

  let mut visits = visitor.visits();
  if D::EDGES == 0 {
    visits.edge = false;
  }

  if !visits.needs_search() {
    if visits.volume {
      iterate_volumes(forest, visitor);
    }
    return;
  }

  let mut ctx = IterContext::new(forest, ghost, visits);
  let conn = forest.connectivity();
  let (loop_edge, loop_corner) = (ctx.loop_edge, ctx.loop_corner);
  let mut volume_args = VolumeArgs::new(0, loop_edge, loop_corner);

  for t in 0..forest.num_trees() {
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("iterate::volume", tree = t).entered();

      volume_args.retarget(t);
      ctx.init_loop_volume(t);
      volume_iterate(&mut ctx, &mut volume_args, visitor);
    }

    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("iterate::tree_boundary", tree = t).entered();

    for f in 0..D::FACES {
      if let Some(mut face_args) = FaceArgs::from_tree(conn, t, f, loop_edge, loop_corner) {
        let trees = face_args.trees();
        match trees.as_slice() {
          [t0, t1] => ctx.init_loop_face(*t0, *t1),
          _ => ctx.init_loop_outside_face(t),
        }
        face_iterate(&mut ctx, &mut face_args, visitor);
      }
    }

    if loop_edge {
      for e in 0..D::EDGES {
        if let Some(mut edge_args) = EdgeArgs::from_tree(conn, t, e, loop_corner) {
          ctx.init_loop_entity(&edge_args.trees());
          edge_iterate(&mut ctx, &mut edge_args, visitor);
        }
      }
    }

    if loop_corner {
      for c in 0..D::CHILDREN {
        if let Some(mut corner_args) = CornerArgs::from_tree(conn, t, c) {
          ctx.init_loop_entity(&corner_args.trees());
          corner_iterate(&mut ctx, &mut corner_args, visitor);
        }
      }
    }
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(
    alloc_size = ctx.alloc_size,
    tier_hits = ctx.tiers.hits(),
    tier_misses = ctx.tiers.misses(),
    "iterate done"
  );
}

/// Volume-only traversal: every local quadrant in storage order.
fn iterate_volumes<D: Dim, V: Visitor<D>>(forest: &Forest<D>, visitor: &mut V) {
  for (tree, index, quad) in forest.local_quadrants() {
    visitor.volume(&VolumeInfo { tree, quad, index });
  }
}
