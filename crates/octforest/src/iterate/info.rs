//! Records handed to [`Visitor`](super::Visitor) callbacks.
//!
//! Every multi-sided entity is described by one record per side. A side is
//! either full (one quadrant as large as the entity, or nothing) or hanging
//! (the finer children touching the coarse entity, some of which may be
//! neither local nor ghost).
//!
//! ```text
//!        full side        hanging side
//!   +-------------+---+---+
//!   |             | 1 | 3 |   face between a coarse quadrant (left)
//!   |      q      +---+---+   and two finer ones (right): slots are
//!   |             | 0 | 2 |   ordered by face corner on the fine face
//!   +-------------+---+---+
//! ```

use smallvec::SmallVec;

use crate::connectivity::TreeId;
use crate::dim::Dim;
use crate::quadrant::Quadrant;

/// Which sequence a quadrant reference points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
  /// The tree's local quadrants; the index is within the tree.
  Local,
  /// The ghost layer; the index is within the whole layer.
  Ghost,
}

/// A quadrant seen during traversal plus where it is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadRef<'a, D: Dim> {
  pub quad: &'a Quadrant<D>,
  pub origin: Origin,
  pub index: usize,
}

impl<D: Dim> QuadRef<'_, D> {
  #[inline]
  pub fn is_local(&self) -> bool {
    self.origin == Origin::Local
  }

  #[inline]
  pub fn is_ghost(&self) -> bool {
    self.origin == Origin::Ghost
  }
}

/// Quadrants on one side of a face or edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SideQuads<'a, D: Dim> {
  /// A quadrant as large as the entity; `None` if that space is neither
  /// local nor ghost.
  Full(Option<QuadRef<'a, D>>),
  /// Half-size children touching the entity: 2 on a 2D face or a 3D edge,
  /// 4 on a 3D face.
  Hanging(SmallVec<[Option<QuadRef<'a, D>>; 4]>),
}

impl<D: Dim> Default for SideQuads<'_, D> {
  fn default() -> Self {
    SideQuads::Full(None)
  }
}

impl<'a, D: Dim> SideQuads<'a, D> {
  #[inline]
  pub fn is_hanging(&self) -> bool {
    matches!(self, SideQuads::Hanging(_))
  }

  /// The full quadrant, if this side is full and present.
  #[inline]
  pub fn full(&self) -> Option<&QuadRef<'a, D>> {
    match self {
      SideQuads::Full(q) => q.as_ref(),
      SideQuads::Hanging(_) => None,
    }
  }

  /// The hanging slots, if this side is hanging.
  #[inline]
  pub fn hanging(&self) -> Option<&[Option<QuadRef<'a, D>>]> {
    match self {
      SideQuads::Full(_) => None,
      SideQuads::Hanging(slots) => Some(slots),
    }
  }

  /// All present quadrants on this side.
  pub fn iter(&self) -> impl Iterator<Item = &QuadRef<'a, D>> + '_ {
    let slots: &[Option<QuadRef<'a, D>>] = match self {
      SideQuads::Full(q) => std::slice::from_ref(q),
      SideQuads::Hanging(slots) => slots,
    };
    slots.iter().flatten()
  }

  pub fn has_local(&self) -> bool {
    self.iter().any(QuadRef::is_local)
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeInfo<'a, D: Dim> {
  pub tree: TreeId,
  pub quad: &'a Quadrant<D>,
  /// Index of `quad` within its tree.
  pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceSide<'a, D: Dim> {
  pub tree: TreeId,
  pub face: u8,
  pub quads: SideQuads<'a, D>,
}

/// One face. Domain-boundary faces have a single side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceInfo<'a, D: Dim> {
  /// Orientation code of the tree connection (0 inside a tree).
  pub orientation: u8,
  pub sides: SmallVec<[FaceSide<'a, D>; 2]>,
}

impl<'a, D: Dim> FaceInfo<'a, D> {
  #[inline]
  pub fn is_boundary(&self) -> bool {
    self.sides.len() == 1
  }

  /// The second side, `None` on the domain boundary.
  #[inline]
  pub fn opposite(&self) -> Option<&FaceSide<'a, D>> {
    self.sides.get(1)
  }
}

impl<D: Dim> Default for FaceInfo<'_, D> {
  fn default() -> Self {
    Self {
      orientation: 0,
      sides: SmallVec::new(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeSide<'a, D: Dim> {
  pub tree: TreeId,
  pub edge: u8,
  /// 1 if this tree's edge runs against the edge's reference direction.
  pub orientation: u8,
  pub quads: SideQuads<'a, D>,
}

/// One edge (3D only) with every tree edge meeting there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeInfo<'a, D: Dim> {
  pub sides: SmallVec<[EdgeSide<'a, D>; 4]>,
}

impl<D: Dim> Default for EdgeInfo<'_, D> {
  fn default() -> Self {
    Self { sides: SmallVec::new() }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CornerSide<'a, D: Dim> {
  pub tree: TreeId,
  pub corner: u8,
  pub quad: Option<QuadRef<'a, D>>,
}

/// One corner with every tree corner meeting there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CornerInfo<'a, D: Dim> {
  pub sides: SmallVec<[CornerSide<'a, D>; 8]>,
}

impl<D: Dim> Default for CornerInfo<'_, D> {
  fn default() -> Self {
    Self { sides: SmallVec::new() }
  }
}

#[cfg(test)]
#[path = "info_test.rs"]
mod info_test;
