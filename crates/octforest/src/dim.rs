//! Dimension markers.
//!
//! The forest code is written once and instantiated for quadtrees ([`D2`])
//! and octrees ([`D3`]). All dimension-dependent constants and topology
//! tables are reached through the [`Dim`] trait.

use std::fmt::Debug;
use std::hash::Hash;

use crate::tables::*;

/// Dimension-specific constants and table lookups.
pub trait Dim: Copy + Clone + Debug + Default + PartialEq + Eq + Hash + Send + Sync + 'static {
  /// Number of spatial axes.
  const DIM: usize;
  /// Children per quadrant (`2^DIM`).
  const CHILDREN: usize;
  /// Children touching one face (`CHILDREN / 2`).
  const HALF: usize;
  /// Faces per quadrant.
  const FACES: usize;
  /// Edges per quadrant (0 in 2D).
  const EDGES: usize;
  /// Finest level representable in the coordinate space.
  const MAX_LEVEL: u8;
  /// Finest level a stored quadrant may have.
  const QMAX_LEVEL: u8;

  fn face_corners(face: usize) -> &'static [u8];
  fn corner_faces(corner: usize) -> &'static [u8];
  /// Face-corner index of `corner` on `face`, if the corner lies on it.
  fn corner_face_corners(corner: usize, face: usize) -> Option<usize>;
  fn face_edges(face: usize) -> &'static [u8];
  fn edge_faces(edge: usize) -> &'static [u8];
  fn edge_corners(edge: usize) -> &'static [u8];
  fn corner_edges(corner: usize) -> &'static [u8];
  /// Edge joining two corners, if they share one.
  fn child_corner_edges(c0: usize, c1: usize) -> Option<usize>;

  /// Side length of the root quadrant.
  #[inline]
  fn root_len() -> i32 {
    1 << Self::MAX_LEVEL
  }

  /// Side length of a quadrant at `level`.
  #[inline]
  fn quadrant_len(level: u8) -> i32 {
    1 << (Self::MAX_LEVEL - level)
  }
}

/// Quadtree marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct D2;

/// Octree marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct D3;

#[inline]
fn signed(v: i8) -> Option<usize> {
  (v >= 0).then_some(v as usize)
}

impl Dim for D2 {
  const DIM: usize = 2;
  const CHILDREN: usize = 4;
  const HALF: usize = 2;
  const FACES: usize = 4;
  const EDGES: usize = 0;
  const MAX_LEVEL: u8 = 30;
  const QMAX_LEVEL: u8 = 29;

  #[inline]
  fn face_corners(face: usize) -> &'static [u8] {
    &FACE_CORNERS_2D[face]
  }

  #[inline]
  fn corner_faces(corner: usize) -> &'static [u8] {
    &CORNER_FACES_2D[corner]
  }

  #[inline]
  fn corner_face_corners(corner: usize, face: usize) -> Option<usize> {
    signed(CORNER_FACE_CORNERS_2D[corner][face])
  }

  #[inline]
  fn face_edges(_face: usize) -> &'static [u8] {
    &[]
  }

  #[inline]
  fn edge_faces(_edge: usize) -> &'static [u8] {
    &[]
  }

  #[inline]
  fn edge_corners(_edge: usize) -> &'static [u8] {
    &[]
  }

  #[inline]
  fn corner_edges(_corner: usize) -> &'static [u8] {
    &[]
  }

  #[inline]
  fn child_corner_edges(_c0: usize, _c1: usize) -> Option<usize> {
    None
  }
}

impl Dim for D3 {
  const DIM: usize = 3;
  const CHILDREN: usize = 8;
  const HALF: usize = 4;
  const FACES: usize = 6;
  const EDGES: usize = 12;
  const MAX_LEVEL: u8 = 19;
  const QMAX_LEVEL: u8 = 18;

  #[inline]
  fn face_corners(face: usize) -> &'static [u8] {
    &FACE_CORNERS_3D[face]
  }

  #[inline]
  fn corner_faces(corner: usize) -> &'static [u8] {
    &CORNER_FACES_3D[corner]
  }

  #[inline]
  fn corner_face_corners(corner: usize, face: usize) -> Option<usize> {
    signed(CORNER_FACE_CORNERS_3D[corner][face])
  }

  #[inline]
  fn face_edges(face: usize) -> &'static [u8] {
    &FACE_EDGES_3D[face]
  }

  #[inline]
  fn edge_faces(edge: usize) -> &'static [u8] {
    &EDGE_FACES_3D[edge]
  }

  #[inline]
  fn edge_corners(edge: usize) -> &'static [u8] {
    &EDGE_CORNERS_3D[edge]
  }

  #[inline]
  fn corner_edges(corner: usize) -> &'static [u8] {
    &CORNER_EDGES_3D[corner]
  }

  #[inline]
  fn child_corner_edges(c0: usize, c1: usize) -> Option<usize> {
    signed(CHILD_CORNER_EDGES_3D[c0][c1])
  }
}

/// Axes tangential to a face normal, ascending.
#[inline]
pub(crate) fn tangential_axes<D: Dim>(normal: usize) -> ([usize; 2], usize) {
  let mut axes = [0; 2];
  let mut n = 0;
  for axis in 0..D::DIM {
    if axis != normal {
      axes[n] = axis;
      n += 1;
    }
  }
  (axes, n)
}
