//! Quadrant - immutable value type for one cell of a tree.
//!
//! A quadrant is an anchor (its lowest corner) in units of the finest level
//! plus a refinement level. In 2D the z coordinate is always 0.
//!
//! ```text
//!   level 0:  +---------------+     level 1:  +-------+-------+
//!             |               |               |   2   |   3   |
//!             |     root      |               +-------+-------+
//!             |               |               |   0   |   1   |
//!             +---------------+               +-------+-------+
//! ```
//!
//! Quadrants of one tree are stored in Morton (Z-curve) order; [`Ord`] on
//! [`Quadrant`] is that order.

use std::cmp::Ordering;
use std::marker::PhantomData;

use glam::DVec3;

use crate::dim::{tangential_axes, Dim};

/// Upper bound on `CHILDREN + 1` over all dimensions.
pub const MAX_CHILD_BOUNDS: usize = 9;

/// Offsets produced by splitting a sorted range by child id.
pub type ChildBounds = [usize; MAX_CHILD_BOUNDS];

/// One cell of a tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Quadrant<D: Dim> {
  /// Anchor coordinates in units of `D::MAX_LEVEL`.
  pub coords: [i32; 3],
  /// Refinement level (0 = root).
  pub level: u8,
  _dim: PhantomData<D>,
}

impl<D: Dim> Quadrant<D> {
  /// Create a quadrant from anchor coordinates and level.
  #[inline]
  pub fn new(coords: [i32; 3], level: u8) -> Self {
    debug_assert!(level <= D::MAX_LEVEL);
    debug_assert!(D::DIM == 3 || coords[2] == 0);
    Self {
      coords,
      level,
      _dim: PhantomData,
    }
  }

  /// Create a quadrant from integer grid position at its own level.
  #[inline]
  pub fn from_grid(grid: [i32; 3], level: u8) -> Self {
    let len = D::quadrant_len(level);
    Self::new([grid[0] * len, grid[1] * len, grid[2] * len], level)
  }

  /// The root quadrant of a tree.
  #[inline]
  pub fn root() -> Self {
    Self::new([0; 3], 0)
  }

  /// Side length.
  #[inline]
  pub fn len(&self) -> i32 {
    D::quadrant_len(self.level)
  }

  /// Id of this quadrant among its siblings.
  #[inline]
  pub fn child_id(&self) -> usize {
    self.ancestor_id(self.level)
  }

  /// Child id of this quadrant's ancestor at `level`.
  #[inline]
  pub fn ancestor_id(&self, level: u8) -> usize {
    debug_assert!(level <= self.level);
    if level == 0 {
      return 0;
    }
    let shift = D::MAX_LEVEL - level;
    (0..D::DIM).fold(0, |id, axis| id | ((((self.coords[axis] >> shift) & 1) as usize) << axis))
  }

  /// Ancestor at `level` (self when the levels match).
  #[inline]
  pub fn ancestor(&self, level: u8) -> Self {
    debug_assert!(level <= self.level);
    let mask = -1i32 << (D::MAX_LEVEL - level);
    let mut coords = self.coords;
    for c in coords.iter_mut().take(D::DIM) {
      *c &= mask;
    }
    Self::new(coords, level)
  }

  #[inline]
  pub fn parent(&self) -> Self {
    debug_assert!(self.level > 0);
    self.ancestor(self.level - 1)
  }

  /// Sibling with child id `id`.
  #[inline]
  pub fn sibling(&self, id: usize) -> Self {
    debug_assert!(self.level > 0);
    let len = self.len();
    let mut coords = self.coords;
    for (axis, c) in coords.iter_mut().enumerate().take(D::DIM) {
      *c = (*c & !len) | if (id >> axis) & 1 == 1 { len } else { 0 };
    }
    Self::new(coords, self.level)
  }

  /// Child with child id `id`.
  #[inline]
  pub fn child(&self, id: usize) -> Self {
    debug_assert!(self.level < D::QMAX_LEVEL);
    let len = D::quadrant_len(self.level + 1);
    let mut coords = self.coords;
    for (axis, c) in coords.iter_mut().enumerate().take(D::DIM) {
      if (id >> axis) & 1 == 1 {
        *c += len;
      }
    }
    Self::new(coords, self.level + 1)
  }

  /// All children in Morton order.
  pub fn children(&self) -> impl Iterator<Item = Self> + '_ {
    (0..D::CHILDREN).map(move |id| self.child(id))
  }

  /// Descendant at `level` sitting in corner `corner` of this quadrant.
  #[inline]
  pub fn corner_descendant(&self, corner: usize, level: u8) -> Self {
    debug_assert!(level >= self.level);
    let shift = self.len() - D::quadrant_len(level);
    let mut coords = self.coords;
    for (axis, c) in coords.iter_mut().enumerate().take(D::DIM) {
      if (corner >> axis) & 1 == 1 {
        *c += shift;
      }
    }
    Self::new(coords, level)
  }

  #[inline]
  pub fn first_descendant(&self, level: u8) -> Self {
    self.corner_descendant(0, level)
  }

  #[inline]
  pub fn last_descendant(&self, level: u8) -> Self {
    self.corner_descendant(D::CHILDREN - 1, level)
  }

  /// Whether this quadrant touches corner `corner` of the root.
  #[inline]
  pub fn touches_corner(&self, corner: usize) -> bool {
    let rmh = D::root_len() - self.len();
    (0..D::DIM).all(|axis| self.coords[axis] == if (corner >> axis) & 1 == 1 { rmh } else { 0 })
  }

  /// Number of axes along which the anchor lies outside the root.
  #[inline]
  pub fn outside_axes(&self) -> usize {
    let root = D::root_len();
    self.coords[..D::DIM].iter().filter(|&&c| c < 0 || c >= root).count()
  }

  #[inline]
  pub fn is_inside_root(&self) -> bool {
    self.outside_axes() == 0
  }

  /// Inside the root and aligned to its own level.
  pub fn is_valid(&self) -> bool {
    self.level <= D::QMAX_LEVEL
      && self.is_inside_root()
      && self.coords[..D::DIM].iter().all(|&c| c & (self.len() - 1) == 0)
      && (D::DIM == 3 || self.coords[2] == 0)
  }

  /// Strict ancestor test.
  #[inline]
  pub fn is_ancestor(&self, other: &Self) -> bool {
    if self.level >= other.level {
      return false;
    }
    let shift = D::MAX_LEVEL - self.level;
    (0..D::DIM).all(|axis| ((self.coords[axis] ^ other.coords[axis]) >> shift) == 0)
  }

  /// Equal or ancestor.
  #[inline]
  pub fn contains(&self, other: &Self) -> bool {
    self == other || self.is_ancestor(other)
  }

  /// Morton order where an ancestor/descendant pair compares equal.
  ///
  /// Used to binary-search a linear range for the quadrant that contains a
  /// probe.
  #[inline]
  pub fn compare_contains(&self, other: &Self) -> Ordering {
    let level = self.level.min(other.level);
    let mask = -1i32 << (D::MAX_LEVEL - level);
    if (0..D::DIM).all(|axis| (self.coords[axis] ^ other.coords[axis]) & mask == 0) {
      Ordering::Equal
    } else {
      self.cmp(other)
    }
  }

  /// Same-size neighbor across face `face`; may lie outside the root.
  #[inline]
  pub fn face_neighbor(&self, face: usize) -> Self {
    let mut coords = self.coords;
    let len = self.len();
    coords[face / 2] += if face % 2 == 1 { len } else { -len };
    Self::new(coords, self.level)
  }

  /// Same-size neighbor across edge `edge` (3D only).
  #[inline]
  pub fn edge_neighbor(&self, edge: usize) -> Self {
    debug_assert!(D::EDGES > 0);
    let (perp, _) = tangential_axes::<D>(edge / 4);
    let len = self.len();
    let mut coords = self.coords;
    for (k, &axis) in perp.iter().enumerate() {
      coords[axis] += if (edge >> k) & 1 == 1 { len } else { -len };
    }
    Self::new(coords, self.level)
  }

  /// Same-size neighbor across corner `corner`.
  #[inline]
  pub fn corner_neighbor(&self, corner: usize) -> Self {
    let len = self.len();
    let mut coords = self.coords;
    for (axis, c) in coords.iter_mut().enumerate().take(D::DIM) {
      *c += if (corner >> axis) & 1 == 1 { len } else { -len };
    }
    Self::new(coords, self.level)
  }

  /// Bounds in the unit square/cube of the tree.
  pub fn unit_bounds(&self) -> (DVec3, DVec3) {
    let root = D::root_len() as f64;
    let min = DVec3::new(
      self.coords[0] as f64 / root,
      self.coords[1] as f64 / root,
      self.coords[2] as f64 / root,
    );
    let size = self.len() as f64 / root;
    let extent = if D::DIM == 3 {
      DVec3::splat(size)
    } else {
      DVec3::new(size, size, 0.0)
    };
    (min, min + extent)
  }

  /// Center in the unit square/cube of the tree.
  pub fn unit_center(&self) -> DVec3 {
    let (min, max) = self.unit_bounds();
    (min + max) * 0.5
  }
}

impl<D: Dim> Ord for Quadrant<D> {
  fn cmp(&self, other: &Self) -> Ordering {
    let diff = |axis: usize| (self.coords[axis] ^ other.coords[axis]) as u32;
    if (0..D::DIM).all(|axis| diff(axis) == 0) {
      return self.level.cmp(&other.level);
    }

    // The axis holding the highest differing bit decides; ties go to the
    // higher axis.
    let mut axis = 0;
    for a in (1..D::DIM).rev() {
      let lower = (0..a).fold(0u32, |acc, b| acc | diff(b));
      if diff(a) > (lower & !diff(a)) {
        axis = a;
        break;
      }
    }

    let key = |v: i32| v as i64 + if v >= 0 { 0 } else { 1i64 << (D::MAX_LEVEL + 2) };
    key(self.coords[axis]).cmp(&key(other.coords[axis]))
  }
}

impl<D: Dim> PartialOrd for Quadrant<D> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// Split a sorted range of strict descendants of a level-`level` quadrant
/// by their child id at `level + 1`.
///
/// Entry `i` is the offset of the first quadrant in child `i`; entry
/// `CHILDREN` is the range length.
pub fn split_by_child<D: Dim>(quads: &[Quadrant<D>], level: u8) -> ChildBounds {
  let mut bounds = [quads.len(); MAX_CHILD_BOUNDS];
  bounds[0] = 0;
  for (i, bound) in bounds.iter_mut().enumerate().take(D::CHILDREN).skip(1) {
    *bound = quads.partition_point(|q| q.ancestor_id(level + 1) < i);
  }
  bounds
}

#[cfg(test)]
#[path = "quadrant_test.rs"]
mod quadrant_test;
