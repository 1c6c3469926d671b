//! Coordinate transforms between neighboring trees.
//!
//! A face connection carries an orientation code; from it we derive, per
//! source axis, the target axis and whether the direction is reversed.
//! Edge and corner connections only need to know where the touching entity
//! sits in the neighbor tree.
//!
//! ```text
//!   tree t           tree nt (face 1 -> face 0, orientation 1 in 2D)
//!   +-------+        +-------+
//!   |     b |  -->   | a     |
//!   |     a |        | b     |
//!   +-------+        +-------+
//! ```

use std::marker::PhantomData;

use super::TreeId;
use crate::dim::{tangential_axes, Dim};
use crate::quadrant::Quadrant;

/// Maps quadrants and corners of one tree across a face into its neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceTransform<D: Dim> {
  /// Face of the source tree.
  pub face: u8,
  /// Face of the neighbor tree.
  pub nface: u8,
  pub orientation: u8,
  target: [usize; 3],
  reversed: [bool; 3],
  _dim: PhantomData<D>,
}

impl<D: Dim> FaceTransform<D> {
  pub fn new(face: usize, nface: usize, orientation: usize) -> Self {
    let (axis, naxis) = (face / 2, nface / 2);
    let (tang, _) = tangential_axes::<D>(axis);
    let (ntang, _) = tangential_axes::<D>(naxis);

    let mut target = [0, 1, 2];
    let mut reversed = [false; 3];
    target[axis] = naxis;

    if D::DIM == 2 {
      target[tang[0]] = ntang[0];
      reversed[tang[0]] = orientation == 1;
    } else {
      let (sigma, rho) = face_symmetry(face, nface, orientation, tang, ntang);
      for k in 0..2 {
        target[tang[k]] = ntang[sigma[k]];
        reversed[tang[k]] = rho[k];
      }
    }

    Self {
      face: face as u8,
      nface: nface as u8,
      orientation: orientation as u8,
      target,
      reversed,
      _dim: PhantomData,
    }
  }

  /// Axis of the neighbor tree that source `axis` maps to.
  #[inline]
  pub fn target_axis(&self, axis: usize) -> usize {
    self.target[axis]
  }

  #[inline]
  pub fn is_reversed(&self, axis: usize) -> bool {
    self.reversed[axis]
  }

  /// Express `q` (which may lie just across the face, outside the source
  /// root) in the coordinates of the neighbor tree.
  pub fn transform(&self, q: &Quadrant<D>) -> Quadrant<D> {
    let root = D::root_len() as i64;
    let h = q.len() as i64;
    let (axis, naxis) = (self.face as usize / 2, self.nface as usize / 2);
    let mut coords = [0i32; 3];

    for a in 0..D::DIM {
      let v = q.coords[a] as i64;
      let out = if a == axis {
        match (self.face % 2, self.nface % 2) {
          (0, 0) => -h - v,
          (0, _) => v + root,
          (_, 0) => v - root,
          _ => 2 * root - h - v,
        }
      } else if self.reversed[a] {
        root - h - v
      } else {
        v
      };
      coords[self.target[a]] = out as i32;
    }
    debug_assert_eq!(self.target[axis], naxis);
    Quadrant::new(coords, q.level)
  }

  /// Corner of the neighbor tree touching source `corner`, which must lie
  /// on the source face.
  pub fn corner(&self, corner: usize) -> usize {
    let axis = self.face as usize / 2;
    let mut out = 0;
    for a in 0..D::DIM {
      let bit = if a == axis {
        (self.nface % 2) as usize
      } else {
        ((corner >> a) & 1) ^ self.reversed[a] as usize
      };
      out |= bit << self.target[a];
    }
    out
  }
}

/// Pick the tangential permutation `sigma` and reflections `rho` encoded by
/// a 3D orientation code, keeping the full transform a proper rotation.
fn face_symmetry(
  face: usize,
  nface: usize,
  orientation: usize,
  tang: [usize; 2],
  ntang: [usize; 2],
) -> ([usize; 2], [bool; 2]) {
  let normal_sign = if face % 2 == nface % 2 { -1 } else { 1 };
  let mut fallback = None;

  for sym in 0..8usize {
    let sigma = if sym & 4 != 0 { [1, 0] } else { [0, 1] };
    let rho = [sym & 1 != 0, sym & 2 != 0];
    let map = |i: usize| {
      (0..2).fold(0, |acc, k| acc | ((((i >> k) & 1) ^ rho[k] as usize) << sigma[k]))
    };
    let matches = if face <= nface {
      map(0) == orientation
    } else {
      map(orientation) == 0
    };
    if !matches {
      continue;
    }

    let mut m = [[0i32; 3]; 3];
    m[nface / 2][face / 2] = normal_sign;
    for k in 0..2 {
      m[ntang[sigma[k]]][tang[k]] = if rho[k] { -1 } else { 1 };
    }
    if det3(&m) == 1 {
      return (sigma, rho);
    }
    fallback.get_or_insert((sigma, rho));
  }

  fallback.unwrap_or(([0, 1], [false, false]))
}

fn det3(m: &[[i32; 3]; 3]) -> i32 {
  m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
    - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
    + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// A tree touching an edge diagonally (not through a face).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeTransform {
  pub tree: TreeId,
  pub edge: u8,
  /// Whether the edge direction is reversed relative to the source edge.
  pub flip: bool,
}

impl EdgeTransform {
  /// Place `q`, a quadrant touching source edge `source_edge`, against
  /// the target edge inside the neighbor tree.
  pub fn transform<D: Dim>(&self, q: &Quadrant<D>, source_edge: usize) -> Quadrant<D> {
    let rmh = D::root_len() - q.len();
    let (axis, naxis) = (source_edge / 4, self.edge as usize / 4);
    let (perp, _) = tangential_axes::<D>(naxis);

    let mut coords = [0i32; 3];
    let v = q.coords[axis];
    coords[naxis] = if self.flip { rmh - v } else { v };
    for (k, &a) in perp.iter().enumerate() {
      coords[a] = if (self.edge >> k) & 1 == 1 { rmh } else { 0 };
    }
    Quadrant::new(coords, q.level)
  }

  /// Corner of the target tree at edge position `pos` (0 = low end) of the
  /// source edge.
  #[inline]
  pub fn corner<D: Dim>(&self, pos: usize) -> usize {
    D::edge_corners(self.edge as usize)[pos ^ self.flip as usize] as usize
  }
}

/// A tree touching a corner only through that corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerTransform {
  pub tree: TreeId,
  pub corner: u8,
}

impl CornerTransform {
  /// Place a quadrant of `q`'s size in the target corner.
  pub fn transform<D: Dim>(&self, q: &Quadrant<D>) -> Quadrant<D> {
    let rmh = D::root_len() - q.len();
    let mut coords = [0i32; 3];
    for (axis, c) in coords.iter_mut().enumerate().take(D::DIM) {
      *c = if (self.corner >> axis) & 1 == 1 { rmh } else { 0 };
    }
    Quadrant::new(coords, q.level)
  }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;
