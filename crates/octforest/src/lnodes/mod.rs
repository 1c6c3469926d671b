//! Hanging-face codes for node numbering.
//!
//! Every local quadrant gets a small integer code that records which of its
//! faces (and in 3D edges) are half of a coarser neighbor's entity. Zero
//! means fully conforming.
//!
//! ```text
//! 2D  (4 bits)   [ f1 f0 | c1 c0 ]          c = child id, f = face flags
//! 3D  (9 bits)   [ e2 e1 e0 | f2 f1 f0 | c2 c1 c0 ]
//! column (13)    [ e3..e0 | s3..s0 | h | 2D code ]
//! ```
//!
//! Face and edge flags are indexed by axis: flag `i` refers to
//! `corner_faces(c)[i]` or `corner_edges(c)[i]`, the entities through the
//! child's own corner `c`. A column code describes a prism cell: a 2D code
//! for the horizontal plane, the layer parity `h`, one layer-wise
//! non-conformity flag per side face and one per vertical edge.

use crate::dim::{Dim, D2, D3};
use crate::forest::{Forest, GhostLayer};
use crate::iterate::{iterate, EdgeInfo, FaceInfo, Visitor, Visits};

/// A face of a cell relative to its coarse neighbor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FaceHang {
  #[default]
  Conforming,
  /// Half of a coarse face; holds the corner of the coarse face this half
  /// touches.
  Hanging(u8),
}

impl FaceHang {
  /// `-1` when conforming, else the coarse face corner.
  pub fn to_int(self) -> i8 {
    match self {
      FaceHang::Conforming => -1,
      FaceHang::Hanging(c) => c as i8,
    }
  }
}

/// An edge of a cell relative to its coarse neighbor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeHang {
  #[default]
  Conforming,
  /// First (0) or second (1) half of a coarse edge; neither adjoining face
  /// hangs.
  Half(u8),
  /// First or second half of a coarse edge that bounds a hanging face.
  FaceBoundaryHalf(u8),
  /// Inside a hanging face.
  FaceInterior,
}

impl EdgeHang {
  /// `-1`, `0`/`1`, `2`/`3` or `4`.
  pub fn to_int(self) -> i8 {
    match self {
      EdgeHang::Conforming => -1,
      EdgeHang::Half(h) => h as i8,
      EdgeHang::FaceBoundaryHalf(h) => 2 + h as i8,
      EdgeHang::FaceInterior => 4,
    }
  }

  /// Mark this edge as half of a coarse edge.
  fn halve(self, h: u8) -> Self {
    match self {
      EdgeHang::Conforming => EdgeHang::Half(h),
      _ => EdgeHang::FaceBoundaryHalf(h),
    }
  }
}

/// Decoded 2D code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadHanging {
  pub faces: [FaceHang; 4],
}

impl QuadHanging {
  pub fn is_conforming(&self) -> bool {
    self.faces.iter().all(|f| *f == FaceHang::Conforming)
  }

  pub fn face_ints(&self) -> [i8; 4] {
    self.faces.map(FaceHang::to_int)
  }
}

/// Decoded 3D or column code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HexHanging {
  pub faces: [FaceHang; 6],
  pub edges: [EdgeHang; 12],
}

impl HexHanging {
  pub fn is_conforming(&self) -> bool {
    self.faces.iter().all(|f| *f == FaceHang::Conforming) && self.edges.iter().all(|e| *e == EdgeHang::Conforming)
  }

  pub fn face_ints(&self) -> [i8; 6] {
    self.faces.map(FaceHang::to_int)
  }

  pub fn edge_ints(&self) -> [i8; 12] {
    self.edges.map(EdgeHang::to_int)
  }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a 2D code: bits 0-1 child id, bits 2-3 face flags.
pub fn decode_2d(code: u8) -> QuadHanging {
  let mut out = QuadHanging::default();
  if code == 0 {
    return out;
  }

  let c = usize::from(code & 0x3);
  let mut work = code >> 2;
  for &f in D2::corner_faces(c) {
    if work & 1 != 0 {
      if let Some(fc) = D2::corner_face_corners(c, f as usize) {
        out.faces[f as usize] = FaceHang::Hanging(fc as u8);
      }
    }
    work >>= 1;
  }
  out
}

/// Decode a 3D code: bits 0-2 child id, 3-5 face flags, 6-8 edge flags.
pub fn decode_3d(code: u16) -> HexHanging {
  let mut out = HexHanging::default();
  if code == 0 {
    return out;
  }

  let c = usize::from(code & 0x7);
  let mut work = code >> 3;
  for &f in D3::corner_faces(c) {
    if work & 1 != 0 {
      if let Some(fc) = D3::corner_face_corners(c, f as usize) {
        out.faces[f as usize] = FaceHang::Hanging(fc as u8);
      }
      for &e in D3::face_edges(f as usize) {
        out.edges[e as usize] = EdgeHang::FaceInterior;
      }
    }
    work >>= 1;
  }

  // Edges through corner `c`, one per axis; the child's coordinate along
  // that axis picks the half.
  for (axis, &e) in D3::corner_edges(c).iter().enumerate() {
    if work & 1 != 0 {
      let h = ((c >> axis) & 1) as u8;
      out.edges[e as usize] = out.edges[e as usize].halve(h);
    }
    work >>= 1;
  }
  out
}

/// Decode a 16-bit column code.
///
/// Side faces 0-3 and vertical edges 8-11 can be flagged; the bottom and
/// top faces never hang.
pub fn decode_column(code: u16) -> HexHanging {
  let mut out = HexHanging::default();
  if code == 0 {
    return out;
  }

  let plane = decode_2d((code & 0xf) as u8);
  let h = ((code >> 4) & 1) as u8;
  let mut work = code >> 5;

  for (f, &plane_face) in plane.faces.iter().enumerate() {
    let edges = D3::face_edges(f);
    let mut face = plane_face;
    if let FaceHang::Hanging(hf) = face {
      out.edges[edges[0] as usize] = EdgeHang::FaceBoundaryHalf(hf);
      out.edges[edges[1] as usize] = EdgeHang::FaceBoundaryHalf(hf);
      out.edges[edges[3 ^ hf as usize] as usize] = EdgeHang::FaceInterior;
    }
    if work & 1 != 0 {
      out.edges[edges[1 ^ h as usize] as usize] = EdgeHang::FaceInterior;
      out.edges[edges[2] as usize] = EdgeHang::FaceBoundaryHalf(h);
      out.edges[edges[3] as usize] = EdgeHang::FaceBoundaryHalf(h);
      if let FaceHang::Hanging(hf) = face {
        face = FaceHang::Hanging(hf + 2 * h);
      }
    }
    out.faces[f] = face;
    work >>= 1;
  }

  for e in 8..12 {
    if work & 1 != 0 && out.edges[e] == EdgeHang::Conforming {
      out.edges[e] = EdgeHang::Half(h);
    }
    work >>= 1;
  }
  out
}

// =============================================================================
// Encoding
// =============================================================================

/// Pack a column code from its fields. Only the low four bits of `plane`,
/// `side_faces` and `side_edges` are used.
pub fn column_code(plane: u8, upper: bool, side_faces: u8, side_edges: u8) -> u16 {
  u16::from(plane & 0xf) | u16::from(upper) << 4 | u16::from(side_faces & 0xf) << 5 | u16::from(side_edges & 0xf) << 9
}

/// Code of every local quadrant in forest order.
///
/// Each quadrant on the fine side of a hanging face or edge gets its child
/// id and the flag of that entity's axis. The result decodes with
/// [`decode_2d`] or [`decode_3d`].
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "lnodes::face_codes"))]
pub fn face_codes<D: Dim>(forest: &Forest<D>, ghost: Option<&GhostLayer<D>>) -> Vec<u16> {
  let mut offsets = Vec::with_capacity(forest.num_trees());
  let mut total = 0;
  for tree in forest.trees() {
    offsets.push(total);
    total += tree.len();
  }

  let mut coder = FaceCoder {
    offsets,
    codes: vec![0; total],
  };
  iterate(forest, ghost, &mut coder);

  #[cfg(feature = "tracing")]
  tracing::debug!(
    quadrants = total,
    hanging = coder.codes.iter().filter(|c| **c != 0).count(),
    "face codes"
  );

  coder.codes
}

struct FaceCoder {
  offsets: Vec<usize>,
  codes: Vec<u16>,
}

impl FaceCoder {
  fn mark(&mut self, tree: usize, index: usize, child: usize, bit: usize) {
    self.codes[self.offsets[tree] + index] |= (child as u16) | 1 << bit;
  }
}

impl<D: Dim> Visitor<D> for FaceCoder {
  fn visits(&self) -> Visits {
    Visits::NONE.with_face().with_edge()
  }

  fn face(&mut self, info: &FaceInfo<'_, D>) {
    for side in &info.sides {
      let Some(slots) = side.quads.hanging() else {
        continue;
      };
      let bit = D::DIM + usize::from(side.face) / 2;
      for q in slots.iter().flatten().filter(|q| q.is_local()) {
        self.mark(side.tree, q.index, q.quad.child_id(), bit);
      }
    }
  }

  fn edge(&mut self, info: &EdgeInfo<'_, D>) {
    for side in &info.sides {
      let Some(slots) = side.quads.hanging() else {
        continue;
      };
      let bit = 2 * D::DIM + usize::from(side.edge) / 4;
      for q in slots.iter().flatten().filter(|q| q.is_local()) {
        self.mark(side.tree, q.index, q.quad.child_id(), bit);
      }
    }
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
