use super::*;
use crate::dim::{D2, D3};
use crate::iterate::test_utils::{refined_corner, unit};

fn expected_refined_corner_3d(k: usize) -> u16 {
  let (kx, ky, kz) = (k & 1, (k >> 1) & 1, (k >> 2) & 1);
  let faces = kx << 3 | ky << 4 | kz << 5;
  let edges = (ky | kz) << 6 | (kx | kz) << 7 | (kx | ky) << 8;
  if faces | edges == 0 {
    0
  } else {
    (k | faces | edges) as u16
  }
}

// =============================================================================
// 2D codes
// =============================================================================

/// Zero and child-only codes are conforming.
#[test]
fn test_decode_2d_conforming() {
  assert!(decode_2d(0).is_conforming());
  assert!(decode_2d(3).is_conforming());
  assert_eq!(decode_2d(0).face_ints(), [-1; 4]);
}

/// Face flags follow the child's own corner.
#[test]
fn test_decode_2d_faces() {
  assert_eq!(decode_2d(5).face_ints(), [-1, 0, -1, -1]);
  assert_eq!(decode_2d(8).face_ints(), [-1, -1, 0, -1]);
  assert_eq!(decode_2d(15).face_ints(), [-1, 1, -1, 1]);
  assert_eq!(decode_2d(15).faces[1], FaceHang::Hanging(1));
}

// =============================================================================
// 3D codes
// =============================================================================

/// A lone edge flag halves the edge by the child's position.
#[test]
fn test_decode_3d_edge_only() {
  let hang = decode_3d(1 | 1 << 6);
  assert_eq!(hang.face_ints(), [-1; 6]);
  let mut edges = [-1; 12];
  edges[0] = 1;
  assert_eq!(hang.edge_ints(), edges);
}

/// One hanging face with two flagged edges on its boundary.
#[test]
fn test_decode_3d_face_and_edges() {
  let hang = decode_3d(393);
  assert_eq!(hang.face_ints(), [-1, 0, -1, -1, -1, -1]);
  let mut edges = [-1; 12];
  edges[5] = 2;
  edges[9] = 2;
  edges[7] = 4;
  edges[11] = 4;
  assert_eq!(hang.edge_ints(), edges);
  assert_eq!(hang.edges[5], EdgeHang::FaceBoundaryHalf(0));
  assert_eq!(hang.edges[7], EdgeHang::FaceInterior);
}

/// Three hanging faces meeting at the far corner.
#[test]
fn test_decode_3d_all_flags() {
  let hang = decode_3d(511);
  assert_eq!(hang.face_ints(), [-1, 3, -1, 3, -1, 3]);
  assert_eq!(hang.edge_ints(), [-1, 4, 4, 3, -1, 4, 4, 3, -1, 4, 4, 3]);
  assert!(!hang.is_conforming());
  assert!(decode_3d(0).is_conforming());
}

// =============================================================================
// Column codes
// =============================================================================

/// Packing places every field in its bit range.
#[test]
fn test_column_code_packing() {
  assert_eq!(column_code(0xf, true, 0xf, 0xf), 0x1fff);
  assert_eq!(column_code(5, false, 0, 0), 5);
  assert_eq!(column_code(0, true, 0, 0b0101), 16 | 5 << 9);
  assert_eq!(column_code(0xff, false, 0, 0), 0xf);
}

/// Zero means everything conforming.
#[test]
fn test_decode_column_zero() {
  let hang = decode_column(0);
  assert!(hang.is_conforming());
  assert_eq!(hang.face_ints(), [-1; 6]);
  assert_eq!(hang.edge_ints(), [-1; 12]);
}

/// A horizontally hanging side face.
#[test]
fn test_decode_column_plane_face() {
  let hang = decode_column(column_code(5, false, 0, 0));
  assert_eq!(hang.face_ints(), [-1, 0, -1, -1, -1, -1]);
  let mut edges = [-1; 12];
  edges[5] = 2;
  edges[7] = 2;
  edges[11] = 4;
  assert_eq!(hang.edge_ints(), edges);
}

/// Horizontal and layer-wise hanging on the same face.
#[test]
fn test_decode_column_both_directions() {
  let hang = decode_column(column_code(5, true, 0b0010, 0));
  assert_eq!(hang.faces[1], FaceHang::Hanging(2));
  let mut edges = [-1; 12];
  edges[5] = 4;
  edges[7] = 2;
  edges[9] = 3;
  edges[11] = 3;
  assert_eq!(hang.edge_ints(), edges);
}

/// Layer-wise side face without a horizontal hang.
#[test]
fn test_decode_column_layer_face() {
  let hang = decode_column(column_code(0, false, 0b0001, 0b0001));
  assert_eq!(hang.face_ints(), [-1; 6]);
  let mut edges = [-1; 12];
  edges[6] = 4;
  edges[8] = 2;
  edges[10] = 2;
  assert_eq!(hang.edge_ints(), edges);
}

/// Vertical edge flags only apply to otherwise conforming edges.
#[test]
fn test_decode_column_edges() {
  let hang = decode_column(column_code(0, true, 0, 0b0101));
  assert_eq!(hang.face_ints(), [-1; 6]);
  let mut edges = [-1; 12];
  edges[8] = 1;
  edges[10] = 1;
  assert_eq!(hang.edge_ints(), edges);
  assert_eq!(hang.edges[8], EdgeHang::Half(1));
}

// =============================================================================
// Computed codes
// =============================================================================

/// A uniform forest has no hanging entities.
#[test]
fn test_face_codes_uniform() {
  let forest = Forest::<D2>::uniform(unit(), 2);
  let codes = face_codes(&forest, None);
  assert_eq!(codes.len(), 16);
  assert!(codes.iter().all(|c| *c == 0));

  let forest = Forest::<D3>::uniform(unit(), 1);
  assert!(face_codes(&forest, None).iter().all(|c| *c == 0));
}

/// Fine quadrants next to coarse neighbors carry child id and face flags.
#[test]
fn test_face_codes_2d() {
  let forest = refined_corner::<D2>(unit(), 1);
  let codes = face_codes(&forest, None);
  assert_eq!(codes, vec![0, 5, 10, 15, 0, 0, 0]);
  assert_eq!(decode_2d(codes[3] as u8).face_ints(), [-1, 1, -1, 1]);
}

/// In 3D hanging edges are flagged as well.
#[test]
fn test_face_codes_3d() {
  let forest = refined_corner::<D3>(unit(), 1);
  let codes = face_codes(&forest, None);
  assert_eq!(codes.len(), 15);
  for (k, code) in codes.iter().take(8).enumerate() {
    assert_eq!(*code, expected_refined_corner_3d(k), "child {k}");
  }
  assert!(codes[8..].iter().all(|c| *c == 0));
  assert_eq!(decode_3d(codes[7]), decode_3d(511));
}

/// Per-rank codes concatenate to the serial codes.
#[test]
fn test_face_codes_partitioned() {
  let forest = refined_corner::<D3>(unit(), 1);
  let serial = face_codes(&forest, None);

  let mut joined = Vec::new();
  for (part, ghost) in forest.partition(3).unwrap() {
    joined.extend(face_codes(&part, Some(&ghost)));
  }
  assert_eq!(joined, serial);
}
