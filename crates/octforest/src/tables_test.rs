use super::*;

fn bit(c: u8, axis: u8) -> u8 {
  (c >> axis) & 1
}

// =============================================================================
// Faces and corners
// =============================================================================

/// Every corner listed on a face lies on the face's side of its normal axis.
#[test]
fn test_face_corners_on_face() {
  for (f, corners) in FACE_CORNERS_2D.iter().enumerate() {
    for &c in corners {
      assert_eq!(bit(c, f as u8 / 2), f as u8 % 2, "2D face {} corner {}", f, c);
    }
  }
  for (f, corners) in FACE_CORNERS_3D.iter().enumerate() {
    for &c in corners {
      assert_eq!(bit(c, f as u8 / 2), f as u8 % 2, "3D face {} corner {}", f, c);
    }
  }
}

/// corner_face_corners inverts face_corners.
#[test]
fn test_corner_face_corners_inverse() {
  for f in 0..4 {
    for (i, &c) in FACE_CORNERS_2D[f].iter().enumerate() {
      assert_eq!(CORNER_FACE_CORNERS_2D[c as usize][f], i as i8);
    }
  }
  for f in 0..6 {
    for (i, &c) in FACE_CORNERS_3D[f].iter().enumerate() {
      assert_eq!(CORNER_FACE_CORNERS_3D[c as usize][f], i as i8);
    }
  }
  let on_faces_3d: usize = CORNER_FACE_CORNERS_3D
    .iter()
    .map(|row| row.iter().filter(|&&v| v >= 0).count())
    .sum();
  assert_eq!(on_faces_3d, 24, "each of 8 corners lies on 3 faces");
}

/// Each corner touches exactly the faces listed for it.
#[test]
fn test_corner_faces_match_face_corners() {
  for c in 0..8u8 {
    for &f in &CORNER_FACES_3D[c as usize] {
      assert!(FACE_CORNERS_3D[f as usize].contains(&c));
    }
  }
  for c in 0..4u8 {
    for &f in &CORNER_FACES_2D[c as usize] {
      assert!(FACE_CORNERS_2D[f as usize].contains(&c));
    }
  }
}

// =============================================================================
// Edges
// =============================================================================

/// Edge corners differ exactly in the edge's axis bit.
#[test]
fn test_edge_corners_axis() {
  for (e, [c0, c1]) in EDGE_CORNERS_3D.iter().enumerate() {
    assert_eq!(c0 ^ c1, 1 << (e / 4), "edge {}", e);
    assert!(c0 < c1);
  }
}

/// Both faces of an edge contain both of its corners.
#[test]
fn test_edge_faces_contain_corners() {
  for e in 0..12 {
    for &f in &EDGE_FACES_3D[e] {
      for &c in &EDGE_CORNERS_3D[e] {
        assert!(FACE_CORNERS_3D[f as usize].contains(&c), "edge {} face {}", e, f);
      }
      assert!(FACE_EDGES_3D[f as usize].contains(&(e as u8)));
    }
  }
}

/// corner_edges and edge_corners agree.
#[test]
fn test_corner_edges_inverse() {
  for c in 0..8u8 {
    for (axis, &e) in CORNER_EDGES_3D[c as usize].iter().enumerate() {
      assert_eq!(e as usize / 4, axis);
      assert!(EDGE_CORNERS_3D[e as usize].contains(&c));
    }
  }
}

/// The generated child_corner_edges table covers exactly the 12 edges.
#[test]
fn test_child_corner_edges_generated() {
  let mut seen = 0;
  for c0 in 0..8 {
    for c1 in 0..8 {
      let e = CHILD_CORNER_EDGES_3D[c0][c1];
      if (c0 ^ c1).count_ones() == 1 {
        assert!(e >= 0);
        seen += 1;
      } else {
        assert_eq!(e, -1);
      }
    }
  }
  assert_eq!(seen, 24);
}
