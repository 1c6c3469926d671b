use super::*;
use crate::dim::{D2, D3};

/// Trees are numbered with x fastest and glued face to opposite face.
#[test]
fn test_brick_numbering_2d() {
  let conn = Connectivity::<D2>::brick(&BrickConfig::new([3, 2, 7])).unwrap();
  assert_eq!(conn.num_trees(), 6);
  assert_eq!(conn.face_neighbor(1, 1), Some((2, 0, 0)));
  assert_eq!(conn.face_neighbor(1, 3), Some((4, 2, 0)));
  assert!(conn.is_boundary(2, 1));
  assert!(conn.is_boundary(4, 3));
}

/// Zero-sized bricks are rejected.
#[test]
fn test_brick_rejects_empty_axis() {
  let err = Connectivity::<D3>::brick(&BrickConfig::new([2, 0, 1])).unwrap_err();
  assert_eq!(err, ForestError::EmptyBrick { axis: 1 });
}

/// Only lattice edges shared by several trees get a list.
#[test]
fn test_brick_edge_lists_3d() {
  let conn = Connectivity::<D3>::brick(&BrickConfig::new([2, 2, 2])).unwrap();
  // The central vertical edge is shared by the four lower trees.
  assert_eq!(conn.edge_links(0, 11).len(), 4);
  // An edge on the outer hull belongs to one tree only.
  assert!(conn.edge_links(0, 0).is_empty());
  // Edges on an outer face are shared by two trees.
  assert_eq!(conn.edge_links(0, 1).len(), 2);
  assert_eq!(conn.max_edge_size(), 4);
}

/// Fully periodic bricks have no boundary.
#[test]
fn test_brick_periodic_has_no_boundary() {
  let conn =
    Connectivity::<D3>::brick(&BrickConfig::new([2, 2, 2]).with_periodic([true; 3])).unwrap();
  for t in 0..8 {
    assert!((0..6).all(|f| !conn.is_boundary(t, f)));
  }
  assert_eq!(conn.corner_links(0, 0).len(), 8);
}
