use super::*;
use crate::dim::D2;

/// Entries are sorted by tree, then Morton order, and offset per tree.
#[test]
fn test_new_sorts_and_offsets() {
  let root = Quadrant::<D2>::root();
  let entries = vec![
    (root.child(3), GhostOwner { tree: 1, rank: 2 }),
    (root.child(2), GhostOwner { tree: 0, rank: 1 }),
    (root.child(0), GhostOwner { tree: 1, rank: 1 }),
  ];
  let ghost = GhostLayer::new(3, entries).unwrap();
  assert_eq!(ghost.tree_offsets(), &[0, 1, 3, 3]);
  assert_eq!(ghost.quadrants(), &[root.child(2), root.child(0), root.child(3)]);
  assert_eq!(ghost.owners()[2], GhostOwner { tree: 1, rank: 2 });
  assert_eq!(ghost.tree_range(1), 1..3);
  assert!(ghost.tree_range(2).is_empty());
}

/// Ghosts must name an existing tree.
#[test]
fn test_new_rejects_unknown_tree() {
  let entries = vec![(Quadrant::<D2>::root(), GhostOwner { tree: 4, rank: 0 })];
  let err = GhostLayer::new(2, entries).unwrap_err();
  assert_eq!(err, ForestError::TreeOutOfRange { tree: 4, num_trees: 2 });
}

/// The empty layer still has one offset range per tree.
#[test]
fn test_empty() {
  let ghost = GhostLayer::<D2>::empty(2);
  assert!(ghost.is_empty());
  assert_eq!(ghost.num_trees(), 2);
  assert_eq!(ghost.tree_range(1), 0..0);
}

/// A ghost listed twice in one tree is rejected.
#[test]
fn test_new_rejects_duplicate() {
  let root = Quadrant::<D2>::root();
  let entries = vec![
    (root.child(1), GhostOwner { tree: 0, rank: 1 }),
    (root.child(2), GhostOwner { tree: 1, rank: 1 }),
    (root.child(1), GhostOwner { tree: 0, rank: 2 }),
  ];
  let err = GhostLayer::new(2, entries).unwrap_err();
  assert_eq!(err, ForestError::QuadrantOrder { tree: 0, index: 1 });
}

/// A ghost overlapping one of its descendants is rejected.
#[test]
fn test_new_rejects_nested() {
  let root = Quadrant::<D2>::root();
  let entries = vec![
    (root.child(3).child(0), GhostOwner { tree: 1, rank: 0 }),
    (root.child(0), GhostOwner { tree: 0, rank: 0 }),
    (root.child(3), GhostOwner { tree: 1, rank: 2 }),
  ];
  let err = GhostLayer::new(2, entries).unwrap_err();
  assert_eq!(err, ForestError::QuadrantOrder { tree: 1, index: 1 });
}

/// The same quadrant may be a ghost in two different trees.
#[test]
fn test_new_accepts_same_quadrant_in_two_trees() {
  let q = Quadrant::<D2>::root().child(2);
  let entries = vec![(q, GhostOwner { tree: 1, rank: 0 }), (q, GhostOwner { tree: 0, rank: 1 })];
  let ghost = GhostLayer::new(2, entries).unwrap();
  assert_eq!(ghost.tree_offsets(), &[0, 1, 2]);
}
