use smallvec::smallvec;

use super::*;
use crate::dim::D2;

/// Full and hanging sides expose their quadrants uniformly.
#[test]
fn test_side_quads_accessors() {
  let root = Quadrant::<D2>::root();
  let a = root.child(0);
  let b = root.child(1);
  let local = QuadRef { quad: &a, origin: Origin::Local, index: 0 };
  let ghost = QuadRef { quad: &b, origin: Origin::Ghost, index: 7 };

  let full = SideQuads::Full(Some(local));
  assert!(!full.is_hanging());
  assert_eq!(full.full(), Some(&local));
  assert!(full.has_local());
  assert_eq!(full.iter().count(), 1);

  let hanging: SideQuads<'_, D2> = SideQuads::Hanging(smallvec![None, Some(ghost)]);
  assert!(hanging.is_hanging());
  assert_eq!(hanging.full(), None);
  assert_eq!(hanging.hanging().map(<[_]>::len), Some(2));
  assert!(!hanging.has_local());
  assert_eq!(hanging.iter().next().map(|q| q.index), Some(7));

  assert_eq!(SideQuads::<D2>::default(), SideQuads::Full(None));
}

/// A one-sided face is a boundary face without an opposite side.
#[test]
fn test_face_info_boundary() {
  let mut info = FaceInfo::<D2>::default();
  info.sides.push(FaceSide { tree: 0, face: 1, quads: SideQuads::Full(None) });
  assert!(info.is_boundary());
  assert!(info.opposite().is_none());
  info.sides.push(FaceSide { tree: 1, face: 0, quads: SideQuads::Full(None) });
  assert!(!info.is_boundary());
  assert_eq!(info.opposite().map(|s| s.tree), Some(1));
}

/// A reference is either local or ghost, never both.
#[test]
fn test_quad_ref_origin() {
  let q = Quadrant::<D2>::root();
  let local = QuadRef { quad: &q, origin: Origin::Local, index: 3 };
  let ghost = QuadRef { origin: Origin::Ghost, ..local };
  assert!(local.is_local() && !local.is_ghost());
  assert!(ghost.is_ghost() && !ghost.is_local());
}
