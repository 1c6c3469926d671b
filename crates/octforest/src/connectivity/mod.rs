//! Connectivity - how the trees of a forest are glued together.
//!
//! Each tree stores, per face, the neighbor tree and a face code
//! `nface + FACES * orientation`. A face that maps to itself is a domain
//! boundary. Trees that meet only along an edge (3D) or at a corner are
//! recorded in explicit lists of [`EdgeLink`]s and [`CornerLink`]s; a tree
//! participating in such a list points at it from `tree_to_edge` /
//! `tree_to_corner`.
//!
//! ```text
//!   +-----+-----+
//!   |  2  |  3  |     brick 2x2: faces glue neighbors,
//!   +-----o-----+     the corner `o` is shared by all four trees
//!   |  0  |  1  |     and is listed once as a corner list.
//!   +-----+-----+
//! ```

mod builders;
mod transform;

use std::marker::PhantomData;

use smallvec::SmallVec;

pub use builders::BrickConfig;
pub use transform::{CornerTransform, EdgeTransform, FaceTransform};

use crate::dim::{tangential_axes, Dim};
use crate::error::ForestError;
use crate::quadrant::Quadrant;

/// Index of a tree in the forest.
pub type TreeId = usize;

/// Membership of a tree edge in an edge list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeLink {
  pub tree: TreeId,
  pub edge: u8,
  /// Direction of the tree edge relative to the list's reference direction.
  pub flip: u8,
}

/// Membership of a tree corner in a corner list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CornerLink {
  pub tree: TreeId,
  pub corner: u8,
}

/// Neighbor quadrants found across an entity, each with its tree.
pub type Neighbors<D> = SmallVec<[(Quadrant<D>, TreeId); 8]>;

#[derive(Clone, Debug)]
pub struct Connectivity<D: Dim> {
  num_trees: usize,
  tree_to_tree: Vec<TreeId>,
  tree_to_face: Vec<u8>,
  tree_to_edge: Vec<Option<usize>>,
  edge_lists: Vec<SmallVec<[EdgeLink; 4]>>,
  tree_to_corner: Vec<Option<usize>>,
  corner_lists: Vec<SmallVec<[CornerLink; 8]>>,
  _dim: PhantomData<D>,
}

impl<D: Dim> Connectivity<D> {
  /// Build from raw tables, checking sizes and face reciprocity.
  ///
  /// `tree_to_tree` and `tree_to_face` hold `FACES` entries per tree. Each
  /// edge list (3D only) and corner list names the tree entities meeting
  /// there.
  pub fn from_tables(
    num_trees: usize,
    tree_to_tree: Vec<TreeId>,
    tree_to_face: Vec<u8>,
    edge_lists: Vec<Vec<EdgeLink>>,
    corner_lists: Vec<Vec<CornerLink>>,
  ) -> Result<Self, ForestError> {
    let faces = num_trees * D::FACES;
    check_len("tree_to_tree", faces, tree_to_tree.len())?;
    check_len("tree_to_face", faces, tree_to_face.len())?;
    if D::EDGES == 0 {
      check_len("edge_lists", 0, edge_lists.len())?;
    }

    for t in 0..num_trees {
      for f in 0..D::FACES {
        let nt = tree_to_tree[t * D::FACES + f];
        let code = tree_to_face[t * D::FACES + f];
        if nt >= num_trees {
          return Err(ForestError::TreeOutOfRange { tree: nt, num_trees });
        }
        if code as usize >= D::FACES * D::HALF {
          return Err(ForestError::FaceCode { tree: t, face: f, code });
        }
        let nf = code as usize % D::FACES;
        if nt == t && nf == f {
          continue;
        }
        let back_tree = tree_to_tree[nt * D::FACES + nf];
        let back_code = tree_to_face[nt * D::FACES + nf] as usize;
        if back_tree != t || back_code != f + D::FACES * (code as usize / D::FACES) {
          return Err(ForestError::FaceMismatch { tree: t, face: f });
        }
      }
    }

    let mut tree_to_edge = vec![None; num_trees * D::EDGES];
    let mut edges = Vec::with_capacity(edge_lists.len());
    for (id, list) in edge_lists.into_iter().enumerate() {
      for link in &list {
        if link.tree >= num_trees {
          return Err(ForestError::TreeOutOfRange { tree: link.tree, num_trees });
        }
        let e = link.edge as usize;
        if e >= D::EDGES || link.flip > 1 {
          return Err(ForestError::EntityIndex { tree: link.tree, entity: "edge", index: e });
        }
        let slot = &mut tree_to_edge[link.tree * D::EDGES + e];
        if slot.replace(id).is_some() {
          return Err(ForestError::DuplicateEntity { tree: link.tree, entity: "edge", index: e });
        }
      }
      edges.push(SmallVec::from_vec(list));
    }

    let mut tree_to_corner = vec![None; num_trees * D::CHILDREN];
    let mut corners = Vec::with_capacity(corner_lists.len());
    for (id, list) in corner_lists.into_iter().enumerate() {
      for link in &list {
        if link.tree >= num_trees {
          return Err(ForestError::TreeOutOfRange { tree: link.tree, num_trees });
        }
        let c = link.corner as usize;
        if c >= D::CHILDREN {
          return Err(ForestError::EntityIndex { tree: link.tree, entity: "corner", index: c });
        }
        let slot = &mut tree_to_corner[link.tree * D::CHILDREN + c];
        if slot.replace(id).is_some() {
          return Err(ForestError::DuplicateEntity { tree: link.tree, entity: "corner", index: c });
        }
      }
      corners.push(SmallVec::from_vec(list));
    }

    Ok(Self {
      num_trees,
      tree_to_tree,
      tree_to_face,
      tree_to_edge,
      edge_lists: edges,
      tree_to_corner,
      corner_lists: corners,
      _dim: PhantomData,
    })
  }

  #[inline]
  pub fn num_trees(&self) -> usize {
    self.num_trees
  }

  /// Neighbor across face `f` of tree `t` as `(tree, face, orientation)`,
  /// or `None` on the domain boundary.
  #[inline]
  pub fn face_neighbor(&self, t: TreeId, f: usize) -> Option<(TreeId, usize, usize)> {
    let nt = self.tree_to_tree[t * D::FACES + f];
    let code = self.tree_to_face[t * D::FACES + f] as usize;
    let (nf, o) = (code % D::FACES, code / D::FACES);
    (nt != t || nf != f).then_some((nt, nf, o))
  }

  #[inline]
  pub fn is_boundary(&self, t: TreeId, f: usize) -> bool {
    self.face_neighbor(t, f).is_none()
  }

  pub fn face_transform(&self, t: TreeId, f: usize) -> Option<(TreeId, FaceTransform<D>)> {
    self
      .face_neighbor(t, f)
      .map(|(nt, nf, o)| (nt, FaceTransform::new(f, nf, o)))
  }

  /// Edge list containing edge `e` of tree `t` (empty if none).
  pub fn edge_links(&self, t: TreeId, e: usize) -> &[EdgeLink] {
    match self.tree_to_edge.get(t * D::EDGES + e).copied().flatten() {
      Some(id) => &self.edge_lists[id],
      None => &[],
    }
  }

  /// Corner list containing corner `c` of tree `t` (empty if none).
  pub fn corner_links(&self, t: TreeId, c: usize) -> &[CornerLink] {
    match self.tree_to_corner[t * D::CHILDREN + c] {
      Some(id) => &self.corner_lists[id],
      None => &[],
    }
  }

  /// Largest edge list, at least 4 (the trees around an interior edge).
  pub fn max_edge_size(&self) -> usize {
    self.edge_lists.iter().map(|l| l.len()).max().unwrap_or(0).max(4)
  }

  pub fn max_corner_size(&self) -> usize {
    self.corner_lists.iter().map(|l| l.len()).max().unwrap_or(0)
  }

  /// Trees touching edge `e` of tree `t` only diagonally.
  ///
  /// The tree itself and trees already reachable across one of the two
  /// adjacent faces are left out.
  pub fn edge_transforms(&self, t: TreeId, e: usize) -> SmallVec<[EdgeTransform; 4]> {
    let mut out = SmallVec::new();
    let links = self.edge_links(t, e);
    if links.is_empty() {
      return out;
    }
    let own_flip = links
      .iter()
      .find(|l| l.tree == t && l.edge as usize == e)
      .map_or(0, |l| l.flip);

    let corners = D::edge_corners(e);
    let mut via_face: SmallVec<[(TreeId, usize, bool); 2]> = SmallVec::new();
    for &f in D::edge_faces(e) {
      if let Some((nt, ft)) = self.face_transform(t, f as usize) {
        let n0 = ft.corner(corners[0] as usize);
        let n1 = ft.corner(corners[1] as usize);
        if let Some(ne) = D::child_corner_edges(n0, n1) {
          via_face.push((nt, ne, n0 > n1));
        }
      }
    }

    for l in links {
      if l.tree == t && l.edge as usize == e {
        continue;
      }
      let flip = (l.flip ^ own_flip) == 1;
      if via_face.contains(&(l.tree, l.edge as usize, flip)) {
        continue;
      }
      out.push(EdgeTransform { tree: l.tree, edge: l.edge, flip });
    }
    out
  }

  /// Trees touching corner `c` of tree `t` only at that corner.
  pub fn corner_transforms(&self, t: TreeId, c: usize) -> SmallVec<[CornerTransform; 8]> {
    let mut out = SmallVec::new();
    let links = self.corner_links(t, c);
    if links.is_empty() {
      return out;
    }

    let mut reached: SmallVec<[(TreeId, usize); 8]> = SmallVec::new();
    reached.push((t, c));
    for &f in D::corner_faces(c) {
      if let Some((nt, ft)) = self.face_transform(t, f as usize) {
        reached.push((nt, ft.corner(c)));
      }
    }
    for (axis, &e) in D::corner_edges(c).iter().enumerate() {
      let pos = (c >> axis) & 1;
      for et in self.edge_transforms(t, e as usize) {
        reached.push((et.tree, et.corner::<D>(pos)));
      }
    }

    for l in links {
      if !reached.contains(&(l.tree, l.corner as usize)) {
        out.push(CornerTransform { tree: l.tree, corner: l.corner });
      }
    }
    out
  }

  /// The same-size neighbor of `q` across face `f`, in its own tree.
  pub fn face_neighbor_extra(&self, q: &Quadrant<D>, t: TreeId, f: usize) -> Option<(Quadrant<D>, TreeId)> {
    let n = q.face_neighbor(f);
    if n.is_inside_root() {
      return Some((n, t));
    }
    self
      .face_transform(t, f)
      .map(|(nt, ft)| (ft.transform(&n), nt))
  }

  /// All same-size neighbors of `q` across edge `e`, in their own trees.
  pub fn edge_neighbor_extra(&self, q: &Quadrant<D>, t: TreeId, e: usize) -> Neighbors<D> {
    let mut out = Neighbors::new();
    let n = q.edge_neighbor(e);
    match n.outside_axes() {
      0 => out.push((n, t)),
      1 => {
        if let Some(hit) = self.across_outside_face(&n, t) {
          out.push(hit);
        }
      }
      _ => {
        for et in self.edge_transforms(t, e) {
          out.push((et.transform(&n, e), et.tree));
        }
      }
    }
    out
  }

  /// All same-size neighbors of `q` across corner `c`, in their own trees.
  pub fn corner_neighbor_extra(&self, q: &Quadrant<D>, t: TreeId, c: usize) -> Neighbors<D> {
    let mut out = Neighbors::new();
    let n = q.corner_neighbor(c);
    let outside = n.outside_axes();
    if outside == 0 {
      out.push((n, t));
    } else if outside == 1 {
      if let Some(hit) = self.across_outside_face(&n, t) {
        out.push(hit);
      }
    } else if outside < D::DIM {
      // Two of three axes outside: the corner sits on an edge of the root.
      let root = D::root_len();
      let axis = (0..D::DIM)
        .find(|&a| (0..root).contains(&n.coords[a]))
        .unwrap_or(0);
      let (perp, _) = tangential_axes::<D>(axis);
      let mut e = 4 * axis;
      for (k, &a) in perp.iter().enumerate() {
        if n.coords[a] >= root {
          e |= 1 << k;
        }
      }
      for et in self.edge_transforms(t, e) {
        out.push((et.transform(&n, e), et.tree));
      }
    } else {
      for ct in self.corner_transforms(t, c) {
        out.push((ct.transform(&n), ct.tree));
      }
    }
    out
  }

  /// Transform a quadrant lying outside the root along exactly one axis.
  fn across_outside_face(&self, n: &Quadrant<D>, t: TreeId) -> Option<(Quadrant<D>, TreeId)> {
    let root = D::root_len();
    let axis = (0..D::DIM).find(|&a| !(0..root).contains(&n.coords[a]))?;
    let f = 2 * axis + usize::from(n.coords[axis] >= root);
    self
      .face_transform(t, f)
      .map(|(nt, ft)| (ft.transform(n), nt))
  }
}

fn check_len(table: &'static str, expected: usize, found: usize) -> Result<(), ForestError> {
  if expected == found {
    Ok(())
  } else {
    Err(ForestError::TableSize { table, expected, found })
  }
}
