//! Builders for common connectivities.

use std::collections::HashMap;

use super::{Connectivity, CornerLink, EdgeLink, TreeId};
use crate::dim::Dim;
use crate::error::ForestError;

/// Lattice of trees, optionally periodic along each axis.
///
/// Trees are numbered with x varying fastest. In 2D the z entries are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrickConfig {
  pub dims: [usize; 3],
  pub periodic: [bool; 3],
}

impl Default for BrickConfig {
  fn default() -> Self {
    Self {
      dims: [1, 1, 1],
      periodic: [false; 3],
    }
  }
}

impl BrickConfig {
  pub fn new(dims: [usize; 3]) -> Self {
    Self {
      dims,
      ..Default::default()
    }
  }

  pub fn with_periodic(mut self, periodic: [bool; 3]) -> Self {
    self.periodic = periodic;
    self
  }
}

impl<D: Dim> Connectivity<D> {
  /// A single tree with every face on the boundary.
  pub fn unit() -> Self {
    Self {
      num_trees: 1,
      tree_to_tree: vec![0; D::FACES],
      tree_to_face: (0..D::FACES as u8).collect(),
      tree_to_edge: vec![None; D::EDGES],
      edge_lists: Vec::new(),
      tree_to_corner: vec![None; D::CHILDREN],
      corner_lists: Vec::new(),
      _dim: Default::default(),
    }
  }

  pub fn brick(config: &BrickConfig) -> Result<Self, ForestError> {
    let mut dims = config.dims;
    let mut periodic = config.periodic;
    if D::DIM == 2 {
      dims[2] = 1;
      periodic[2] = false;
    }
    if let Some(axis) = dims.iter().position(|&d| d == 0) {
      return Err(ForestError::EmptyBrick { axis });
    }

    let num_trees = dims.iter().product::<usize>();
    let index = |p: [usize; 3]| p[0] + dims[0] * (p[1] + dims[1] * p[2]);
    let position = |t: TreeId| [t % dims[0], (t / dims[0]) % dims[1], t / (dims[0] * dims[1])];
    // Vertex of the lattice, wrapped on periodic axes.
    let vertex = |p: [usize; 3], corner: usize| {
      let mut v = [0usize; 3];
      for axis in 0..3 {
        v[axis] = p[axis] + ((corner >> axis) & 1);
        if periodic[axis] {
          v[axis] %= dims[axis];
        }
      }
      v
    };

    let mut tree_to_tree = Vec::with_capacity(num_trees * D::FACES);
    let mut tree_to_face = Vec::with_capacity(num_trees * D::FACES);
    for t in 0..num_trees {
      let p = position(t);
      for f in 0..D::FACES {
        let axis = f / 2;
        let mut np = p;
        let neighbor = if f % 2 == 1 {
          if p[axis] + 1 < dims[axis] {
            Some(p[axis] + 1)
          } else {
            periodic[axis].then_some(0)
          }
        } else if p[axis] > 0 {
          Some(p[axis] - 1)
        } else {
          periodic[axis].then_some(dims[axis] - 1)
        };
        match neighbor {
          Some(n) => {
            np[axis] = n;
            tree_to_tree.push(index(np));
            tree_to_face.push((f ^ 1) as u8);
          }
          None => {
            tree_to_tree.push(t);
            tree_to_face.push(f as u8);
          }
        }
      }
    }

    let mut edge_lists: Vec<Vec<EdgeLink>> = Vec::new();
    let mut edge_ids: HashMap<(usize, [usize; 3]), usize> = HashMap::new();
    for t in 0..num_trees {
      let p = position(t);
      for e in 0..D::EDGES {
        let low = D::edge_corners(e)[0] as usize;
        let key = (e / 4, vertex(p, low));
        let id = *edge_ids.entry(key).or_insert_with(|| {
          edge_lists.push(Vec::new());
          edge_lists.len() - 1
        });
        edge_lists[id].push(EdgeLink { tree: t, edge: e as u8, flip: 0 });
      }
    }

    let mut corner_lists: Vec<Vec<CornerLink>> = Vec::new();
    let mut corner_ids: HashMap<[usize; 3], usize> = HashMap::new();
    for t in 0..num_trees {
      let p = position(t);
      for c in 0..D::CHILDREN {
        let id = *corner_ids.entry(vertex(p, c)).or_insert_with(|| {
          corner_lists.push(Vec::new());
          corner_lists.len() - 1
        });
        corner_lists[id].push(CornerLink { tree: t, corner: c as u8 });
      }
    }

    edge_lists.retain(|l| l.len() > 1);
    corner_lists.retain(|l| l.len() > 1);

    Self::from_tables(num_trees, tree_to_tree, tree_to_face, edge_lists, corner_lists)
  }
}

#[cfg(test)]
#[path = "builders_test.rs"]
mod builders_test;
