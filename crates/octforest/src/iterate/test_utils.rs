//! Test utilities for traversal tests.
//!
//! Provides a visitor that records every callback as owned data, plus
//! forest fixtures. Records identify quadrants by tree and position so runs
//! over different rank views can be compared with a serial run.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{CornerInfo, EdgeInfo, FaceInfo, Origin, QuadRef, SideQuads, VolumeInfo, Visitor, Visits};
use crate::connectivity::{BrickConfig, Connectivity, EdgeLink, TreeId};
use crate::dim::{Dim, D2, D3};
use crate::forest::Forest;
use crate::quadrant::Quadrant;

/// Tree, anchor and level of a quadrant.
pub type QuadKey = (TreeId, [i32; 3], u8);

/// Per side: tree, entity number, hanging flag and quadrants.
pub type Geometry = Vec<(TreeId, u8, bool, Vec<Option<QuadKey>>)>;

/// Position of an entity in the lowest-numbered tree that sees it: tree,
/// axis, lowest corner point and the level of the region it bounds.
pub type EntityKey = (TreeId, usize, [i32; 3], u8);

pub fn quad_key<D: Dim>(tree: TreeId, q: &Quadrant<D>) -> QuadKey {
  (tree, q.coords, q.level)
}

/// Corner `c` of `q` in tree coordinates.
pub fn corner_point<D: Dim>(q: &Quadrant<D>, c: usize) -> [i32; 3] {
  let mut p = q.coords;
  for (axis, coord) in p.iter_mut().enumerate().take(D::DIM) {
    if c & (1 << axis) != 0 {
      *coord += q.len();
    }
  }
  p
}

// =============================================================================
// Owned records
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotRecord {
  pub key: QuadKey,
  pub origin: Origin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideRecord {
  pub tree: TreeId,
  /// Face, edge or corner number on this side.
  pub entity: u8,
  pub orientation: u8,
  pub hanging: bool,
  pub slots: Vec<Option<SlotRecord>>,
}

impl SideRecord {
  pub fn present(&self) -> usize {
    self.slots.iter().flatten().count()
  }

  /// Same record with every origin forgotten.
  fn without_origin(&self) -> Vec<Option<QuadKey>> {
    self.slots.iter().map(|s| s.as_ref().map(|s| s.key)).collect()
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityRecord {
  pub orientation: u8,
  pub sides: Vec<SideRecord>,
}

impl EntityRecord {
  pub fn has_local(&self) -> bool {
    self
      .sides
      .iter()
      .flat_map(|s| s.slots.iter().flatten())
      .any(|s| s.origin == Origin::Local)
  }

  pub fn is_hanging(&self) -> bool {
    self.sides.iter().any(|s| s.hanging)
  }

  pub fn geometry(&self) -> Geometry {
    self
      .sides
      .iter()
      .map(|s| (s.tree, s.entity, s.hanging, s.without_origin()))
      .collect()
  }
}

fn slot<D: Dim>(tree: TreeId, q: &Option<QuadRef<'_, D>>) -> Option<SlotRecord> {
  q.as_ref().map(|q| SlotRecord {
    key: quad_key(tree, q.quad),
    origin: q.origin,
  })
}

fn side_record<D: Dim>(tree: TreeId, entity: u8, orientation: u8, quads: &SideQuads<'_, D>) -> SideRecord {
  match quads {
    SideQuads::Full(q) => SideRecord {
      tree,
      entity,
      orientation,
      hanging: false,
      slots: vec![slot(tree, q)],
    },
    SideQuads::Hanging(qs) => SideRecord {
      tree,
      entity,
      orientation,
      hanging: true,
      slots: qs.iter().map(|q| slot(tree, q)).collect(),
    },
  }
}

/// Smallest position of the entity over every side with a quadrant.
///
/// `locate` maps a side to the entity's axis and the corner of the side's
/// region where the entity starts.
fn entity_key<D: Dim>(sides: &[SideRecord], locate: impl Fn(&SideRecord) -> (usize, usize)) -> EntityKey {
  sides
    .iter()
    .filter_map(|s| {
      let (tree, coords, level) = s.slots.iter().flatten().next()?.key;
      let mut q = Quadrant::<D>::new(coords, level);
      if s.hanging {
        q = q.parent();
      }
      let (axis, corner) = locate(s);
      Some((tree, axis, corner_point(&q, corner), q.level))
    })
    .min()
    .unwrap_or_default()
}

// =============================================================================
// Recording visitor
// =============================================================================

/// Visitor storing every callback.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
  pub visits: Visits,
  pub volumes: Vec<(TreeId, usize, QuadKey)>,
  pub faces: Vec<EntityRecord>,
  pub edges: Vec<EntityRecord>,
  pub corners: Vec<EntityRecord>,
}

impl Recorder {
  pub fn new(visits: Visits) -> Self {
    Self {
      visits,
      ..Default::default()
    }
  }

  pub fn all() -> Self {
    Self::new(Visits::ALL)
  }

  /// Corners by point; the level is meaningless and zeroed.
  pub fn corner_keys<D: Dim>(&self) -> Vec<EntityKey> {
    self
      .corners
      .iter()
      .map(|r| {
        let (tree, _, point, _) = entity_key::<D>(&r.sides, |s| (0, s.entity as usize));
        (tree, 0, point, 0)
      })
      .collect()
  }

  pub fn face_keys<D: Dim>(&self) -> Vec<EntityKey> {
    self
      .faces
      .iter()
      .map(|r| {
        entity_key::<D>(&r.sides, |s| {
          let f = s.entity as usize;
          (f / 2, D::face_corners(f)[0] as usize)
        })
      })
      .collect()
  }

  pub fn edge_keys<D: Dim>(&self) -> Vec<EntityKey> {
    self
      .edges
      .iter()
      .map(|r| {
        entity_key::<D>(&r.sides, |s| {
          let e = s.entity as usize;
          (e / 4, D::edge_corners(e)[0] as usize)
        })
      })
      .collect()
  }

  /// Corners by position, with origins dropped.
  pub fn corner_map<D: Dim>(&self) -> BTreeMap<EntityKey, Geometry> {
    self
      .corner_keys::<D>()
      .into_iter()
      .zip(self.corners.iter().map(EntityRecord::geometry))
      .collect()
  }

  pub fn face_map<D: Dim>(&self) -> BTreeMap<EntityKey, Geometry> {
    self
      .face_keys::<D>()
      .into_iter()
      .zip(self.faces.iter().map(EntityRecord::geometry))
      .collect()
  }

  pub fn edge_map<D: Dim>(&self) -> BTreeMap<EntityKey, Geometry> {
    self
      .edge_keys::<D>()
      .into_iter()
      .zip(self.edges.iter().map(EntityRecord::geometry))
      .collect()
  }
}

impl<D: Dim> Visitor<D> for Recorder {
  fn visits(&self) -> Visits {
    self.visits
  }

  fn volume(&mut self, info: &VolumeInfo<'_, D>) {
    self.volumes.push((info.tree, info.index, quad_key(info.tree, info.quad)));
  }

  fn face(&mut self, info: &FaceInfo<'_, D>) {
    self.faces.push(EntityRecord {
      orientation: info.orientation,
      sides: info
        .sides
        .iter()
        .map(|s| side_record(s.tree, s.face, 0, &s.quads))
        .collect(),
    });
  }

  fn edge(&mut self, info: &EdgeInfo<'_, D>) {
    self.edges.push(EntityRecord {
      orientation: 0,
      sides: info
        .sides
        .iter()
        .map(|s| side_record(s.tree, s.edge, s.orientation, &s.quads))
        .collect(),
    });
  }

  fn corner(&mut self, info: &CornerInfo<'_, D>) {
    self.corners.push(EntityRecord {
      orientation: 0,
      sides: info
        .sides
        .iter()
        .map(|s| SideRecord {
          tree: s.tree,
          entity: s.corner,
          orientation: 0,
          hanging: false,
          slots: vec![slot(s.tree, &s.quad)],
        })
        .collect(),
    });
  }
}

// =============================================================================
// Forest fixtures
// =============================================================================

pub fn unit<D: Dim>() -> Arc<Connectivity<D>> {
  Arc::new(Connectivity::unit())
}

pub fn brick<D: Dim>(dims: [usize; 3]) -> Arc<Connectivity<D>> {
  Arc::new(Connectivity::brick(&BrickConfig::new(dims)).unwrap())
}

pub fn periodic_brick<D: Dim>(dims: [usize; 3]) -> Arc<Connectivity<D>> {
  Arc::new(Connectivity::brick(&BrickConfig::new(dims).with_periodic([true; 3])).unwrap())
}

/// Two 2D trees side by side, the second one upside down.
pub fn rotated_pair() -> Arc<Connectivity<D2>> {
  let tree_to_tree = vec![0, 1, 0, 0, 0, 1, 1, 1];
  let tree_to_face = vec![0, 4, 2, 3, 5, 1, 2, 3];
  Arc::new(Connectivity::from_tables(2, tree_to_tree, tree_to_face, vec![], vec![]).unwrap())
}

/// Two 3D trees, face 1 of tree 0 glued to face `nface` of tree 1 with
/// the given orientation. Every other face is a boundary.
pub fn face_glued_pair(nface: usize, orientation: usize) -> Arc<Connectivity<D3>> {
  let mut tree_to_tree = vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
  let mut tree_to_face = vec![0, 1, 2, 3, 4, 5, 0, 1, 2, 3, 4, 5];
  tree_to_tree[1] = 1;
  tree_to_face[1] = (nface + 6 * orientation) as u8;
  tree_to_tree[6 + nface] = 0;
  tree_to_face[6 + nface] = (1 + 6 * orientation) as u8;
  Arc::new(Connectivity::from_tables(2, tree_to_tree, tree_to_face, vec![], vec![]).unwrap())
}

/// Two 3D trees touching only along an edge: edge 3 of tree 0 meets edge 0
/// of tree 1 running the other way.
pub fn edge_glued_pair() -> Arc<Connectivity<D3>> {
  let tree_to_tree = vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
  let tree_to_face = vec![0, 1, 2, 3, 4, 5, 0, 1, 2, 3, 4, 5];
  let edges = vec![vec![
    EdgeLink { tree: 0, edge: 3, flip: 0 },
    EdgeLink { tree: 1, edge: 0, flip: 1 },
  ]];
  Arc::new(Connectivity::from_tables(2, tree_to_tree, tree_to_face, edges, vec![]).unwrap())
}

/// Uniform forest at `level` with the first child of tree 0 refined once
/// more.
pub fn refined_corner<D: Dim>(conn: Arc<Connectivity<D>>, level: u8) -> Forest<D> {
  let mut forest = Forest::uniform(conn, level);
  let target = Quadrant::<D>::root().first_descendant(level);
  forest.refine(|t, q| t == 0 && *q == target);
  forest
}

/// Run a full traversal of a serial forest.
pub fn record_all<D: Dim>(forest: &Forest<D>) -> Recorder {
  let mut rec = Recorder::all();
  super::iterate(forest, None, &mut rec);
  rec
}

/// Number of distinct keys.
pub fn distinct(keys: &[EntityKey]) -> usize {
  let mut keys = keys.to_vec();
  keys.sort();
  keys.dedup();
  keys.len()
}
