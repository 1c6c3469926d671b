//! Validation errors for forest inputs.
//!
//! Only construction of connectivities, forests and ghost layers reports
//! errors. The traversal itself trusts its input and checks invariants with
//! debug assertions.

use thiserror::Error;

use crate::connectivity::TreeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
  #[error("table `{table}` has {found} entries, expected {expected}")]
  TableSize {
    table: &'static str,
    expected: usize,
    found: usize,
  },

  #[error("tree {tree} is out of range for {num_trees} trees")]
  TreeOutOfRange { tree: TreeId, num_trees: usize },

  #[error("tree {tree} face {face}: invalid face code {code}")]
  FaceCode { tree: TreeId, face: usize, code: u8 },

  #[error("tree {tree} face {face} is not matched by its neighbor")]
  FaceMismatch { tree: TreeId, face: usize },

  #[error("tree {tree}: invalid {entity} entry {index}")]
  EntityIndex {
    tree: TreeId,
    entity: &'static str,
    index: usize,
  },

  #[error("tree {tree} {entity} {index} is listed more than once")]
  DuplicateEntity {
    tree: TreeId,
    entity: &'static str,
    index: usize,
  },

  #[error("brick dimension along axis {axis} must be at least 1")]
  EmptyBrick { axis: usize },

  #[error("tree {tree} quadrant {index} is not a valid quadrant")]
  InvalidQuadrant { tree: TreeId, index: usize },

  #[error("tree {tree} quadrant {index} does not strictly follow its predecessor")]
  QuadrantOrder { tree: TreeId, index: usize },

  #[error("rank {rank} is out of range for {num_ranks} ranks")]
  RankOutOfRange { rank: usize, num_ranks: usize },
}
