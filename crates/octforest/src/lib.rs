//! octforest - Traversal of distributed adaptive quadtree and octree forests
//!
//! A forest is a set of trees glued along faces, edges and corners by a
//! [`Connectivity`]. Each tree is refined adaptively into quadrants (2D) or
//! octants (3D) stored as a sorted sequence of leaves; a rank owns a
//! contiguous slice of the global leaf order and sees its remote neighbors
//! through a [`GhostLayer`].
//!
//! # Features
//!
//! - **Topology iteration**: [`iterate`] visits every volume, face, edge and
//!   corner touching the local partition exactly once, with every quadrant
//!   on every side, including half-size neighbors across hanging entities
//! - **Inter-tree transforms**: rotated and periodic tree connections
//! - **Hanging codes**: per-quadrant bit codes for node numbering
//!   ([`lnodes`])
//! - **Rank batches**: independent per-rank traversals run in parallel
//!   with rayon ([`iterate_ranks`])
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use octforest::{iterate, Connectivity, FaceInfo, Forest, Visitor, Visits, D3};
//!
//! struct CountFaces(usize);
//!
//! impl Visitor<D3> for CountFaces {
//!   fn visits(&self) -> Visits {
//!     Visits::NONE.with_face()
//!   }
//!
//!   fn face(&mut self, _info: &FaceInfo<'_, D3>) {
//!     self.0 += 1;
//!   }
//! }
//!
//! let forest = Forest::<D3>::uniform(Arc::new(Connectivity::unit()), 2);
//! let mut count = CountFaces(0);
//! iterate(&forest, None, &mut count);
//! assert_eq!(count.0, 240);
//! ```

pub mod connectivity;
pub mod dim;
pub mod error;
pub mod forest;
pub mod quadrant;
pub mod tables;

pub use connectivity::{BrickConfig, Connectivity, TreeId};
pub use dim::{Dim, D2, D3};
pub use error::ForestError;
pub use forest::{Forest, GhostLayer, GhostOwner, Tree};
pub use quadrant::Quadrant;

// Topology iteration
pub mod iterate;
pub use iterate::{
  iterate, iterate_ranks, CornerInfo, EdgeInfo, FaceInfo, QuadRef, RankRun, SideQuads, Visitor, Visits, VolumeInfo,
};

// Hanging codes for node numbering
pub mod lnodes;
