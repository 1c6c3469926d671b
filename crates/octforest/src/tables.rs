//! Topology tables for quadrants (2D) and octants (3D).
//!
//! Everything is numbered in Z-order: bit `i` of a corner or child id is the
//! coordinate along axis `i`.
//!
//! # Cube Topology
//!
//! ```text
//!       6──────7         Corners (binary ZYX):
//!      /│     /│           0=(0,0,0)  1=(1,0,0)  2=(0,1,0)  3=(1,1,0)
//!     4─┼────5 │           4=(0,0,1)  5=(1,0,1)  6=(0,1,1)  7=(1,1,1)
//!     │ 2────┼─3
//!     │/     │/          +Y
//!     0──────1            │  +Z
//!                         │ /
//!                         └───+X
//! ```
//!
//! # Faces
//!
//! Face `f` has normal axis `f / 2` and sits on the high side of that axis
//! when `f % 2 == 1`: 0 = -X, 1 = +X, 2 = -Y, 3 = +Y, 4 = -Z, 5 = +Z.
//! The corners of a face are listed in ascending order, so the face-corner
//! index uses bit 0 for the lower tangential axis and bit 1 for the higher.
//!
//! # Edges (3D)
//!
//! ```text
//! Edge e runs along axis e / 4. The two low bits of e give the position
//! on the perpendicular axes (lower axis in bit 0):
//!
//!   X edges: 0=(y0,z0)  1=(y1,z0)  2=(y0,z1)  3=(y1,z1)
//!   Y edges: 4=(x0,z0)  5=(x1,z0)  6=(x0,z1)  7=(x1,z1)
//!   Z edges: 8=(x0,y0)  9=(x1,y0) 10=(x0,y1) 11=(x1,y1)
//! ```

// =============================================================================
// 2D
// =============================================================================

/// Corners on each face of a quadrant.
pub const FACE_CORNERS_2D: [[u8; 2]; 4] = [[0, 2], [1, 3], [0, 1], [2, 3]];

/// Faces touching each corner of a quadrant, one per axis.
pub const CORNER_FACES_2D: [[u8; 2]; 4] = [[0, 2], [1, 2], [0, 3], [1, 3]];

/// Face-corner index of corner `c` on face `f`, or -1 when `c` is not on `f`.
pub const CORNER_FACE_CORNERS_2D: [[i8; 4]; 4] = [
  [0, -1, 0, -1],
  [-1, 0, 1, -1],
  [1, -1, -1, 0],
  [-1, 1, -1, 1],
];

// =============================================================================
// 3D
// =============================================================================

/// Corners on each face of an octant.
pub const FACE_CORNERS_3D: [[u8; 4]; 6] = [
  [0, 2, 4, 6],
  [1, 3, 5, 7],
  [0, 1, 4, 5],
  [2, 3, 6, 7],
  [0, 1, 2, 3],
  [4, 5, 6, 7],
];

/// Faces touching each corner of an octant, one per axis.
pub const CORNER_FACES_3D: [[u8; 3]; 8] = [
  [0, 2, 4],
  [1, 2, 4],
  [0, 3, 4],
  [1, 3, 4],
  [0, 2, 5],
  [1, 2, 5],
  [0, 3, 5],
  [1, 3, 5],
];

/// Face-corner index of corner `c` on face `f`, or -1 when `c` is not on `f`.
pub const CORNER_FACE_CORNERS_3D: [[i8; 6]; 8] = [
  [0, -1, 0, -1, 0, -1],
  [-1, 0, 1, -1, 1, -1],
  [1, -1, -1, 0, 2, -1],
  [-1, 1, -1, 1, 3, -1],
  [2, -1, 2, -1, -1, 0],
  [-1, 2, 3, -1, -1, 1],
  [3, -1, -1, 2, -1, 2],
  [-1, 3, -1, 3, -1, 3],
];

/// Edge endpoint corners, low end first.
pub const EDGE_CORNERS_3D: [[u8; 2]; 12] = [
  [0, 1], // Edge 0:  X axis at Y=0, Z=0
  [2, 3], // Edge 1:  X axis at Y=1, Z=0
  [4, 5], // Edge 2:  X axis at Y=0, Z=1
  [6, 7], // Edge 3:  X axis at Y=1, Z=1
  [0, 2], // Edge 4:  Y axis at X=0, Z=0
  [1, 3], // Edge 5:  Y axis at X=1, Z=0
  [4, 6], // Edge 6:  Y axis at X=0, Z=1
  [5, 7], // Edge 7:  Y axis at X=1, Z=1
  [0, 4], // Edge 8:  Z axis at X=0, Y=0
  [1, 5], // Edge 9:  Z axis at X=1, Y=0
  [2, 6], // Edge 10: Z axis at X=0, Y=1
  [3, 7], // Edge 11: Z axis at X=1, Y=1
];

/// The two faces meeting at each edge, lower axis first.
pub const EDGE_FACES_3D: [[u8; 2]; 12] = [
  [2, 4],
  [3, 4],
  [2, 5],
  [3, 5],
  [0, 4],
  [1, 4],
  [0, 5],
  [1, 5],
  [0, 2],
  [1, 2],
  [0, 3],
  [1, 3],
];

/// Edges touching each corner, indexed by edge axis.
pub const CORNER_EDGES_3D: [[u8; 3]; 8] = [
  [0, 4, 8],
  [0, 5, 9],
  [1, 4, 10],
  [1, 5, 11],
  [2, 6, 8],
  [2, 7, 9],
  [3, 6, 10],
  [3, 7, 11],
];

/// Edges on each face: two along the lower tangential axis, then two along
/// the higher one, each pair ordered by the other tangential coordinate.
pub const FACE_EDGES_3D: [[u8; 4]; 6] = [
  [4, 6, 8, 10],
  [5, 7, 9, 11],
  [0, 2, 8, 9],
  [1, 3, 10, 11],
  [0, 1, 4, 5],
  [2, 3, 6, 7],
];

/// Edge joining two corners of an octant, or -1 if they do not share one.
pub const CHILD_CORNER_EDGES_3D: [[i8; 8]; 8] = generate_child_corner_edges();

const fn generate_child_corner_edges() -> [[i8; 8]; 8] {
  let mut table = [[-1i8; 8]; 8];
  let mut edge = 0;

  while edge < 12 {
    let c0 = EDGE_CORNERS_3D[edge][0] as usize;
    let c1 = EDGE_CORNERS_3D[edge][1] as usize;
    table[c0][c1] = edge as i8;
    table[c1][c0] = edge as i8;
    edge += 1;
  }

  table
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tables_test;
