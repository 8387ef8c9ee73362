//! Watertight mesh reconstruction from sparse voxel grids.
//!
//! A naive one-cube-per-voxel mesh leaks at shared edges and corners
//! when neighboring cubes meet diagonally. This crate instead meshes the
//! **dual cells** of the voxel lattice: every occupied voxel marks the
//! eight cells it corners, each cell accumulates an 8-bit configuration,
//! and a 256-entry dispatch table maps configurations to transformed
//! template patches. The result is a closed, consistently wound surface
//! even for single-voxel features.
//!
//! The dispatch table is generated at first use from a small set of
//! canonical patches pushed through the cube's 48 symmetries (24
//! rotations plus mirrors), with complements reusing the same patches
//! with reversed winding. A unit test asserts the table covers all 254
//! non-trivial configurations.
//!
//! # Example
//!
//! ```
//! use voxel_types::{OccupancySet, Point3, VoxelGrid, VoxelKey};
//! use voxel_manifold::manifold_mesh;
//!
//! let grid = VoxelGrid::new(2, 2, 2, Point3::origin(), 2.0).unwrap();
//! let voxels: OccupancySet = [VoxelKey::new(0, 0, 0), VoxelKey::new(1, 0, 0)]
//!     .into_iter()
//!     .collect();
//! let mesh = manifold_mesh(&voxels, &grid);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod mesher;
mod table;
mod templates;
mod transform;

pub use error::{ManifoldError, ManifoldResult};
pub use mesher::{manifold_mesh, try_manifold_mesh};
