//! Boundary-only voxel shells.
//!
//! Dicing a large model produces many voxel subregions; holding their
//! union in memory at O(volume) does not scale. A [`VShell`] keeps only
//! the boundary voxels of the union, each tagged with a 27-bit
//! [`NeighborMask`] recording which of its 26 neighbors exist, and
//! merges subregions incrementally: voxels that become fully enclosed
//! are dropped, so memory stays O(surface).
//!
//! # Example
//!
//! ```
//! use voxel_types::{OccupancySet, Point3, VoxelGrid, VoxelKey, VoxelModel};
//! use voxel_shell::VShell;
//!
//! let grid = VoxelGrid::new(2, 2, 2, Point3::origin(), 2.0).unwrap();
//! let voxels: OccupancySet = [VoxelKey::new(0, 0, 0), VoxelKey::new(1, 0, 0)]
//!     .into_iter()
//!     .collect();
//!
//! let shell = VShell::from_model(&VoxelModel::new(grid, voxels)).unwrap();
//! assert_eq!(shell.len(), 2);
//! assert!(shell.voxels.iter().all(|v| !v.neighbors.is_complete()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod mask;
mod merge;
mod shell;

pub use error::{ShellError, ShellResult};
pub use mask::NeighborMask;
pub use shell::{ShellVoxel, VShell};
