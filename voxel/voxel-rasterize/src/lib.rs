//! Triangle mesh to sparse voxel grid rasterization.
//!
//! The rasterizer converts a solid, consistently wound triangle mesh into
//! the set of voxels whose centers lie inside the solid. The work is
//! decomposed per Z slice:
//!
//! 1. Intersect every triangle with the slice plane, yielding segment
//!    endpoints per triangle.
//! 2. Rasterize each segment into shell voxels with Bresenham's line
//!    algorithm, recording which triangles touch each voxel.
//! 3. Scanline-fill the interior, driven by a parity rule over the
//!    recorded triangle normals rather than ray casting.
//!
//! Slices are independent and processed in parallel; each worker returns
//! a local key list that the driver merges, so no shared mutable map is
//! needed.
//!
//! # Example
//!
//! ```
//! use voxel_types::{unit_cube, Point3, VoxelGrid, VoxelKey};
//! use voxel_rasterize::voxelize;
//!
//! let grid = VoxelGrid::new(1, 1, 1, Point3::new(-1.0, -1.0, -1.0), 2.0).unwrap();
//! let voxels = voxelize(&unit_cube(), &grid).unwrap();
//! assert!(voxels.contains(VoxelKey::new(0, 0, 0)));
//! assert_eq!(voxels.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bresenham;
mod error;
mod slice;
mod voxelize;

pub use error::{RasterError, RasterResult};
pub use voxelize::{voxelize, voxelize_cancellable, voxelize_slice};
