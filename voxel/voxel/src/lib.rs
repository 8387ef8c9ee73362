//! Voxel dicing toolkit.
//!
//! Converts solid triangle meshes into sparse voxel grids, performs
//! boolean subtraction on those grids, and reconstructs watertight
//! triangle meshes from them. Large models are handled by dicing:
//! subregions are voxelized independently and merged into a
//! boundary-only shell.
//!
//! This umbrella crate re-exports the toolkit:
//!
//! - [`types`] - meshes, grids, occupancy sets, cancellation
//! - [`rasterize`] - mesh to voxels (per-slice scanline rasterization)
//! - [`manifold`] - voxels to watertight mesh (dual-cell templates)
//! - [`shell`] - incremental boundary-shell merging
//! - [`cut`] - boolean subtraction of voxel models
//! - [`io`] - STL, binvox and V-Shell codecs
//!
//! # Quick Start
//!
//! ```no_run
//! use voxel::prelude::*;
//!
//! // Load a mesh and voxelize it
//! let mesh = voxel::io::load_stl("model.stl").unwrap();
//! let bb = mesh.bounding_box();
//! let grid = VoxelGrid::new(64, 64, 64, bb.min, bb.size().max()).unwrap();
//! let voxels = voxelize(&mesh, &grid).unwrap();
//!
//! // Reconstruct a watertight surface and save it
//! let surface = manifold_mesh(&voxels, &grid);
//! voxel::io::save_stl(&surface, "voxelized.stl", true).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Core data types: meshes, grids, occupancy sets, cancellation.
pub use voxel_types as types;

/// Mesh to sparse voxel grid rasterization.
pub use voxel_rasterize as rasterize;

/// Watertight mesh reconstruction from voxel grids.
pub use voxel_manifold as manifold;

/// Boundary-only shells and incremental merging.
pub use voxel_shell as shell;

/// Boolean subtraction of voxel models.
pub use voxel_cut as cut;

/// STL, binvox and V-Shell codecs.
pub use voxel_io as io;

/// Common imports for dicing pipelines.
pub mod prelude {
    pub use voxel_cut::cut;
    pub use voxel_io::{load_binvox, load_stl, save_binvox, save_stl, ReadWindow};
    pub use voxel_manifold::manifold_mesh;
    pub use voxel_rasterize::{voxelize, voxelize_slice};
    pub use voxel_shell::{NeighborMask, VShell};
    pub use voxel_types::{
        unit_cube, Aabb, CancelToken, OccupancySet, Point3, TriMesh, Vector3, VoxelGrid, VoxelKey,
        VoxelModel,
    };
}
