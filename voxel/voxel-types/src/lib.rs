//! Core types for the voxel dicing toolkit.
//!
//! This crate provides the foundational types shared by the rasterizer,
//! the manifold mesher and the shell merger:
//!
//! - [`MeshVertex`], [`MeshTriangle`], [`TriMesh`] - An oriented triangle
//!   soup with per-vertex normals
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`VoxelGrid`] - Dimensions, world translation and scale of a voxel
//!   subregion
//! - [`VoxelKey`], [`OccupancySet`], [`VoxelModel`] - Sparse voxel storage
//! - [`CancelToken`] - Cooperative cancellation for long operations
//!
//! # Units
//!
//! All world-space coordinates are `f64` millimeters. A [`VoxelGrid`]
//! relates integer voxel indices to world space through its translation
//! and `voxels_per_mm` resolution.
//!
//! # Coordinate System
//!
//! Right-handed, Z up. Triangle winding is counter-clockwise when viewed
//! from outside; normals point outward by the right-hand rule. The
//! inside/outside test of the rasterizer depends on this convention.
//!
//! # Example
//!
//! ```
//! use voxel_types::{unit_cube, VoxelGrid, Point3};
//!
//! let cube = unit_cube();
//! assert_eq!(cube.len(), 12);
//!
//! let grid = VoxelGrid::new(2, 2, 2, Point3::new(-1.0, -1.0, -1.0), 2.0).unwrap();
//! assert_eq!(grid.dim(), 2);
//! assert!((grid.voxels_per_mm() - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod cancel;
mod error;
mod grid;
mod mesh;
mod occupancy;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use cancel::CancelToken;
pub use error::{GridError, GridResult};
pub use grid::VoxelGrid;
pub use mesh::{unit_cube, TriMesh};
pub use occupancy::{OccupancySet, VoxelColor, VoxelKey, VoxelModel};
pub use triangle::MeshTriangle;
pub use vertex::MeshVertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
