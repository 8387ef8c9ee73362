//! Voxelization drivers.

use rayon::prelude::*;
use tracing::{debug, info};
use voxel_types::{CancelToken, OccupancySet, TriMesh, VoxelGrid};

use crate::slice::rasterize_slice;
use crate::{RasterError, RasterResult};

/// Voxelize a mesh into the subregion described by `grid`.
///
/// Produces the set of voxel keys whose centers lie inside the solid
/// bounded by `mesh`. The mesh must be consistently wound with outward
/// normals; the inside/outside decision reads the first vertex normal of
/// each triangle crossing a scanline.
///
/// Slices are processed in parallel and merged on the calling thread.
///
/// # Errors
///
/// Returns [`RasterError::Grid`] when any grid dimension is zero.
///
/// # Example
///
/// ```
/// use voxel_types::{unit_cube, Point3, VoxelGrid};
/// use voxel_rasterize::voxelize;
///
/// let grid = VoxelGrid::new(2, 2, 2, Point3::new(-1.0, -1.0, -1.0), 2.0).unwrap();
/// let voxels = voxelize(&unit_cube(), &grid).unwrap();
/// assert_eq!(voxels.len(), 8);
/// ```
pub fn voxelize(mesh: &TriMesh, grid: &VoxelGrid) -> RasterResult<OccupancySet> {
    voxelize_cancellable(mesh, grid, &CancelToken::new())
}

/// Voxelize a mesh, polling a cancellation token between slices.
///
/// # Errors
///
/// Returns [`RasterError::Grid`] for an invalid grid and
/// [`RasterError::Cancelled`] when the token fires; partial output is
/// discarded.
pub fn voxelize_cancellable(
    mesh: &TriMesh,
    grid: &VoxelGrid,
    cancel: &CancelToken,
) -> RasterResult<OccupancySet> {
    grid.validate()?;

    info!(
        nx = grid.nx,
        ny = grid.ny,
        nz = grid.nz,
        triangles = mesh.len(),
        "voxelizing mesh"
    );

    let slices: Vec<_> = (0..grid.nz)
        .into_par_iter()
        .map(|zi| {
            if cancel.is_cancelled() {
                return Err(RasterError::Cancelled);
            }
            Ok(rasterize_slice(mesh, grid, zi))
        })
        .collect::<RasterResult<_>>()?;

    let total: usize = slices.iter().map(Vec::len).sum();
    let mut voxels = OccupancySet::with_capacity(total);
    for keys in slices {
        for key in keys {
            voxels.insert(key);
        }
    }

    debug!(voxels = voxels.len(), "voxelization complete");
    Ok(voxels)
}

/// Voxelize a single Z slice of the grid.
///
/// This is the partial API for distributed fan-out: each worker
/// rasterizes one slice and the caller stitches the resulting sets.
///
/// # Errors
///
/// Returns [`RasterError::Grid`] for an invalid grid and
/// [`RasterError::SliceOutOfRange`] when `zi >= grid.nz`.
pub fn voxelize_slice(mesh: &TriMesh, grid: &VoxelGrid, zi: u32) -> RasterResult<OccupancySet> {
    grid.validate()?;
    if zi >= grid.nz {
        return Err(RasterError::SliceOutOfRange { zi, nz: grid.nz });
    }

    debug!(slice = zi, triangles = mesh.len(), "voxelizing single slice");
    let mut voxels = OccupancySet::new();
    for key in rasterize_slice(mesh, grid, zi) {
        voxels.insert(key);
    }
    Ok(voxels)
}
