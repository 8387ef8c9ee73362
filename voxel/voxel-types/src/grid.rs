//! Voxel grid descriptor.

use nalgebra::Point3;
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, GridError, GridResult, VoxelKey};

/// Dimensions, world translation and uniform scale of a voxel subregion.
///
/// `nx`, `ny` and `nz` are the number of voxels in each dimension.
/// `scale` is the extent in millimeters of the subregion's largest
/// dimension, so with `dim = max(nx, ny, nz)` there are `dim / scale`
/// voxels per millimeter in every direction. Translating the subregion
/// to `translation` places it in world space.
///
/// # Example
///
/// ```
/// use voxel_types::{VoxelGrid, VoxelKey, Point3};
///
/// let grid = VoxelGrid::new(2, 2, 2, Point3::new(-1.0, -1.0, -1.0), 2.0).unwrap();
/// assert!((grid.voxels_per_mm() - 1.0).abs() < 1e-12);
/// let c = grid.voxel_center(VoxelKey::new(0, 0, 0));
/// assert!((c.x - -0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelGrid {
    /// Number of voxels along X.
    pub nx: u32,
    /// Number of voxels along Y.
    pub ny: u32,
    /// Number of voxels along Z.
    pub nz: u32,
    /// Location of the grid origin in world space (millimeters).
    pub translation: Point3<f64>,
    /// Extent of the largest dimension in millimeters.
    pub scale: f64,
}

impl VoxelGrid {
    /// Create a validated grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyDimensions`] when any dimension is zero
    /// and [`GridError::InvalidScale`] when the scale is not positive.
    pub fn new(nx: u32, ny: u32, nz: u32, translation: Point3<f64>, scale: f64) -> GridResult<Self> {
        let grid = Self {
            nx,
            ny,
            nz,
            translation,
            scale,
        };
        grid.validate()?;
        if scale <= 0.0 {
            return Err(GridError::InvalidScale { scale });
        }
        Ok(grid)
    }

    /// Check that all dimensions are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyDimensions`] when any of `nx`, `ny`,
    /// `nz` is zero.
    pub fn validate(&self) -> GridResult<()> {
        if self.nx == 0 || self.ny == 0 || self.nz == 0 {
            return Err(GridError::EmptyDimensions {
                nx: self.nx,
                ny: self.ny,
                nz: self.nz,
            });
        }
        Ok(())
    }

    /// The maximum dimension.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> u32 {
        self.nx.max(self.ny).max(self.nz)
    }

    /// Resolution in voxels per millimeter.
    ///
    /// A non-positive scale is treated as one voxel per millimeter with
    /// a logged warning, matching the convention that scale 0 means the
    /// grid is expressed directly in voxel units.
    #[must_use]
    pub fn voxels_per_mm(&self) -> f64 {
        if self.scale <= 0.0 {
            warn!(scale = self.scale, "non-positive scale, assuming 1 voxel/mm");
            return 1.0;
        }
        f64::from(self.dim()) / self.scale
    }

    /// Voxel edge length in millimeters.
    #[inline]
    #[must_use]
    pub fn mm_per_voxel(&self) -> f64 {
        1.0 / self.voxels_per_mm()
    }

    /// World-space bounding box of the subregion.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let s = self.mm_per_voxel();
        let t = self.translation;
        Aabb::new(
            t,
            Point3::new(
                t.x + s * f64::from(self.nx),
                t.y + s * f64::from(self.ny),
                t.z + s * f64::from(self.nz),
            ),
        )
    }

    /// World-space center of a voxel.
    #[must_use]
    pub fn voxel_center(&self, key: VoxelKey) -> Point3<f64> {
        let s = self.mm_per_voxel();
        Point3::new(
            self.translation.x + (f64::from(key.x) + 0.5) * s,
            self.translation.y + (f64::from(key.y) + 0.5) * s,
            self.translation.z + (f64::from(key.z) + 0.5) * s,
        )
    }

    /// Map a world-space point to the voxel index containing it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // voxel indices fit i32 by construction
    pub fn world_to_voxel(&self, p: &Point3<f64>) -> VoxelKey {
        let vpmm = self.voxels_per_mm();
        VoxelKey::new(
            (vpmm * (p.x - self.translation.x)).floor() as i32,
            (vpmm * (p.y - self.translation.y)).floor() as i32,
            (vpmm * (p.z - self.translation.z)).floor() as i32,
        )
    }

    /// Grow the dimensions so the given index fits, preserving resolution.
    ///
    /// When the growth changes `dim`, the scale is adjusted by the same
    /// ratio so that `voxels_per_mm` is unchanged. This is the single
    /// place the scale/dim coupling is enforced.
    #[allow(clippy::cast_sign_loss)] // negative indices never grow the grid
    pub fn grow_to_include(&mut self, x: i32, y: i32, z: i32) {
        let vpmm = self.voxels_per_mm();
        if x >= 0 {
            self.nx = self.nx.max(x as u32 + 1);
        }
        if y >= 0 {
            self.ny = self.ny.max(y as u32 + 1);
        }
        if z >= 0 {
            self.nz = self.nz.max(z as u32 + 1);
        }
        let new_dim = f64::from(self.dim());
        if (new_dim / vpmm - self.scale).abs() > f64::EPSILON {
            self.scale = new_dim / vpmm;
        }
    }
}
