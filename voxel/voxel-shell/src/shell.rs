//! The V-Shell representation.

use voxel_types::{VoxelGrid, VoxelKey, VoxelModel};

use crate::{NeighborMask, ShellResult};

/// One boundary voxel of a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellVoxel {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: i32,
    /// Which of the 26 surrounding positions are occupied.
    pub neighbors: NeighborMask,
}

impl ShellVoxel {
    /// Create a shell voxel.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32, neighbors: NeighborMask) -> Self {
        Self { x, y, z, neighbors }
    }

    /// The voxel's key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> VoxelKey {
        VoxelKey::new(self.x, self.y, self.z)
    }
}

/// A boundary-only voxel model.
///
/// Where a full occupancy set stores every voxel of a solid, a shell
/// stores only the voxels exposed on the surface, each with a
/// [`NeighborMask`] recording which of its 26 neighbors exist. Memory is
/// O(surface) instead of O(volume), and the mask approximates a surface
/// normal for shading. Interior voxels (complete masks) are never
/// stored.
///
/// Shells are built incrementally by [`VShell::merge`], one diced
/// subregion at a time.
///
/// # Example
///
/// ```
/// use voxel_types::{OccupancySet, Point3, VoxelGrid, VoxelKey, VoxelModel};
/// use voxel_shell::VShell;
///
/// let grid = VoxelGrid::new(1, 1, 1, Point3::origin(), 1.0).unwrap();
/// let voxels: OccupancySet = [VoxelKey::new(0, 0, 0)].into_iter().collect();
/// let shell = VShell::from_model(&VoxelModel::new(grid, voxels)).unwrap();
/// assert_eq!(shell.voxels.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct VShell {
    /// Grid descriptor; dimensions grow as regions are merged.
    pub grid: VoxelGrid,
    /// The boundary voxels, in merge order.
    pub voxels: Vec<ShellVoxel>,
}

impl VShell {
    /// Create an empty shell over a grid.
    #[inline]
    #[must_use]
    pub const fn new(grid: VoxelGrid) -> Self {
        Self {
            grid,
            voxels: Vec::new(),
        }
    }

    /// Build a shell from a voxel model.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ShellError`] from the initial merge.
    pub fn from_model(model: &VoxelModel) -> ShellResult<Self> {
        let mut shell = Self::new(model.grid.clone());
        if !model.voxels.is_empty() {
            shell.merge(model)?;
        }
        Ok(shell)
    }

    /// Number of stored boundary voxels.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// True when the shell stores no voxels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Voxels sorted by `(z, y, x)`, for deterministic comparisons.
    #[must_use]
    pub fn sorted_voxels(&self) -> Vec<ShellVoxel> {
        let mut v = self.voxels.clone();
        v.sort_by_key(|s| (s.z, s.y, s.x));
        v
    }
}
