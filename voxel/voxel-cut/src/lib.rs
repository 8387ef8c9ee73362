//! Boolean subtraction of voxel models.
//!
//! The cut operation is a keyed set difference: every base voxel whose
//! position is covered by a cut voxel is removed. The two models may
//! carry different translations on the same lattice; indices are
//! reconciled from the translations before lookup. Colors are not
//! blended; a cut voxel removes a base voxel outright.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use voxel_types::{OccupancySet, VoxelGrid, VoxelKey, VoxelModel};
//! use voxel_cut::cut;
//!
//! let grid = VoxelGrid::new(2, 2, 2, Point3::origin(), 2.0).unwrap();
//! let base: OccupancySet = [VoxelKey::new(0, 0, 0), VoxelKey::new(1, 0, 0)]
//!     .into_iter()
//!     .collect();
//! let knife: OccupancySet = [VoxelKey::new(1, 0, 0)].into_iter().collect();
//!
//! let result = cut(
//!     &VoxelModel::new(grid.clone(), base),
//!     &VoxelModel::new(grid, knife),
//! )
//! .unwrap();
//! assert_eq!(result.sorted_keys(), vec![VoxelKey::new(0, 0, 0)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;

pub use error::{CutError, CutResult};

use tracing::debug;
use voxel_types::{OccupancySet, VoxelModel};

/// Subtract the cut model's voxels from the base model.
///
/// An empty cut returns the base unchanged; cutting a model from itself
/// leaves nothing.
///
/// # Errors
///
/// Returns [`CutError::EmptyBase`] when the base has no voxels but the
/// cut does.
pub fn cut(base: &VoxelModel, cutter: &VoxelModel) -> CutResult<OccupancySet> {
    if cutter.voxels.is_empty() {
        return Ok(base.voxels.clone());
    }
    if base.voxels.is_empty() {
        return Err(CutError::EmptyBase);
    }

    // Map base indices into the cutter's frame through the translations.
    let vpmm = base.grid.voxels_per_mm();
    #[allow(clippy::cast_possible_truncation)]
    let delta = |a: f64, b: f64| ((a - b) * vpmm).round() as i32;
    let dx = delta(base.grid.translation.x, cutter.grid.translation.x);
    let dy = delta(base.grid.translation.y, cutter.grid.translation.y);
    let dz = delta(base.grid.translation.z, cutter.grid.translation.z);
    debug!(dx, dy, dz, "translating cut voxels into base frame");

    let mut out = OccupancySet::with_capacity(base.voxels.len());
    for (key, color) in base.voxels.iter() {
        if cutter.voxels.contains(key.offset(dx, dy, dz)) {
            continue;
        }
        match color {
            Some(c) => out.insert_color(key, c),
            None => out.insert(key),
        }
    }

    debug!(kept = out.len(), removed = base.voxels.len() - out.len(), "cut complete");
    Ok(out)
}

/// Fold several cut models over a base in order.
///
/// # Errors
///
/// Propagates the first [`CutError`] encountered.
pub fn cut_all(base: &VoxelModel, cutters: &[VoxelModel]) -> CutResult<OccupancySet> {
    let mut current = base.clone();
    for cutter in cutters {
        current.voxels = cut(&current, cutter)?;
    }
    Ok(current.voxels)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use voxel_types::{VoxelGrid, VoxelKey};

    fn grid(t: (f64, f64, f64)) -> VoxelGrid {
        VoxelGrid::new(2, 2, 2, Point3::new(t.0, t.1, t.2), 2.0).unwrap()
    }

    fn model(t: (f64, f64, f64), keys: &[(i32, i32, i32)]) -> VoxelModel {
        let voxels: OccupancySet = keys
            .iter()
            .map(|&(x, y, z)| VoxelKey::new(x, y, z))
            .collect();
        VoxelModel::new(grid(t), voxels)
    }

    #[test]
    fn empty_cut_is_identity() {
        let base = model((0.0, 0.0, 0.0), &[(0, 0, 0), (1, 1, 1)]);
        let empty = model((0.0, 0.0, 0.0), &[]);
        let result = cut(&base, &empty).unwrap();
        assert_eq!(result.sorted_keys(), base.voxels.sorted_keys());
    }

    #[test]
    fn self_cut_is_empty() {
        let base = model((0.0, 0.0, 0.0), &[(0, 0, 0), (1, 0, 0), (1, 1, 1)]);
        let result = cut(&base, &base).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn empty_base_is_rejected() {
        let base = model((0.0, 0.0, 0.0), &[]);
        let knife = model((0.0, 0.0, 0.0), &[(0, 0, 0)]);
        assert!(matches!(cut(&base, &knife), Err(CutError::EmptyBase)));
    }

    #[test]
    fn translated_cut_removes_the_overlap() {
        // base occupies [0,2)^3 in voxel units at origin; the cutter's
        // grid starts one voxel higher on every axis
        let base = model((0.0, 0.0, 0.0), &[(0, 0, 0), (1, 1, 1)]);
        let knife = model((1.0, 1.0, 1.0), &[(0, 0, 0)]);
        let result = cut(&base, &knife).unwrap();
        // the cutter voxel lands on base (1,1,1)
        assert_eq!(result.sorted_keys(), vec![VoxelKey::new(0, 0, 0)]);
    }

    #[test]
    fn colors_survive_a_cut() {
        use voxel_types::VoxelColor;

        let mut voxels = OccupancySet::new();
        voxels.insert_color(VoxelKey::new(0, 0, 0), VoxelColor::new(9, 9, 9, 255));
        voxels.insert(VoxelKey::new(1, 0, 0));
        let base = VoxelModel::new(grid((0.0, 0.0, 0.0)), voxels);
        let knife = model((0.0, 0.0, 0.0), &[(1, 0, 0)]);

        let result = cut(&base, &knife).unwrap();
        assert_eq!(
            result.get(VoxelKey::new(0, 0, 0)),
            Some(Some(VoxelColor::new(9, 9, 9, 255)))
        );
        assert!(!result.contains(VoxelKey::new(1, 0, 0)));
    }

    #[test]
    fn cut_all_folds_in_order() {
        let base = model((0.0, 0.0, 0.0), &[(0, 0, 0), (1, 0, 0), (0, 1, 0)]);
        let knives = vec![
            model((0.0, 0.0, 0.0), &[(1, 0, 0)]),
            model((0.0, 0.0, 0.0), &[(0, 1, 0)]),
        ];
        let result = cut_all(&base, &knives).unwrap();
        assert_eq!(result.sorted_keys(), vec![VoxelKey::new(0, 0, 0)]);
    }
}
