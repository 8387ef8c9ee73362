//! Incremental shell merging.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};
use voxel_types::{CancelToken, VoxelGrid, VoxelKey, VoxelModel};

use crate::{NeighborMask, ShellError, ShellResult, ShellVoxel, VShell};

/// How often the cancellation token is polled inside the voxel loop.
const CANCEL_STRIDE: usize = 4096;

impl VShell {
    /// Merge a voxel model into the shell.
    ///
    /// The model's grid may be translated relative to the shell; integer
    /// offsets are reconciled from the translations and the shell is
    /// rebased when the new region extends below the current origin.
    /// Dimensions grow as needed with `voxels_per_mm` preserved.
    ///
    /// New voxels whose 26 neighbors are all occupied are discarded as
    /// interior; existing voxels whose masks complete are pruned. A new
    /// voxel that already exists in the shell merges its neighbor bits
    /// into the stored voxel.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::IncompatibleResolution`] when the model's
    /// voxels-per-millimeter differs from the shell's by one or more in
    /// integer form.
    pub fn merge(&mut self, model: &VoxelModel) -> ShellResult<()> {
        self.merge_cancellable(model, &CancelToken::new())
    }

    /// Merge with a cancellation token polled between stages.
    ///
    /// # Errors
    ///
    /// As [`VShell::merge`], plus [`ShellError::Cancelled`] when the
    /// token fires. Cancellation leaves the shell untouched; results
    /// commit only on success.
    pub fn merge_cancellable(&mut self, model: &VoxelModel, cancel: &CancelToken) -> ShellResult<()> {
        let (grid, voxels) = self.merged(model, cancel)?;
        self.grid = grid;
        self.voxels = voxels;
        Ok(())
    }

    /// Compute the merged state without mutating the shell.
    fn merged(&self, model: &VoxelModel, cancel: &CancelToken) -> ShellResult<(VoxelGrid, Vec<ShellVoxel>)> {
        let mut grid = self.grid.clone();
        let mut voxels = self.voxels.clone();

        info!(
            shell_voxels = voxels.len(),
            new_voxels = model.voxels.len(),
            "merging region into shell"
        );

        // Stage 1: reconcile the model's frame against the shell's.
        let offset = if voxels.is_empty() {
            (0, 0, 0)
        } else {
            reconcile(&mut grid, &mut voxels, &model.grid)?
        };
        if cancel.is_cancelled() {
            return Err(ShellError::Cancelled);
        }

        // Stage 2: build the incoming lookup and grow the dimensions.
        let mut incoming: HashSet<VoxelKey> = HashSet::with_capacity(model.voxels.len());
        for key in model.voxels.keys() {
            let k = key.offset(offset.0, offset.1, offset.2);
            incoming.insert(k);
            grid.grow_to_include(k.x, k.y, k.z);
        }
        if cancel.is_cancelled() {
            return Err(ShellError::Cancelled);
        }
        debug!(nx = grid.nx, ny = grid.ny, nz = grid.nz, "grown shell dimensions");

        // Stage 3: neighbor computation against old and new voxels.
        let old: HashMap<VoxelKey, usize> = voxels
            .iter()
            .enumerate()
            .map(|(i, v)| (v.key(), i))
            .collect();

        let mut to_remove: HashSet<VoxelKey> = HashSet::new();
        let mut added = 0_usize;

        for (processed, &key) in incoming.iter().enumerate() {
            if processed % CANCEL_STRIDE == 0 && cancel.is_cancelled() {
                return Err(ShellError::Cancelled);
            }

            let mut mask = NeighborMask::EMPTY;
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(bit) = NeighborMask::from_offset(dx, dy, dz) else {
                            continue;
                        };
                        let probe = key.offset(dx, dy, dz);
                        if incoming.contains(&probe) {
                            mask |= bit;
                        } else if let Some(&idx) = old.get(&probe) {
                            mask |= bit;
                            // the old voxel gains this voxel as a neighbor
                            // and may have just become interior
                            if let Some(back) = NeighborMask::from_offset(-dx, -dy, -dz) {
                                voxels[idx].neighbors |= back;
                                if voxels[idx].neighbors.is_complete() {
                                    to_remove.insert(probe);
                                }
                            }
                        }
                    }
                }
            }

            if let Some(&idx) = old.get(&key) {
                // duplicate across inputs: absorb the neighbor info
                voxels[idx].neighbors |= mask;
                if voxels[idx].neighbors.is_complete() {
                    to_remove.insert(key);
                }
                continue;
            }
            if mask.is_complete() {
                // fully enclosed, never stored
                continue;
            }
            voxels.push(ShellVoxel::new(key.x, key.y, key.z, mask));
            added += 1;
        }

        // Stage 4: prune old voxels that became interior.
        if !to_remove.is_empty() {
            voxels.retain(|v| !to_remove.contains(&v.key()));
        }

        debug!(added, pruned = to_remove.len(), total = voxels.len(), "merge complete");
        Ok((grid, voxels))
    }
}

/// Reconcile the model's translation against the shell's, rebasing the
/// shell when the model extends below the current origin.
///
/// Offsets are computed from a snapshot of the pre-shift origin, then
/// either applied to incoming voxels (all non-negative) or folded into
/// the stored voxels (any negative component).
fn reconcile(
    grid: &mut VoxelGrid,
    voxels: &mut [ShellVoxel],
    incoming: &VoxelGrid,
) -> ShellResult<(i32, i32, i32)> {
    let vpmm = grid.voxels_per_mm();
    let incoming_vpmm = incoming.voxels_per_mm();
    #[allow(clippy::cast_possible_truncation)]
    if vpmm.trunc() as i64 != incoming_vpmm.trunc() as i64 {
        return Err(ShellError::IncompatibleResolution {
            shell: vpmm,
            model: incoming_vpmm,
        });
    }

    #[allow(clippy::cast_possible_truncation)]
    let delta = |a: f64, b: f64| ((a - b) * vpmm).round() as i32;
    let dx = delta(incoming.translation.x, grid.translation.x);
    let dy = delta(incoming.translation.y, grid.translation.y);
    let dz = delta(incoming.translation.z, grid.translation.z);

    if dx >= 0 && dy >= 0 && dz >= 0 {
        debug!(dx, dy, dz, "shifting incoming voxels into shell frame");
        return Ok((dx, dy, dz));
    }

    // The new region extends below the shell origin: rebase the shell.
    debug!(dx, dy, dz, "rebasing shell onto incoming origin");
    grid.translation = incoming.translation;
    for v in voxels.iter_mut() {
        v.x -= dx;
        v.y -= dy;
        v.z -= dz;
        grid.grow_to_include(v.x, v.y, v.z);
    }
    Ok((0, 0, 0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use voxel_types::OccupancySet;

    fn model(nx: u32, t: (f64, f64, f64), scale: f64, keys: &[(i32, i32, i32)]) -> VoxelModel {
        let grid = VoxelGrid {
            nx,
            ny: nx,
            nz: nx,
            translation: Point3::new(t.0, t.1, t.2),
            scale,
        };
        let voxels: OccupancySet = keys
            .iter()
            .map(|&(x, y, z)| VoxelKey::new(x, y, z))
            .collect();
        VoxelModel::new(grid, voxels)
    }

    fn block(n: i32) -> Vec<(i32, i32, i32)> {
        let mut keys = Vec::new();
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    keys.push((x, y, z));
                }
            }
        }
        keys
    }

    #[test]
    fn empty_model_leaves_shell_empty() {
        let shell = VShell::from_model(&model(1, (0.0, 0.0, 0.0), 1.0, &[])).unwrap();
        assert!(shell.is_empty());
    }

    #[test]
    fn single_voxel_has_empty_mask() {
        let shell = VShell::from_model(&model(1, (0.0, 0.0, 0.0), 1.0, &[(0, 0, 0)])).unwrap();
        assert_eq!(shell.voxels, vec![ShellVoxel::new(0, 0, 0, NeighborMask::EMPTY)]);
    }

    #[test]
    fn mismatched_resolution_is_rejected() {
        let mut shell = VShell::from_model(&model(1, (0.0, 0.0, 0.0), 1.0, &[(0, 0, 0)])).unwrap();
        // 1 voxel over 2 mm = 0.5 voxels/mm vs the shell's 1.0
        let other = model(1, (0.0, 0.0, 0.0), 2.0, &[(0, 0, 0)]);
        assert!(matches!(
            shell.merge(&other),
            Err(ShellError::IncompatibleResolution { .. })
        ));
    }

    #[test]
    fn disjoint_cubes_see_each_other_diagonally() {
        let mut shell = VShell::from_model(&model(1, (0.0, 0.0, 0.0), 1.0, &[(0, 0, 0)])).unwrap();
        // same lattice, translated one voxel up each axis
        shell
            .merge(&model(1, (1.0, 1.0, 1.0), 1.0, &[(0, 0, 0)]))
            .unwrap();

        assert_eq!((shell.grid.nx, shell.grid.ny, shell.grid.nz), (2, 2, 2));
        // scale doubled so voxels-per-mm is preserved
        assert!((shell.grid.scale - 2.0).abs() < 1e-12);

        let voxels = shell.sorted_voxels();
        assert_eq!(
            voxels,
            vec![
                ShellVoxel::new(0, 0, 0, NeighborMask::from_offset(1, 1, 1).unwrap()),
                ShellVoxel::new(1, 1, 1, NeighborMask::from_offset(-1, -1, -1).unwrap()),
            ]
        );
    }

    #[test]
    fn negative_offset_rebases_the_shell() {
        let mut shell = VShell::from_model(&model(1, (0.0, 0.0, 0.0), 1.0, &[(0, 0, 0)])).unwrap();
        shell
            .merge(&model(1, (-1.0, -1.0, -1.0), 1.0, &[(0, 0, 0)]))
            .unwrap();

        assert_eq!(shell.grid.translation, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!((shell.grid.nx, shell.grid.ny, shell.grid.nz), (2, 2, 2));
        assert!((shell.grid.scale - 2.0).abs() < 1e-12);

        let voxels = shell.sorted_voxels();
        assert_eq!(
            voxels,
            vec![
                ShellVoxel::new(0, 0, 0, NeighborMask::from_offset(1, 1, 1).unwrap()),
                ShellVoxel::new(1, 1, 1, NeighborMask::from_offset(-1, -1, -1).unwrap()),
            ]
        );
    }

    #[test]
    fn block_interior_is_pruned() {
        let shell = VShell::from_model(&model(3, (0.0, 0.0, 0.0), 3.0, &block(3))).unwrap();
        // 27 voxels in, the center dropped as interior
        assert_eq!(shell.len(), 26);
        assert!(!shell.voxels.iter().any(|v| (v.x, v.y, v.z) == (1, 1, 1)));
        for v in &shell.voxels {
            let n = v.neighbors.count();
            assert!((7..=17).contains(&n), "voxel {v:?} has {n} neighbors");
            assert!(!v.neighbors.is_complete());
        }
        // a corner sees 7 neighbors, a face center 17
        let corner = shell.voxels.iter().find(|v| (v.x, v.y, v.z) == (0, 0, 0)).unwrap();
        assert_eq!(corner.neighbors.count(), 7);
        let face = shell.voxels.iter().find(|v| (v.x, v.y, v.z) == (1, 1, 0)).unwrap();
        assert_eq!(face.neighbors.count(), 17);
    }

    #[test]
    fn abutting_walls_enclose_the_seam() {
        // a wall at x = 0 whose voxels miss only their +x neighbor
        let mut wall = Vec::new();
        for y in 0..3 {
            for z in 0..3 {
                wall.push(ShellVoxel::new(
                    0,
                    y,
                    z,
                    NeighborMask::from_bits(
                        NeighborMask::ALL.bits() & !NeighborMask::from_offset(1, 0, 0).unwrap().bits(),
                    ),
                ));
            }
        }
        let grid = VoxelGrid {
            nx: 1,
            ny: 3,
            nz: 3,
            translation: Point3::origin(),
            scale: 1.0,
        };
        let mut shell = VShell::new(grid);
        shell.voxels = wall;

        // merge the walls at x = 1 and x = 2
        let mut keys = Vec::new();
        for x in 1..3 {
            for y in 0..3 {
                for z in 0..3 {
                    keys.push((x, y, z));
                }
            }
        }
        shell.merge(&model(3, (0.0, 0.0, 0.0), 3.0, &keys)).unwrap();

        // every old wall voxel gained its last neighbor and was pruned,
        // and the new (1,1,1) is interior from the start
        assert!(shell.voxels.iter().all(|v| v.x > 0));
        assert!(!shell.voxels.iter().any(|v| (v.x, v.y, v.z) == (1, 1, 1)));
        assert_eq!(shell.len(), 17);

        let center = shell.voxels.iter().find(|v| (v.x, v.y, v.z) == (2, 1, 1)).unwrap();
        assert_eq!(center.neighbors.count(), 17);
    }

    #[test]
    fn duplicate_keys_are_absorbed() {
        let mut shell = VShell::from_model(&model(1, (0.0, 0.0, 0.0), 1.0, &[(0, 0, 0)])).unwrap();
        shell
            .merge(&model(2, (0.0, 0.0, 0.0), 2.0, &[(0, 0, 0), (1, 0, 0)]))
            .unwrap();

        let voxels = shell.sorted_voxels();
        assert_eq!(voxels.len(), 2);
        assert_eq!(voxels[0].key(), VoxelKey::new(0, 0, 0));
        assert_eq!(voxels[0].neighbors, NeighborMask::from_offset(1, 0, 0).unwrap());
        assert_eq!(voxels[1].neighbors, NeighborMask::from_offset(-1, 0, 0).unwrap());
    }

    #[test]
    fn cancelled_merge_leaves_shell_untouched() {
        let mut shell = VShell::from_model(&model(1, (0.0, 0.0, 0.0), 1.0, &[(0, 0, 0)])).unwrap();
        let before = shell.clone();
        let token = CancelToken::new();
        token.cancel();
        let result = shell.merge_cancellable(&model(3, (0.0, 0.0, 0.0), 3.0, &block(3)), &token);
        assert!(matches!(result, Err(ShellError::Cancelled)));
        assert_eq!(shell.voxels, before.voxels);
        assert_eq!(shell.grid, before.grid);
    }
}
