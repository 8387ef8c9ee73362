//! Dual-cell manifold meshing.

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::{debug, error};
use voxel_types::{OccupancySet, TriMesh, VoxelGrid, VoxelKey};

use crate::table::{dispatch_table, CaseEntry};
use crate::transform::mat_apply;
use crate::{ManifoldError, ManifoldResult};

/// Dual cells touched by one voxel: the cell key offset and the corner
/// bit the voxel occupies in that cell.
const CELL_OFFSETS: [(i32, i32, i32, u8); 8] = [
    (0, 0, 0, 1 << 0),    // g0
    (-1, 0, 0, 1 << 1),   // g1
    (-1, 1, 0, 1 << 2),   // g2
    (0, 1, 0, 1 << 3),    // g3
    (0, 0, -1, 1 << 4),   // g4
    (-1, 0, -1, 1 << 5),  // g5
    (-1, 1, -1, 1 << 6),  // g6
    (0, 1, -1, 1 << 7),   // g7
];

/// Reconstruct a closed triangle mesh over the boundary of the occupied
/// voxels.
///
/// The surface is expressed on the dual lattice of the grid: output
/// vertices lie at half-voxel offsets from voxel centers, so even
/// single-voxel features produce watertight geometry. Cells are visited
/// in unspecified order; sort before comparing triangle sequences.
///
/// A configuration missing from the dispatch table (impossible with the
/// generated table) is logged and skipped; use [`try_manifold_mesh`] to
/// surface it as an error instead.
///
/// # Example
///
/// ```
/// use voxel_types::{OccupancySet, Point3, VoxelGrid, VoxelKey};
/// use voxel_manifold::manifold_mesh;
///
/// let grid = VoxelGrid::new(1, 1, 1, Point3::origin(), 1.0).unwrap();
/// let voxels: OccupancySet = [VoxelKey::new(0, 0, 0)].into_iter().collect();
/// let mesh = manifold_mesh(&voxels, &grid);
/// assert_eq!(mesh.len(), 48);
/// ```
#[must_use]
pub fn manifold_mesh(occupancy: &OccupancySet, grid: &VoxelGrid) -> TriMesh {
    mesh_cells(occupancy, grid, false).unwrap_or_default()
}

/// Like [`manifold_mesh`], but an unhandled cell configuration aborts
/// with [`ManifoldError::UnhandledConfiguration`].
///
/// # Errors
///
/// Returns an error when a dual cell resolves to no dispatch entry.
pub fn try_manifold_mesh(occupancy: &OccupancySet, grid: &VoxelGrid) -> ManifoldResult<TriMesh> {
    mesh_cells(occupancy, grid, true)
}

fn mesh_cells(occupancy: &OccupancySet, grid: &VoxelGrid, strict: bool) -> ManifoldResult<TriMesh> {
    // Scatter each voxel into the eight dual cells it corners.
    let mut cells: HashMap<VoxelKey, u8> = HashMap::with_capacity(occupancy.len() * 2);
    for key in occupancy.keys() {
        for (dx, dy, dz, bit) in CELL_OFFSETS {
            *cells.entry(key.offset(dx, dy, dz)).or_insert(0) |= bit;
        }
    }
    debug!(voxels = occupancy.len(), cells = cells.len(), "meshing dual cells");

    let table = dispatch_table();
    let mm_per_voxel = grid.mm_per_voxel();
    let mut mesh = TriMesh::new();

    for (&cell, &config) in &cells {
        if config == 0x00 || config == 0xFF {
            continue;
        }
        match table.cases[config as usize] {
            Some(entry) => emit_cell(&mut mesh, table.patches[entry.patch].tris.as_slice(), entry, cell, mm_per_voxel, grid),
            None => {
                error!(config, cell.x, cell.y, cell.z, "unhandled cell configuration");
                debug_assert!(false, "unhandled cell configuration {config:#04x}");
                if strict {
                    return Err(ManifoldError::UnhandledConfiguration { config });
                }
            }
        }
    }

    debug!(triangles = mesh.len(), "manifold meshing complete");
    Ok(mesh)
}

fn emit_cell(
    mesh: &mut TriMesh,
    tris: &[[[i32; 3]; 3]],
    entry: CaseEntry,
    cell: VoxelKey,
    mm_per_voxel: f64,
    grid: &VoxelGrid,
) {
    let place = |v: [i32; 3]| -> Point3<f64> {
        let t = mat_apply(entry.mat, v);
        // The +1 offsets on x and z come from the corner labeling
        // convention; they keep the output aligned with voxel centers.
        let x = f64::from(cell.x) + 1.0 + f64::from(t[0]) / 2.0;
        let y = f64::from(cell.y) + f64::from(t[1]) / 2.0;
        let z = f64::from(cell.z) + 1.0 + f64::from(t[2]) / 2.0;
        Point3::new(
            x * mm_per_voxel + grid.translation.x,
            y * mm_per_voxel + grid.translation.y,
            z * mm_per_voxel + grid.translation.z,
        )
    };

    for tri in tris {
        let (a, b, c) = if entry.flip {
            (place(tri[0]), place(tri[2]), place(tri[1]))
        } else {
            (place(tri[0]), place(tri[1]), place(tri[2]))
        };
        mesh.push(voxel_types::MeshTriangle::from_positions(a, b, c));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hashbrown::HashMap as TestMap;

    fn grid_1vpmm(n: u32) -> VoxelGrid {
        VoxelGrid::new(n, n, n, Point3::origin(), f64::from(n)).unwrap()
    }

    fn occupancy(keys: &[(i32, i32, i32)]) -> OccupancySet {
        keys.iter().map(|&(x, y, z)| VoxelKey::new(x, y, z)).collect()
    }

    /// Quantize a vertex to exact half-voxel lattice coordinates.
    fn quantize(p: &Point3<f64>) -> (i64, i64, i64) {
        #[allow(clippy::cast_possible_truncation)]
        let q = |v: f64| (v * 4.0).round() as i64;
        (q(p.x), q(p.y), q(p.z))
    }

    /// Every undirected edge must be shared by exactly two triangles
    /// with opposite directions.
    fn assert_watertight(mesh: &TriMesh) {
        let mut directed: TestMap<((i64, i64, i64), (i64, i64, i64)), i32> = TestMap::new();
        for tri in &mesh.triangles {
            let v = [
                quantize(&tri.v0.position),
                quantize(&tri.v1.position),
                quantize(&tri.v2.position),
            ];
            for i in 0..3 {
                let a = v[i];
                let b = v[(i + 1) % 3];
                assert_ne!(a, b, "degenerate edge");
                *directed.entry((a, b)).or_insert(0) += 1;
            }
        }
        for (&(a, b), &count) in &directed {
            assert_eq!(count, 1, "edge {a:?}->{b:?} used {count} times");
            assert_eq!(
                directed.get(&(b, a)).copied().unwrap_or(0),
                1,
                "edge {a:?}->{b:?} has no opposite"
            );
        }
    }

    /// Signed volume via the divergence theorem; positive for outward
    /// winding.
    fn signed_volume(mesh: &TriMesh) -> f64 {
        mesh.triangles
            .iter()
            .map(|t| {
                let a = t.v0.position.coords;
                let b = t.v1.position.coords;
                let c = t.v2.position.coords;
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    #[test]
    fn empty_occupancy_yields_empty_mesh() {
        let mesh = manifold_mesh(&OccupancySet::new(), &grid_1vpmm(1));
        assert!(mesh.is_empty());
    }

    #[test]
    fn single_voxel_is_a_watertight_cube() {
        let grid = grid_1vpmm(1);
        let mesh = manifold_mesh(&occupancy(&[(0, 0, 0)]), &grid);
        // eight dual cells, each contributing a six-triangle corner cap
        assert_eq!(mesh.len(), 48);
        assert_watertight(&mesh);
        assert_relative_eq!(signed_volume(&mesh), 1.0, epsilon = 1e-9);

        let bb = mesh.bounding_box();
        assert!((bb.min.x - 0.0).abs() < 1e-12);
        assert!((bb.max.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_scale_grid_meshes_in_voxel_units() {
        // scale 0 is treated as one voxel per millimeter
        let grid = VoxelGrid {
            nx: 1,
            ny: 1,
            nz: 1,
            translation: Point3::origin(),
            scale: 0.0,
        };
        let mesh = manifold_mesh(&occupancy(&[(0, 0, 0)]), &grid);
        assert_eq!(mesh.len(), 48);
        assert_relative_eq!(signed_volume(&mesh), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn two_adjacent_voxels_merge_into_a_box() {
        let grid = grid_1vpmm(2);
        let mesh = manifold_mesh(&occupancy(&[(0, 0, 0), (1, 0, 0)]), &grid);
        assert_watertight(&mesh);
        assert_relative_eq!(signed_volume(&mesh), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn face_diagonal_pair_is_watertight() {
        let grid = grid_1vpmm(2);
        let mesh = manifold_mesh(&occupancy(&[(0, 0, 0), (1, 1, 0)]), &grid);
        assert_watertight(&mesh);
        // the ambiguous case bridges the two cubes, adding volume
        assert!(signed_volume(&mesh) > 1.9);
    }

    #[test]
    fn body_diagonal_pair_is_two_cubes() {
        let grid = grid_1vpmm(2);
        let mesh = manifold_mesh(&occupancy(&[(0, 0, 0), (1, 1, 1)]), &grid);
        assert_watertight(&mesh);
        assert_relative_eq!(signed_volume(&mesh), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn full_block_is_a_cube() {
        let grid = grid_1vpmm(2);
        let mut keys = Vec::new();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    keys.push((x, y, z));
                }
            }
        }
        let mesh = manifold_mesh(&occupancy(&keys), &grid);
        assert_watertight(&mesh);
        assert_relative_eq!(signed_volume(&mesh), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn hollow_block_has_inner_surface() {
        let grid = grid_1vpmm(3);
        let mut keys = Vec::new();
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    if (x, y, z) != (1, 1, 1) {
                        keys.push((x, y, z));
                    }
                }
            }
        }
        let mesh = manifold_mesh(&occupancy(&keys), &grid);
        assert_watertight(&mesh);
        // outer cube minus the unit void
        assert_relative_eq!(signed_volume(&mesh), 26.0, epsilon = 1e-9);
    }

    #[test]
    fn solid_block_volume_matches() {
        let grid = grid_1vpmm(3);
        let mut keys = Vec::new();
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    keys.push((x, y, z));
                }
            }
        }
        let mesh = manifold_mesh(&occupancy(&keys), &grid);
        assert_watertight(&mesh);
        assert_relative_eq!(signed_volume(&mesh), 27.0, epsilon = 1e-9);
    }

    #[test]
    fn translation_and_scale_place_the_surface() {
        let grid = VoxelGrid::new(1, 1, 1, Point3::new(10.0, 20.0, 30.0), 2.0).unwrap();
        let mesh = manifold_mesh(&occupancy(&[(0, 0, 0)]), &grid);
        let bb = mesh.bounding_box();
        assert!((bb.min.x - 10.0).abs() < 1e-12);
        assert!((bb.max.x - 12.0).abs() < 1e-12);
        assert!((bb.min.z - 30.0).abs() < 1e-12);
    }

    #[test]
    fn strict_mesher_accepts_every_block() {
        let grid = grid_1vpmm(2);
        let mesh = try_manifold_mesh(&occupancy(&[(0, 0, 0), (1, 1, 0), (0, 1, 1)]), &grid);
        assert!(mesh.is_ok());
    }

    #[test]
    fn triangle_normals_face_outward() {
        let grid = grid_1vpmm(1);
        let mesh = manifold_mesh(&occupancy(&[(0, 0, 0)]), &grid);
        let center = Point3::new(0.5, 0.5, 0.5);
        for tri in &mesh.triangles {
            let centroid =
                (tri.v0.position.coords + tri.v1.position.coords + tri.v2.position.coords) / 3.0;
            let n = tri.face_normal().unwrap();
            assert!(
                n.dot(&(centroid - center.coords)) > 0.0,
                "inward-facing triangle"
            );
        }
    }
}
