//! Single-slice rasterization: plane intersection, shell, scanline fill.

// Voxel indices fit i32/i64 for any practical grid
#![allow(clippy::cast_possible_truncation)]

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::warn;
use voxel_types::{MeshTriangle, TriMesh, VoxelGrid, VoxelKey};

use crate::bresenham::draw_line;

const EPSILON: f64 = 1e-9;

/// One triangle/plane intersection: the two segment endpoints on the
/// slice plane plus the index of the triangle that produced them.
struct IntersectionPair {
    a: Point3<f64>,
    b: Point3<f64>,
    tri: usize,
}

/// Intersection of the segment `(a, b)` with the plane `Z = z`.
///
/// Edges parallel (or nearly parallel) to the plane are ignored.
fn intersect_segment(a: &Point3<f64>, b: &Point3<f64>, z: f64) -> Option<Point3<f64>> {
    let u = b - a;
    let d = u.z;
    if d > -EPSILON && d < EPSILON {
        return None;
    }
    let t = (z - a.z) / d;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(a + u * t)
}

/// Intersection of a triangle with the plane `Z = z`.
///
/// Returns the first two edges that both cross the plane, probing the
/// edges in order (v0,v1), (v1,v2), (v2,v0). Triangles lying fully in
/// the plane produce nothing (all edges are parallel).
fn intersect_triangle(tri: &MeshTriangle, index: usize, z: f64) -> Option<IntersectionPair> {
    let i01 = intersect_segment(&tri.v0.position, &tri.v1.position, z);
    let i12 = intersect_segment(&tri.v1.position, &tri.v2.position, z);
    if let (Some(a), Some(b)) = (i01, i12) {
        return Some(IntersectionPair { a, b, tri: index });
    }
    let i20 = intersect_segment(&tri.v2.position, &tri.v0.position, z);
    if let (Some(a), Some(b)) = (i01, i20) {
        return Some(IntersectionPair { a, b, tri: index });
    }
    if let (Some(a), Some(b)) = (i12, i20) {
        return Some(IntersectionPair { a, b, tri: index });
    }
    None
}

/// Per-scanline x range touched by the shell.
struct MinMax {
    min: i64,
    max: i64,
}

/// Rasterize one Z slice of the mesh into voxel keys.
///
/// Returns the shell voxels (where triangles cross the slice plane) plus
/// the interior voxels filled by the scanline parity rule. A triangle
/// with non-finite coordinates aborts the slice with a logged warning.
pub(crate) fn rasterize_slice(mesh: &TriMesh, grid: &VoxelGrid, zi: u32) -> Vec<VoxelKey> {
    let vpmm = grid.voxels_per_mm();
    let mm_per_voxel = 1.0 / vpmm;
    let z = grid.translation.z + (0.5 + f64::from(zi)) * mm_per_voxel;

    let mut pairs = Vec::new();
    for (index, tri) in mesh.triangles.iter().enumerate() {
        if !tri.is_finite() {
            warn!(slice = zi, triangle = index, "non-finite triangle, aborting slice");
            return Vec::new();
        }
        if let Some(pair) = intersect_triangle(tri, index, z) {
            pairs.push(pair);
        }
    }

    // Shell: triangles recorded per (x, y) cell, and the x range per scanline.
    let mut shell: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    let mut extent: HashMap<i64, MinMax> = HashMap::new();
    let ny = i64::from(grid.ny);

    for pair in &pairs {
        let x1 = (vpmm * (pair.a.x - grid.translation.x)).floor() as i64;
        let x2 = (vpmm * (pair.b.x - grid.translation.x)).floor() as i64;
        let y1 = (vpmm * (pair.a.y - grid.translation.y)).floor() as i64;
        let y2 = (vpmm * (pair.b.y - grid.translation.y)).floor() as i64;

        draw_line(x1, y1, x2, y2, &mut |x, y| {
            if y < 0 || y >= ny {
                return;
            }
            let tris = shell.entry((x, y)).or_default();
            if !tris.contains(&pair.tri) {
                tris.push(pair.tri);
            }
            extent
                .entry(y)
                .and_modify(|mm| {
                    mm.min = mm.min.min(x);
                    mm.max = mm.max.max(x);
                })
                .or_insert(MinMax { min: x, max: x });
        });
    }

    // Scanline parity fill between shell crossings.
    let nx = i64::from(grid.nx);
    let mut out = Vec::new();
    for (&yi, mm) in &extent {
        let mut inside = false;
        let mut seen: HashSet<usize> = HashSet::new();
        for xi in mm.min..=mm.max {
            if xi >= nx {
                break;
            }
            if let Some(tris) = shell.get(&(xi, yi)) {
                if xi >= 0 {
                    out.push(VoxelKey::new(xi as i32, yi as i32, zi as i32));
                }
                let mut in_count = 0_u32;
                let mut out_count = 0_u32;
                for &t in tris {
                    if !seen.insert(t) {
                        continue;
                    }
                    // Dot of the first vertex normal with (-1, 0, 0).
                    let d = -mesh.triangles[t].v0.normal.x;
                    if d > EPSILON {
                        in_count += 1;
                    } else if d < -EPSILON {
                        out_count += 1;
                    }
                }
                match in_count.cmp(&out_count) {
                    std::cmp::Ordering::Greater => inside = true,
                    std::cmp::Ordering::Less => inside = false,
                    std::cmp::Ordering::Equal => {}
                }
            } else if inside && xi >= 0 {
                out.push(VoxelKey::new(xi as i32, yi as i32, zi as i32));
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use voxel_types::unit_cube;

    #[test]
    fn segment_intersection_basics() {
        let a = Point3::new(0.0, 0.0, -1.0);
        let b = Point3::new(0.0, 0.0, 1.0);
        let p = intersect_segment(&a, &b, 0.0).unwrap();
        assert!((p.z - 0.0).abs() < 1e-12);

        // plane beyond the segment
        assert!(intersect_segment(&a, &b, 2.0).is_none());
        // parallel edge
        let c = Point3::new(1.0, 0.0, -1.0);
        assert!(intersect_segment(&a, &c, 0.0).is_none());
    }

    #[test]
    fn in_plane_triangle_is_skipped() {
        let tri = MeshTriangle::from_positions(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(intersect_triangle(&tri, 0, 0.0).is_none());
    }

    #[test]
    fn cube_slice_fills_interior() {
        let cube = unit_cube();
        let grid = VoxelGrid::new(4, 4, 4, Point3::new(-1.0, -1.0, -1.0), 2.0).unwrap();
        let keys = rasterize_slice(&cube, &grid, 1);
        // The slice plane cuts the cube, so all 16 columns of this slice
        // are inside the solid.
        assert_eq!(keys.len(), 16);
        assert!(keys.iter().all(|k| k.z == 1));
    }

    #[test]
    fn nan_triangle_aborts_slice() {
        let mut cube = unit_cube();
        cube.triangles[3].v1.position.x = f64::NAN;
        let grid = VoxelGrid::new(2, 2, 2, Point3::new(-1.0, -1.0, -1.0), 2.0).unwrap();
        assert!(rasterize_slice(&cube, &grid, 0).is_empty());
    }
}
