//! Triangle soup mesh.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, MeshTriangle};

/// An oriented triangle soup.
///
/// Unlike an indexed mesh this stores each triangle with concrete vertex
/// positions and normals, which is the shape the rasterizer and the
/// manifold mesher both work in: triangles stream in from an STL file and
/// stream out to one, no shared-vertex topology is needed in between.
///
/// # Example
///
/// ```
/// use voxel_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.len(), 12);
/// let bb = cube.bounding_box();
/// assert_eq!(bb.min.x, -1.0);
/// assert_eq!(bb.max.z, 1.0);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriMesh {
    /// The triangles, in load or emission order.
    pub triangles: Vec<MeshTriangle>,
}

impl TriMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { triangles: Vec::new() }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(triangle_count: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Create a mesh from a triangle list.
    #[inline]
    #[must_use]
    pub const fn from_triangles(triangles: Vec<MeshTriangle>) -> Self {
        Self { triangles }
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a triangle.
    #[inline]
    pub fn push(&mut self, tri: MeshTriangle) {
        self.triangles.push(tri);
    }

    /// Append all triangles of another mesh.
    pub fn append(&mut self, other: &mut Self) {
        self.triangles.append(&mut other.triangles);
    }

    /// Tight axis-aligned bounding box over all vertex positions.
    ///
    /// Returns an empty box for an empty mesh.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for tri in &self.triangles {
            aabb.expand_to_include(&tri.v0.position);
            aabb.expand_to_include(&tri.v1.position);
            aabb.expand_to_include(&tri.v2.position);
        }
        aabb
    }

    /// Sort triangles lexicographically by vertex positions.
    ///
    /// The mesher visits dual cells in unspecified order, so tests that
    /// compare triangle sequences sort first.
    pub fn sort_triangles(&mut self) {
        self.triangles.sort_by(|a, b| {
            let ka = triangle_sort_key(a);
            let kb = triangle_sort_key(b);
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

fn triangle_sort_key(t: &MeshTriangle) -> [f64; 9] {
    [
        t.v0.position.z,
        t.v0.position.y,
        t.v0.position.x,
        t.v1.position.z,
        t.v1.position.y,
        t.v1.position.x,
        t.v2.position.z,
        t.v2.position.y,
        t.v2.position.x,
    ]
}

/// The 12-triangle cube spanning `[-1, 1]^3` with outward normals.
///
/// This is the canonical fixture for voxelization tests: a 1x1x1 grid
/// over it yields a single voxel, a 2x2x2 grid yields eight.
#[must_use]
pub fn unit_cube() -> TriMesh {
    let corners = [
        Point3::new(-1.0, -1.0, -1.0), // 0
        Point3::new(1.0, -1.0, -1.0),  // 1
        Point3::new(1.0, 1.0, -1.0),   // 2
        Point3::new(-1.0, 1.0, -1.0),  // 3
        Point3::new(-1.0, -1.0, 1.0),  // 4
        Point3::new(1.0, -1.0, 1.0),   // 5
        Point3::new(1.0, 1.0, 1.0),    // 6
        Point3::new(-1.0, 1.0, 1.0),   // 7
    ];

    // CCW from outside
    let faces = [
        [0, 2, 1], // bottom
        [0, 3, 2],
        [4, 5, 6], // top
        [4, 6, 7],
        [0, 1, 5], // front (-y)
        [0, 5, 4],
        [2, 3, 7], // back (+y)
        [2, 7, 6],
        [3, 0, 4], // left (-x)
        [3, 4, 7],
        [1, 2, 6], // right (+x)
        [1, 6, 5],
    ];

    let mut mesh = TriMesh::with_capacity(12);
    for [a, b, c] in faces {
        mesh.push(MeshTriangle::from_positions(corners[a], corners[b], corners[c]));
    }
    mesh
}
