//! Oriented mesh triangle.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MeshVertex;

/// An oriented triangle with three vertices carrying normals.
///
/// Winding is counter-clockwise when viewed from outside; the face
/// normal follows the right-hand rule.
///
/// # Example
///
/// ```
/// use voxel_types::{MeshTriangle, Point3};
///
/// let tri = MeshTriangle::from_positions(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// let n = tri.face_normal().unwrap();
/// assert!((n.z - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshTriangle {
    /// First vertex.
    pub v0: MeshVertex,
    /// Second vertex.
    pub v1: MeshVertex,
    /// Third vertex.
    pub v2: MeshVertex,
}

impl MeshTriangle {
    /// Create a triangle from three vertices.
    #[inline]
    #[must_use]
    pub const fn new(v0: MeshVertex, v1: MeshVertex, v2: MeshVertex) -> Self {
        Self { v0, v1, v2 }
    }

    /// Create a triangle from three positions.
    ///
    /// Vertex normals are set to the face normal computed from the
    /// winding, or zero for degenerate triangles.
    #[must_use]
    pub fn from_positions(
        p0: nalgebra::Point3<f64>,
        p1: nalgebra::Point3<f64>,
        p2: nalgebra::Point3<f64>,
    ) -> Self {
        let mut tri = Self {
            v0: MeshVertex::new(p0, Vector3::zeros()),
            v1: MeshVertex::new(p1, Vector3::zeros()),
            v2: MeshVertex::new(p2, Vector3::zeros()),
        };
        if let Some(n) = tri.face_normal() {
            tri.v0.normal = n;
            tri.v1.normal = n;
            tri.v2.normal = n;
        }
        tri
    }

    /// Compute the unnormalized face normal via the cross product.
    ///
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn face_normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1.position - self.v0.position;
        let e2 = self.v2.position - self.v0.position;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate (zero-area) triangles.
    #[must_use]
    pub fn face_normal(&self) -> Option<Vector3<f64>> {
        let n = self.face_normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Compute the area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.face_normal_unnormalized().norm() * 0.5
    }

    /// A copy with reversed winding (flipped face normal).
    ///
    /// Vertex normals are negated as well so they stay consistent with
    /// the new winding.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let flip = |v: &MeshVertex| MeshVertex::new(v.position, -v.normal);
        Self {
            v0: flip(&self.v0),
            v1: flip(&self.v2),
            v2: flip(&self.v1),
        }
    }

    /// True when every vertex is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.v0.is_finite() && self.v1.is_finite() && self.v2.is_finite()
    }

    /// Vertices as an array.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [MeshVertex; 3] {
        [self.v0, self.v1, self.v2]
    }
}
