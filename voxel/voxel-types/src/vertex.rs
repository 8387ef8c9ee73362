//! Mesh vertex with position and normal.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh vertex: a position in 3D space plus an outward normal.
///
/// The rasterizer's inside/outside test reads the normal of a triangle's
/// first vertex, so loaders must populate normals (typically with the
/// face normal of the owning triangle).
///
/// # Example
///
/// ```
/// use voxel_types::{MeshVertex, Point3, Vector3};
///
/// let v = MeshVertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(v.position.x, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshVertex {
    /// World-space position in millimeters.
    pub position: Point3<f64>,
    /// Outward unit normal.
    pub normal: Vector3<f64>,
}

impl MeshVertex {
    /// Create a vertex from a position and a normal.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    /// Create a vertex at the given coordinates with a zero normal.
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::zeros(),
        }
    }

    /// True when position and normal contain only finite components.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite()) && self.normal.iter().all(|c| c.is_finite())
    }
}
