//! Sparse voxel occupancy storage.

use hashbrown::{hash_map, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::VoxelGrid;

/// Integer voxel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelKey {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: i32,
}

impl VoxelKey {
    /// Create a key from indices.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The key offset by a delta per axis.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// RGBA voxel color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl VoxelColor {
    /// Create a color from channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white, the default for colorless voxels.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
}

/// A sparse set of occupied voxels, optionally colored.
///
/// Only present voxels are stored. The value is `None` for a plain
/// (white) voxel and `Some(color)` for a colored one; there is a single
/// map rather than parallel plain/colored collections, so presence and
/// color can never disagree.
///
/// # Example
///
/// ```
/// use voxel_types::{OccupancySet, VoxelColor, VoxelKey};
///
/// let mut set = OccupancySet::new();
/// set.insert(VoxelKey::new(0, 0, 0));
/// set.insert_color(VoxelKey::new(1, 0, 0), VoxelColor::new(255, 0, 0, 255));
///
/// assert!(set.contains(VoxelKey::new(0, 0, 0)));
/// assert_eq!(set.get(VoxelKey::new(0, 0, 0)), Some(None));
/// assert_eq!(set.get(VoxelKey::new(2, 0, 0)), None);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OccupancySet {
    voxels: HashMap<VoxelKey, Option<VoxelColor>>,
}

impl OccupancySet {
    /// Create an empty set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voxels: HashMap::with_capacity(capacity),
        }
    }

    /// Mark a voxel as present (plain white).
    ///
    /// An existing color at the key is preserved.
    #[inline]
    pub fn insert(&mut self, key: VoxelKey) {
        self.voxels.entry(key).or_insert(None);
    }

    /// Mark a voxel as present with a color.
    #[inline]
    pub fn insert_color(&mut self, key: VoxelKey, color: VoxelColor) {
        self.voxels.insert(key, Some(color));
    }

    /// Remove a voxel, returning whether it was present.
    #[inline]
    pub fn remove(&mut self, key: VoxelKey) -> bool {
        self.voxels.remove(&key).is_some()
    }

    /// True when the voxel is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: VoxelKey) -> bool {
        self.voxels.contains_key(&key)
    }

    /// Presence and color of a voxel.
    ///
    /// `None` = absent, `Some(None)` = present and plain,
    /// `Some(Some(c))` = present with color `c`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: VoxelKey) -> Option<Option<VoxelColor>> {
        self.voxels.get(&key).copied()
    }

    /// Number of present voxels.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// True when no voxel is present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterate over `(key, color)` pairs in unspecified order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (VoxelKey, Option<VoxelColor>)> + '_ {
        self.voxels.iter().map(|(k, c)| (*k, *c))
    }

    /// Iterate over present keys in unspecified order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = VoxelKey> + '_ {
        self.voxels.keys().copied()
    }

    /// All keys sorted by `(z, y, x)`, for deterministic comparisons.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<VoxelKey> {
        let mut keys: Vec<VoxelKey> = self.keys().collect();
        keys.sort_by_key(|k| (k.z, k.y, k.x));
        keys
    }

    /// Absorb all voxels of another set, later colors winning.
    pub fn extend(&mut self, other: &Self) {
        for (k, c) in other.iter() {
            match c {
                Some(color) => self.insert_color(k, color),
                None => self.insert(k),
            }
        }
    }
}

impl FromIterator<VoxelKey> for OccupancySet {
    fn from_iter<T: IntoIterator<Item = VoxelKey>>(iter: T) -> Self {
        let mut set = Self::new();
        for k in iter {
            set.insert(k);
        }
        set
    }
}

impl IntoIterator for OccupancySet {
    type Item = (VoxelKey, Option<VoxelColor>);
    type IntoIter = hash_map::IntoIter<VoxelKey, Option<VoxelColor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.voxels.into_iter()
    }
}

/// A voxel grid together with its occupied voxels.
///
/// This is what the binvox codec produces and what the shell merger and
/// the boolean subtractor consume.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelModel {
    /// Grid descriptor.
    pub grid: VoxelGrid,
    /// Occupied voxels.
    pub voxels: OccupancySet,
}

impl VoxelModel {
    /// Create a model from a grid and an occupancy set.
    #[inline]
    #[must_use]
    pub const fn new(grid: VoxelGrid, voxels: OccupancySet) -> Self {
        Self { grid, voxels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_existing_color() {
        let mut set = OccupancySet::new();
        let k = VoxelKey::new(1, 2, 3);
        set.insert_color(k, VoxelColor::new(10, 20, 30, 255));
        set.insert(k);
        assert_eq!(set.get(k), Some(Some(VoxelColor::new(10, 20, 30, 255))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sorted_keys_are_z_major() {
        let mut set = OccupancySet::new();
        set.insert(VoxelKey::new(1, 0, 1));
        set.insert(VoxelKey::new(0, 1, 0));
        set.insert(VoxelKey::new(1, 0, 0));
        let keys = set.sorted_keys();
        assert_eq!(
            keys,
            vec![VoxelKey::new(1, 0, 0), VoxelKey::new(0, 1, 0), VoxelKey::new(1, 0, 1)]
        );
    }

    #[test]
    fn extend_unions() {
        let mut a: OccupancySet = [VoxelKey::new(0, 0, 0)].into_iter().collect();
        let b: OccupancySet = [VoxelKey::new(0, 0, 0), VoxelKey::new(1, 0, 0)].into_iter().collect();
        a.extend(&b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn key_offset() {
        let k = VoxelKey::new(1, 1, 1).offset(-1, 0, 2);
        assert_eq!(k, VoxelKey::new(0, 1, 3));
    }
}
