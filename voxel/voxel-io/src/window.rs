//! Windowed reads over voxel files.

use crate::{IoError, IoResult};

/// A subregion window for reading or writing voxel files.
///
/// Dicing pipelines process large models in chunks; a window selects a
/// start index and a count per axis so only part of a file's voxels are
/// materialized. A count of zero means "to the end of the model".
///
/// # Example
///
/// ```
/// use voxel_io::ReadWindow;
///
/// let full = ReadWindow::FULL;
/// assert_eq!(full.count, [0, 0, 0]);
///
/// let window = ReadWindow::new([1, 1, 1], [1, 1, 1]);
/// assert!(window.validate().is_ok());
/// assert!(ReadWindow::new([-1, 0, 0], [0, 0, 0]).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow {
    /// Start index per axis.
    pub start: [i32; 3],
    /// Voxel count per axis; zero selects everything from the start.
    pub count: [i32; 3],
}

impl ReadWindow {
    /// The whole model.
    pub const FULL: Self = Self {
        start: [0; 3],
        count: [0; 3],
    };

    /// Create a window from start indices and counts.
    #[inline]
    #[must_use]
    pub const fn new(start: [i32; 3], count: [i32; 3]) -> Self {
        Self { start, count }
    }

    /// Reject negative indices.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidWindow`] when any component is
    /// negative.
    pub fn validate(&self) -> IoResult<()> {
        if self.start.iter().chain(self.count.iter()).any(|&v| v < 0) {
            return Err(IoError::InvalidWindow {
                sx: self.start[0],
                sy: self.start[1],
                sz: self.start[2],
                cx: self.count[0],
                cy: self.count[1],
                cz: self.count[2],
            });
        }
        Ok(())
    }

    /// Check the start against model dimensions and clamp the counts.
    ///
    /// Returns the effective `(start, count)` in i64, with zero counts
    /// expanded to the full extent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidWindow`] for a negative window or a
    /// start beyond the model dimensions.
    pub(crate) fn resolve(&self, dims: [i64; 3]) -> IoResult<([i64; 3], [i64; 3])> {
        self.validate()?;
        let start = [
            i64::from(self.start[0]),
            i64::from(self.start[1]),
            i64::from(self.start[2]),
        ];
        let mut count = [
            i64::from(self.count[0]),
            i64::from(self.count[1]),
            i64::from(self.count[2]),
        ];
        for axis in 0..3 {
            if start[axis] > dims[axis] {
                return Err(IoError::InvalidWindow {
                    sx: self.start[0],
                    sy: self.start[1],
                    sz: self.start[2],
                    cx: self.count[0],
                    cy: self.count[1],
                    cz: self.count[2],
                });
            }
            if count[axis] == 0 || count[axis] > dims[axis] {
                count[axis] = dims[axis];
            }
        }
        Ok((start, count))
    }

    /// True when the index lies inside the resolved window.
    pub(crate) fn contains(start: [i64; 3], count: [i64; 3], x: i64, y: i64, z: i64) -> bool {
        x >= start[0]
            && x <= start[0] + count[0]
            && y >= start[1]
            && y <= start[1] + count[1]
            && z >= start[2]
            && z <= start[2] + count[2]
    }
}

impl Default for ReadWindow {
    fn default() -> Self {
        Self::FULL
    }
}
