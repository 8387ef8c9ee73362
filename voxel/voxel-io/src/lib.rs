//! File codecs for the voxel dicing toolkit.
//!
//! Three formats:
//!
//! - **STL** ([`load_stl`], [`save_stl`]) - binary and ASCII triangle
//!   streams, the input and output of the pipeline
//! - **binvox** ([`load_binvox`], [`save_binvox`]) - run-length encoded
//!   sparse occupancy grids
//! - **V-Shell** ([`load_vshell`], [`save_vshell`]) - run-length encoded
//!   boundary shells carrying neighbor masks
//!
//! The voxel formats support windowed reads and writes through
//! [`ReadWindow`] so that diced subregions of large models can be
//! processed independently.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod binvox;
mod error;
mod header;
mod stl;
mod vshell;
mod window;

pub use binvox::{load_binvox, load_binvox_window, read_binvox, save_binvox, write_binvox};
pub use error::{IoError, IoResult};
pub use stl::{load_stl, save_stl};
pub use vshell::{load_vshell, load_vshell_window, read_vshell, save_vshell, write_vshell};
pub use window::ReadWindow;
