//! The binvox occupancy codec.
//!
//! An ASCII header (`#binvox 1`, `dim`, `translate`, `scale`, `data`)
//! followed by a run-length body of `(value, count)` byte pairs with
//! `value` 0 or 1 and `count` in `1..=255`. Voxel traversal is
//! y-fastest, then z, then x.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;
use voxel_types::{OccupancySet, VoxelKey, VoxelModel};

use crate::header::{read_header, write_header};
use crate::{IoError, IoResult, ReadWindow};

const MAGIC: &str = "#binvox 1";

/// Load a binvox file in full.
///
/// # Errors
///
/// Returns [`IoError`] for missing files, malformed headers or corrupt
/// run-length data.
pub fn load_binvox<P: AsRef<Path>>(path: P) -> IoResult<VoxelModel> {
    load_binvox_window(path, ReadWindow::FULL)
}

/// Load a subregion of a binvox file.
///
/// # Errors
///
/// As [`load_binvox`], plus [`IoError::InvalidWindow`] for negative or
/// out-of-range windows.
pub fn load_binvox_window<P: AsRef<Path>>(path: P, window: ReadWindow) -> IoResult<VoxelModel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    let model = read_binvox(BufReader::new(file), window)?;
    debug!(voxels = model.voxels.len(), path = %path.display(), "loaded binvox");
    Ok(model)
}

/// Decode a binvox stream.
///
/// # Errors
///
/// Returns [`IoError`] for header or body corruption, including
/// [`IoError::RunLengthOverrun`] when the body runs past the declared
/// dimensions.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn read_binvox<R: BufRead>(mut reader: R, window: ReadWindow) -> IoResult<VoxelModel> {
    let grid = read_header(&mut reader, MAGIC)?;
    let dims = [i64::from(grid.nx), i64::from(grid.ny), i64::from(grid.nz)];
    let (start, count) = window.resolve(dims)?;

    let mut voxels = OccupancySet::new();
    let (mut xi, mut yi, mut zi) = (0_i64, 0_i64, 0_i64);

    loop {
        let mut pair = [0_u8; 1];
        if reader.read(&mut pair)? == 0 {
            break;
        }
        let value = pair[0];
        if value > 1 {
            return Err(IoError::invalid_content(format!("invalid value byte: {value}")));
        }

        let mut count_buf = [0_u8; 1];
        if reader.read(&mut count_buf)? == 0 {
            return Err(IoError::UnexpectedEof { context: "run count" });
        }
        let run = count_buf[0];
        if run == 0 {
            return Err(IoError::invalid_content("invalid count: 0"));
        }

        for _ in 0..run {
            if xi >= dims[0] {
                return Err(IoError::RunLengthOverrun {
                    index: xi,
                    dim: dims[0],
                });
            }
            if value == 1 && ReadWindow::contains(start, count, xi, yi, zi) {
                voxels.insert(VoxelKey::new(xi as i32, yi as i32, zi as i32));
            }
            // y runs fastest, then z, then x
            yi += 1;
            if yi >= dims[1] {
                yi = 0;
                zi += 1;
                if zi >= dims[2] {
                    zi = 0;
                    xi += 1;
                }
            }
        }
    }

    Ok(VoxelModel::new(grid, voxels))
}

/// Save a model as a binvox file.
///
/// # Errors
///
/// Returns [`IoError`] when the file cannot be written.
pub fn save_binvox<P: AsRef<Path>>(model: &VoxelModel, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_binvox(model, &mut writer, ReadWindow::FULL)
}

/// Encode a model (or a window of it) as a binvox stream.
///
/// # Errors
///
/// Returns [`IoError`] on write failure or an invalid window.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn write_binvox<W: Write>(model: &VoxelModel, writer: &mut W, window: ReadWindow) -> IoResult<()> {
    if model.voxels.is_empty() {
        write_header(writer, MAGIC, &model.grid, true)?;
        return Ok(());
    }

    let dims = [
        i64::from(model.grid.nx),
        i64::from(model.grid.ny),
        i64::from(model.grid.nz),
    ];
    let (start, count) = window.resolve(dims)?;
    write_header(writer, MAGIC, &model.grid, false)?;

    let mut run_value = 0_u8;
    let mut run_len = 0_u64;
    let flush = |value: u8, len: u64, w: &mut W| -> IoResult<()> {
        let full = len / 255;
        for _ in 0..full {
            w.write_all(&[value, 255])?;
        }
        let rem = (len % 255) as u8;
        if rem > 0 {
            w.write_all(&[value, rem])?;
        }
        Ok(())
    };

    for xi in start[0]..start[0] + count[0] {
        for zi in start[2]..start[2] + count[2] {
            for yi in start[1]..start[1] + count[1] {
                let present = model
                    .voxels
                    .contains(VoxelKey::new(xi as i32, yi as i32, zi as i32));
                let value = u8::from(present);
                if value == run_value {
                    run_len += 1;
                } else {
                    if run_len > 0 {
                        flush(run_value, run_len, writer)?;
                    }
                    run_value = value;
                    run_len = 1;
                }
            }
        }
    }
    if run_len > 0 {
        flush(run_value, run_len, writer)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::io::BufReader;
    use voxel_types::VoxelGrid;

    const HEADER_2X2X2: &str = "#binvox 1\ndim 2 2 2\ntranslate -80 -80 -2.6\nscale 160\ndata\n";

    fn stream(header: &str, body: &[u8]) -> Vec<u8> {
        let mut buf = header.as_bytes().to_vec();
        buf.extend_from_slice(body);
        buf
    }

    #[test]
    fn reads_empty_body() {
        let buf = stream("#binvox 1\ndim 256 256 256\ntranslate -80 -80 -2.6\nscale 160\ndata\n", &[]);
        let model = read_binvox(BufReader::new(&buf[..]), ReadWindow::FULL).unwrap();
        assert_eq!((model.grid.nx, model.grid.ny, model.grid.nz), (256, 256, 256));
        assert!((model.grid.translation.z - -2.6).abs() < 1e-12);
        assert!(model.voxels.is_empty());
    }

    #[test]
    fn reads_small_design() {
        // five empty positions, then three filled
        let buf = stream(HEADER_2X2X2, &[0, 5, 1, 3]);
        let model = read_binvox(BufReader::new(&buf[..]), ReadWindow::FULL).unwrap();
        assert_eq!(
            model.voxels.sorted_keys(),
            vec![
                VoxelKey::new(1, 1, 0),
                VoxelKey::new(1, 0, 1),
                VoxelKey::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn windowed_read_selects_a_corner() {
        let buf = stream(HEADER_2X2X2, &[0, 5, 1, 3]);
        let window = ReadWindow::new([1, 1, 1], [1, 1, 1]);
        let model = read_binvox(BufReader::new(&buf[..]), window).unwrap();
        assert_eq!(model.voxels.sorted_keys(), vec![VoxelKey::new(1, 1, 1)]);
    }

    #[test]
    fn overrun_is_an_error() {
        let buf = stream("#binvox 1\ndim 1 1 1\ntranslate 0 0 0\nscale 1\ndata\n", &[1, 2]);
        assert!(matches!(
            read_binvox(BufReader::new(&buf[..]), ReadWindow::FULL),
            Err(IoError::RunLengthOverrun { .. })
        ));
    }

    #[test]
    fn invalid_value_byte_is_an_error() {
        let buf = stream(HEADER_2X2X2, &[7, 1]);
        assert!(read_binvox(BufReader::new(&buf[..]), ReadWindow::FULL).is_err());
    }

    #[test]
    fn zero_count_is_an_error() {
        let buf = stream(HEADER_2X2X2, &[1, 0]);
        assert!(read_binvox(BufReader::new(&buf[..]), ReadWindow::FULL).is_err());
    }

    #[test]
    fn negative_window_is_rejected() {
        let buf = stream(HEADER_2X2X2, &[0, 5, 1, 3]);
        let window = ReadWindow::new([-1, 0, 0], [0, 0, 0]);
        assert!(matches!(
            read_binvox(BufReader::new(&buf[..]), window),
            Err(IoError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn write_then_read_roundtrips() {
        let grid = VoxelGrid::new(3, 3, 3, Point3::new(-1.5, 0.0, 2.25), 3.0).unwrap();
        let mut voxels = OccupancySet::new();
        for key in [
            VoxelKey::new(0, 0, 0),
            VoxelKey::new(1, 2, 1),
            VoxelKey::new(2, 2, 2),
            VoxelKey::new(2, 0, 1),
        ] {
            voxels.insert(key);
        }
        let model = VoxelModel::new(grid, voxels);

        let mut buf = Vec::new();
        write_binvox(&model, &mut buf, ReadWindow::FULL).unwrap();
        let back = read_binvox(BufReader::new(&buf[..]), ReadWindow::FULL).unwrap();

        assert_eq!(back.voxels.sorted_keys(), model.voxels.sorted_keys());
        assert_eq!(back.grid, model.grid);
    }

    #[test]
    fn long_runs_split_at_255() {
        // an 8x8x8 solid block produces a 512-long run of ones
        let grid = VoxelGrid::new(8, 8, 8, Point3::origin(), 8.0).unwrap();
        let mut voxels = OccupancySet::new();
        for x in 0..8 {
            for y in 0..8 {
                for z in 0..8 {
                    voxels.insert(VoxelKey::new(x, y, z));
                }
            }
        }
        let model = VoxelModel::new(grid, voxels);

        let mut buf = Vec::new();
        write_binvox(&model, &mut buf, ReadWindow::FULL).unwrap();
        let back = read_binvox(BufReader::new(&buf[..]), ReadWindow::FULL).unwrap();
        assert_eq!(back.voxels.len(), 512);
    }

    #[test]
    fn empty_model_writes_zero_dims() {
        let grid = VoxelGrid::new(2, 2, 2, Point3::origin(), 2.0).unwrap();
        let model = VoxelModel::new(grid, OccupancySet::new());
        let mut buf = Vec::new();
        write_binvox(&model, &mut buf, ReadWindow::FULL).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("#binvox 1\ndim 0 0 0\n"));
    }
}
