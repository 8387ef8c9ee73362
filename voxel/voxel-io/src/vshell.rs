//! The V-Shell codec.
//!
//! Same ASCII header as binvox with magic `#vshell 1`. The body is a
//! run-length stream of `(u32 value, count)` pairs where the value is a
//! voxel's 27-bit neighbor mask. The filler values 0 and `0xFFFF_FFFF`
//! take a little-endian `u16` count; any other value takes a `u8` count
//! in `1..=255`. Traversal is y-fastest, then z, then x.
//!
//! A voxel whose mask is zero is indistinguishable from an empty run,
//! so isolated voxels without neighbors do not survive a round-trip;
//! shells of real solids never contain them.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use hashbrown::HashMap;
use tracing::debug;
use voxel_shell::{NeighborMask, ShellVoxel, VShell};
use voxel_types::VoxelKey;

use crate::header::{read_header, write_header};
use crate::{IoError, IoResult, ReadWindow};

const MAGIC: &str = "#vshell 1";

/// The run-length filler values that carry a `u16` count.
const EMPTY: u32 = 0;
const FILLER: u32 = 0xFFFF_FFFF;

/// Load a V-Shell file in full.
///
/// # Errors
///
/// Returns [`IoError`] for missing files or corrupt data.
pub fn load_vshell<P: AsRef<Path>>(path: P) -> IoResult<VShell> {
    load_vshell_window(path, ReadWindow::FULL)
}

/// Load a subregion of a V-Shell file.
///
/// # Errors
///
/// As [`load_vshell`], plus [`IoError::InvalidWindow`] for bad windows.
pub fn load_vshell_window<P: AsRef<Path>>(path: P, window: ReadWindow) -> IoResult<VShell> {
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
    let shell = read_vshell(BufReader::new(file), window)?;
    debug!(voxels = shell.len(), path = %path.display(), "loaded vshell");
    Ok(shell)
}

/// Decode a V-Shell stream.
///
/// # Errors
///
/// Returns [`IoError`] for header or body corruption.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn read_vshell<R: BufRead>(mut reader: R, window: ReadWindow) -> IoResult<VShell> {
    let grid = read_header(&mut reader, MAGIC)?;
    let dims = [i64::from(grid.nx), i64::from(grid.ny), i64::from(grid.nz)];
    let (start, count) = window.resolve(dims)?;

    let mut voxels = Vec::new();
    let (mut xi, mut yi, mut zi) = (0_i64, 0_i64, 0_i64);

    loop {
        let mut value_buf = [0_u8; 4];
        match read_exact_or_eof(&mut reader, &mut value_buf)? {
            ReadOutcome::Eof => break,
            ReadOutcome::Full => {}
        }
        let value = u32::from_le_bytes(value_buf);

        let run = if value == EMPTY || value == FILLER {
            let mut count_buf = [0_u8; 2];
            reader
                .read_exact(&mut count_buf)
                .map_err(|_| IoError::UnexpectedEof { context: "run count" })?;
            u32::from(u16::from_le_bytes(count_buf))
        } else {
            let mut count_buf = [0_u8; 1];
            reader
                .read_exact(&mut count_buf)
                .map_err(|_| IoError::UnexpectedEof { context: "run count" })?;
            if count_buf[0] == 0 {
                return Err(IoError::invalid_content("invalid count: 0"));
            }
            u32::from(count_buf[0])
        };

        for _ in 0..run {
            if xi >= dims[0] {
                return Err(IoError::RunLengthOverrun {
                    index: xi,
                    dim: dims[0],
                });
            }
            if value != EMPTY
                && value != FILLER
                && ReadWindow::contains(start, count, xi, yi, zi)
            {
                voxels.push(ShellVoxel::new(
                    xi as i32,
                    yi as i32,
                    zi as i32,
                    NeighborMask::from_bits(value),
                ));
            }
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

    let mut shell = VShell::new(grid);
    shell.voxels = voxels;
    Ok(shell)
}

enum ReadOutcome {
    Full,
    Eof,
}

/// Read an exact buffer, distinguishing a clean EOF at the first byte
/// from a truncated value.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> IoResult<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(ReadOutcome::Eof);
            }
            return Err(IoError::UnexpectedEof { context: "run value" });
        }
        filled += n;
    }
    Ok(ReadOutcome::Full)
}

/// Save a shell as a V-Shell file.
///
/// # Errors
///
/// Returns [`IoError`] when the file cannot be written.
pub fn save_vshell<P: AsRef<Path>>(shell: &VShell, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_vshell(shell, &mut writer, ReadWindow::FULL)
}

/// Encode a shell (or a window of it) as a V-Shell stream.
///
/// # Errors
///
/// Returns [`IoError`] on write failure or an invalid window.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn write_vshell<W: Write>(shell: &VShell, writer: &mut W, window: ReadWindow) -> IoResult<()> {
    if shell.is_empty() {
        write_header(writer, MAGIC, &shell.grid, true)?;
        return Ok(());
    }

    let dims = [
        i64::from(shell.grid.nx),
        i64::from(shell.grid.ny),
        i64::from(shell.grid.nz),
    ];
    let (start, count) = window.resolve(dims)?;
    write_header(writer, MAGIC, &shell.grid, false)?;

    let lookup: HashMap<VoxelKey, NeighborMask> = shell
        .voxels
        .iter()
        .map(|v| (v.key(), v.neighbors))
        .collect();

    let mut run_value = EMPTY;
    let mut run_len = 0_u64;
    let flush = |value: u32, len: u64, w: &mut W| -> IoResult<()> {
        if value == EMPTY || value == FILLER {
            let full = len / u64::from(u16::MAX);
            for _ in 0..full {
                w.write_all(&value.to_le_bytes())?;
                w.write_all(&u16::MAX.to_le_bytes())?;
            }
            let rem = (len % u64::from(u16::MAX)) as u16;
            if rem > 0 {
                w.write_all(&value.to_le_bytes())?;
                w.write_all(&rem.to_le_bytes())?;
            }
        } else {
            let full = len / 255;
            for _ in 0..full {
                w.write_all(&value.to_le_bytes())?;
                w.write_all(&[255])?;
            }
            let rem = (len % 255) as u8;
            if rem > 0 {
                w.write_all(&value.to_le_bytes())?;
                w.write_all(&[rem])?;
            }
        }
        Ok(())
    };

    for xi in start[0]..start[0] + count[0] {
        for zi in start[2]..start[2] + count[2] {
            for yi in start[1]..start[1] + count[1] {
                let value = lookup
                    .get(&VoxelKey::new(xi as i32, yi as i32, zi as i32))
                    .map_or(EMPTY, |mask| mask.bits());
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
    use voxel_types::VoxelGrid;

    fn grid(n: u32) -> VoxelGrid {
        VoxelGrid::new(n, n, n, Point3::new(0.5, -1.0, 2.0), f64::from(n)).unwrap()
    }

    fn mask(dx: i32, dy: i32, dz: i32) -> NeighborMask {
        NeighborMask::from_offset(dx, dy, dz).unwrap()
    }

    #[test]
    fn write_then_read_reproduces_voxels() {
        let mut shell = VShell::new(grid(3));
        shell.voxels = vec![
            ShellVoxel::new(0, 0, 0, mask(1, 0, 0)),
            ShellVoxel::new(1, 0, 0, mask(-1, 0, 0)),
            ShellVoxel::new(2, 2, 2, mask(0, 0, -1)),
        ];

        let mut buf = Vec::new();
        write_vshell(&shell, &mut buf, ReadWindow::FULL).unwrap();
        let back = read_vshell(BufReader::new(&buf[..]), ReadWindow::FULL).unwrap();

        assert_eq!(back.grid, shell.grid);
        assert_eq!(back.sorted_voxels(), shell.sorted_voxels());
    }

    #[test]
    fn adjacent_equal_masks_run_together() {
        // voxels adjacent in y order with the same mask share one run
        let mut shell = VShell::new(grid(2));
        let m = mask(0, 0, 1);
        shell.voxels = vec![
            ShellVoxel::new(0, 0, 0, m),
            ShellVoxel::new(0, 1, 0, m),
        ];

        let mut buf = Vec::new();
        write_vshell(&shell, &mut buf, ReadWindow::FULL).unwrap();

        // body: one (mask, 2) run in u8-count form, then (0, 6) in
        // u16-count form
        let marker = b"data\n";
        let data_at = buf
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();
        let body = &buf[data_at..];
        assert_eq!(body.len(), 5 + 6);
        assert_eq!(body[..4], m.bits().to_le_bytes());
        assert_eq!(body[4], 2);
        assert_eq!(body[5..9], 0_u32.to_le_bytes());
        assert_eq!(body[9..11], 6_u16.to_le_bytes());

        let back = read_vshell(BufReader::new(&buf[..]), ReadWindow::FULL).unwrap();
        assert_eq!(back.sorted_voxels(), shell.sorted_voxels());
    }

    #[test]
    fn windowed_read_filters_voxels() {
        let mut shell = VShell::new(grid(2));
        shell.voxels = vec![
            ShellVoxel::new(0, 0, 0, mask(1, 1, 1)),
            ShellVoxel::new(1, 1, 1, mask(-1, -1, -1)),
        ];

        let mut buf = Vec::new();
        write_vshell(&shell, &mut buf, ReadWindow::FULL).unwrap();
        let window = ReadWindow::new([1, 1, 1], [1, 1, 1]);
        let back = read_vshell(BufReader::new(&buf[..]), window).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back.voxels[0].key(), VoxelKey::new(1, 1, 1));
    }

    #[test]
    fn truncated_value_reports_eof() {
        let mut shell = VShell::new(grid(2));
        shell.voxels = vec![ShellVoxel::new(0, 0, 0, mask(1, 0, 0))];
        let mut buf = Vec::new();
        write_vshell(&shell, &mut buf, ReadWindow::FULL).unwrap();
        buf.truncate(buf.len() - 1);
        assert!(read_vshell(BufReader::new(&buf[..]), ReadWindow::FULL).is_err());
    }

    #[test]
    fn empty_shell_writes_zero_dims() {
        let shell = VShell::new(grid(2));
        let mut buf = Vec::new();
        write_vshell(&shell, &mut buf, ReadWindow::FULL).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("#vshell 1\ndim 0 0 0\n"));
    }
}
