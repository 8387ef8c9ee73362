//! The shared ASCII header of binvox and V-Shell files.

use std::io::{BufRead, Write};

use nalgebra::Point3;
use voxel_types::VoxelGrid;

use crate::{IoError, IoResult};

/// Read one `\n`-terminated line.
fn read_line<R: BufRead>(reader: &mut R, context: &'static str) -> IoResult<String> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(IoError::UnexpectedEof { context });
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Parse the header: magic, `dim`, `translate`, `scale` and `data`.
pub(crate) fn read_header<R: BufRead>(reader: &mut R, magic: &'static str) -> IoResult<VoxelGrid> {
    let first = read_line(reader, "magic")?;
    if first != magic {
        return Err(IoError::BadMagic {
            expected: magic,
            got: first,
        });
    }

    let dim_line = read_line(reader, "dimensions")?;
    let parts: Vec<&str> = dim_line.split_whitespace().collect();
    if parts.len() != 4 || parts[0] != "dim" {
        return Err(IoError::invalid_content(format!("unable to parse dimensions: {dim_line}")));
    }
    let nx: u32 = parts[1].parse()?;
    let ny: u32 = parts[2].parse()?;
    let nz: u32 = parts[3].parse()?;

    let translate_line = read_line(reader, "translation")?;
    let parts: Vec<&str> = translate_line.split_whitespace().collect();
    if parts.len() != 4 || parts[0] != "translate" {
        return Err(IoError::invalid_content(format!(
            "unable to parse translation: {translate_line}"
        )));
    }
    let tx: f64 = parts[1].parse()?;
    let ty: f64 = parts[2].parse()?;
    let tz: f64 = parts[3].parse()?;

    let scale_line = read_line(reader, "scale")?;
    let parts: Vec<&str> = scale_line.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "scale" {
        return Err(IoError::invalid_content(format!("unable to parse scale: {scale_line}")));
    }
    let scale: f64 = parts[1].parse()?;

    let data_line = read_line(reader, "data marker")?;
    if data_line != "data" {
        return Err(IoError::invalid_content(format!(
            "could not find data section: {data_line}"
        )));
    }

    Ok(VoxelGrid {
        nx,
        ny,
        nz,
        translation: Point3::new(tx, ty, tz),
        scale,
    })
}

/// Write the header for the given grid.
pub(crate) fn write_header<W: Write>(
    writer: &mut W,
    magic: &str,
    grid: &VoxelGrid,
    empty: bool,
) -> IoResult<()> {
    // an empty model writes zero dimensions, mirroring the reader's
    // tolerance for them
    let (nx, ny, nz) = if empty { (0, 0, 0) } else { (grid.nx, grid.ny, grid.nz) };
    write!(
        writer,
        "{magic}\ndim {nx} {ny} {nz}\ntranslate {} {} {}\nscale {}\ndata\n",
        grid.translation.x, grid.translation.y, grid.translation.z, grid.scale
    )?;
    Ok(())
}
