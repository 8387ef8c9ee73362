//! STL (Stereolithography) triangle stream support.
//!
//! Both binary and ASCII formats, auto-detected on load:
//! - ASCII files start with `solid` (after optional whitespace)
//! - Binary files have an 80-byte header, a `u32` triangle count, then
//!   50 bytes per triangle (12B normal + 3 x 12B positions + 2B
//!   attribute)
//!
//! The rasterizer's inside/outside test reads per-vertex normals, so
//! the loader populates every vertex with the facet normal: the stored
//! one when it is finite and non-zero, otherwise the normal recomputed
//! from the winding.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::debug;
use voxel_types::{MeshTriangle, MeshVertex, TriMesh};

use crate::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file, auto-detecting ASCII vs binary.
///
/// # Errors
///
/// Returns [`IoError`] when the file is missing, truncated or not
/// valid STL.
///
/// # Example
///
/// ```no_run
/// use voxel_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("loaded {} triangles", mesh.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<TriMesh> {
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

    let mut reader = BufReader::new(file);

    // Read enough to decide the format.
    let mut header = [0_u8; HEADER_SIZE + 4];
    let bytes_read = reader.read(&mut header)?;
    if bytes_read < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    let header_str = String::from_utf8_lossy(&header[..bytes_read.min(HEADER_SIZE)]);
    let mesh = if header_str.trim_start().starts_with("solid") && !looks_binary(&header[..bytes_read]) {
        // ASCII: reopen from the start
        drop(reader);
        let file = File::open(path)?;
        read_stl_ascii(BufReader::new(file))?
    } else {
        read_stl_binary(&header[..bytes_read], reader)?
    };

    debug!(triangles = mesh.len(), path = %path.display(), "loaded STL");
    Ok(mesh)
}

/// Some binary STLs begin with "solid" in the comment header; nulls in
/// the first 80 bytes give them away.
fn looks_binary(header: &[u8]) -> bool {
    header.len() >= HEADER_SIZE + 4 && header[..HEADER_SIZE].contains(&0)
}

fn read_stl_binary<R: Read>(header: &[u8], mut reader: R) -> IoResult<TriMesh> {
    if header.len() < HEADER_SIZE + 4 {
        return Err(IoError::invalid_content("binary STL header truncated"));
    }

    let triangle_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    let mut mesh = TriMesh::with_capacity(triangle_count as usize);
    let mut record = [0_u8; TRIANGLE_SIZE];
    for i in 0..triangle_count {
        read_full(&mut reader, &mut record).map_err(|_| {
            IoError::invalid_content(format!("expected {triangle_count} triangles, got {i}"))
        })?;

        let normal = read_vector(&record[0..12]);
        let p0 = read_point(&record[12..24]);
        let p1 = read_point(&record[24..36]);
        let p2 = read_point(&record[36..48]);
        mesh.push(build_triangle(p0, p1, p2, normal));
    }

    Ok(mesh)
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        }
        filled += n;
    }
    Ok(())
}

fn read_f32_triple(buf: &[u8]) -> (f64, f64, f64) {
    let f = |i: usize| {
        f64::from(f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]))
    };
    (f(0), f(4), f(8))
}

fn read_point(buf: &[u8]) -> Point3<f64> {
    let (x, y, z) = read_f32_triple(buf);
    Point3::new(x, y, z)
}

fn read_vector(buf: &[u8]) -> Vector3<f64> {
    let (x, y, z) = read_f32_triple(buf);
    Vector3::new(x, y, z)
}

/// Build a triangle, preferring the stored facet normal and falling
/// back to the winding normal.
fn build_triangle(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>, normal: Vector3<f64>) -> MeshTriangle {
    if !normal.iter().all(|c| c.is_finite()) || normal.norm_squared() <= f64::EPSILON {
        return MeshTriangle::from_positions(p0, p1, p2);
    }
    let n = normal.normalize();
    MeshTriangle::new(
        MeshVertex::new(p0, n),
        MeshVertex::new(p1, n),
        MeshVertex::new(p2, n),
    )
}

fn read_stl_ascii<R: BufRead>(reader: R) -> IoResult<TriMesh> {
    let mut mesh = TriMesh::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut facet_normal = Vector3::zeros();
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0].to_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                facet_normal = Vector3::zeros();
                if parts.len() >= 5 && parts[1].eq_ignore_ascii_case("normal") {
                    let x: f64 = parts[2].parse()?;
                    let y: f64 = parts[3].parse()?;
                    let z: f64 = parts[4].parse()?;
                    facet_normal = Vector3::new(x, y, z);
                }
            }
            "outer" => {
                if parts.len() >= 2 && parts[1].eq_ignore_ascii_case("loop") {
                    in_loop = true;
                    vertices.clear();
                }
            }
            "vertex" => {
                if in_loop && parts.len() >= 4 {
                    let x: f64 = parts[1].parse()?;
                    let y: f64 = parts[2].parse()?;
                    let z: f64 = parts[3].parse()?;
                    vertices.push(Point3::new(x, y, z));
                }
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                if in_facet && vertices.len() == 3 {
                    mesh.push(build_triangle(vertices[0], vertices[1], vertices[2], facet_normal));
                }
                in_facet = false;
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}

/// Save a mesh to an STL file.
///
/// # Errors
///
/// Returns [`IoError`] when the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use voxel_io::{load_stl, save_stl};
///
/// let mesh = load_stl("input.stl").unwrap();
/// save_stl(&mesh, "output.stl", true).unwrap(); // binary
/// save_stl(&mesh, "output_ascii.stl", false).unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &TriMesh, path: P, binary: bool) -> IoResult<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    if binary {
        write_stl_binary(mesh, writer)
    } else {
        write_stl_ascii(mesh, writer)
    }
}

fn facet_normal(tri: &MeshTriangle) -> Vector3<f64> {
    tri.face_normal().unwrap_or_else(Vector3::zeros)
}

fn write_stl_binary<W: Write>(mesh: &TriMesh, mut writer: W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text: &[u8] = b"Binary STL generated by voxel-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    // meshes beyond u32 triangles are not representable in STL
    let count = mesh.len() as u32;
    writer.write_all(&count.to_le_bytes())?;

    #[allow(clippy::cast_possible_truncation)]
    let f = |v: f64| (v as f32).to_le_bytes();
    for tri in &mesh.triangles {
        let n = facet_normal(tri);
        writer.write_all(&f(n.x))?;
        writer.write_all(&f(n.y))?;
        writer.write_all(&f(n.z))?;
        for v in tri.vertices() {
            writer.write_all(&f(v.position.x))?;
            writer.write_all(&f(v.position.y))?;
            writer.write_all(&f(v.position.z))?;
        }
        writer.write_all(&0_u16.to_le_bytes())?;
    }
    Ok(())
}

fn write_stl_ascii<W: Write>(mesh: &TriMesh, mut writer: W) -> IoResult<()> {
    writeln!(writer, "solid mesh")?;
    for tri in &mesh.triangles {
        let n = facet_normal(tri);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in tri.vertices() {
            writeln!(
                writer,
                "      vertex {:.6e} {:.6e} {:.6e}",
                v.position.x, v.position.y, v.position.z
            )?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid mesh")?;
    Ok(())
}
