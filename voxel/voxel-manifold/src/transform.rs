//! Integer symmetry transforms of the template cube.
//!
//! Template vertices live on a doubled integer lattice, so every
//! rotation and mirror of the cube is a signed permutation matrix and
//! transforms compose by exact integer multiplication.

/// A 3x3 integer matrix, row major.
pub(crate) type IMat3 = [[i32; 3]; 3];

/// The identity transform.
pub(crate) const IDENTITY: IMat3 = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

/// Quarter turn about X: (x, y, z) -> (x, z, -y).
pub(crate) const ROT_X_CW: IMat3 = [[1, 0, 0], [0, 0, 1], [0, -1, 0]];

/// Quarter turn about X, the other way: (x, y, z) -> (x, -z, y).
pub(crate) const ROT_X_CCW: IMat3 = [[1, 0, 0], [0, 0, -1], [0, 1, 0]];

/// Quarter turn about Y: (x, y, z) -> (z, y, -x).
pub(crate) const ROT_Y_CW: IMat3 = [[0, 0, 1], [0, 1, 0], [-1, 0, 0]];

/// Quarter turn about Z, counter-clockwise: (x, y, z) -> (-y, x, z).
pub(crate) const ROT_Z_CCW: IMat3 = [[0, -1, 0], [1, 0, 0], [0, 0, 1]];

/// Matrix product `a * b`.
pub(crate) fn mat_mul(a: IMat3, b: IMat3) -> IMat3 {
    let mut out = [[0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Apply a matrix to a column vector.
pub(crate) fn mat_apply(m: IMat3, v: [i32; 3]) -> [i32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Determinant; +1 for rotations, -1 for mirror transforms.
pub(crate) fn det(m: IMat3) -> i32 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// All 48 symmetries of the cube: the signed permutation matrices.
///
/// The 24 with determinant +1 are rotations; the 24 with determinant -1
/// are mirror transforms, which reverse triangle orientation.
pub(crate) fn symmetry_group() -> Vec<IMat3> {
    const PERMS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let mut out = Vec::with_capacity(48);
    for perm in PERMS {
        for signs in 0..8_u32 {
            let mut m = [[0; 3]; 3];
            for (i, row) in m.iter_mut().enumerate() {
                let sign = if signs & (1 << i) == 0 { 1 } else { -1 };
                row[perm[i]] = sign;
            }
            out.push(m);
        }
    }
    out
}
