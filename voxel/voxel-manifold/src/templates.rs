//! Canonical surface patches over the dual cell.
//!
//! Vertices use doubled integer coordinates so that the half-voxel
//! positions -0.5, 0 and +0.5 become exact lattice points -1, 0, +1.
//! Triangles are wound counter-clockwise seen from outside the solid.

use crate::transform::{mat_apply, mat_mul, symmetry_group, IMat3, IDENTITY, ROT_X_CCW, ROT_X_CW, ROT_Y_CW, ROT_Z_CCW};

/// A triangle over the doubled template lattice.
pub(crate) type PatchTri = [[i32; 3]; 3];

/// A patch: the triangle list emitted for one cell configuration class.
#[derive(Debug, Clone)]
pub(crate) struct Patch {
    pub tris: Vec<PatchTri>,
}

/// Cell corner positions on the doubled lattice, indexed g0..g7.
pub(crate) const CORNERS: [[i32; 3]; 8] = [
    [-1, 1, -1],  // g0
    [1, 1, -1],   // g1
    [1, -1, -1],  // g2
    [-1, -1, -1], // g3
    [-1, 1, 1],   // g4
    [1, 1, 1],    // g5
    [1, -1, 1],   // g6
    [-1, -1, 1],  // g7
];

// Configuration bit masks of the canonical orientation of each patch.
pub(crate) const CFG_SINGLE_CORNER: u8 = 0x01; // g0
pub(crate) const CFG_SINGLE_FACE: u8 = 0x33; // g0 g1 g4 g5
pub(crate) const CFG_TWO_ADJACENT: u8 = 0x03; // g0 g1
pub(crate) const CFG_SADDLE: u8 = 0x05; // g0 g2
pub(crate) const CFG_THREE_ADJACENT: u8 = 0x07; // g0 g1 g2
pub(crate) const CFG_CLAW: u8 = 0x27; // g0 g1 g2 g5
pub(crate) const CFG_EDGE_PLUS_CORNER: u8 = 0xB4; // g2 g4 g5 g7
pub(crate) const CFG_SNAKE: u8 = 0x63; // g0 g1 g5 g6
pub(crate) const CFG_PARALLEL_EDGES: u8 = 0xC3; // g0 g1 g6 g7
pub(crate) const CFG_G234: u8 = 0x1C; // g2 g3 g4
pub(crate) const CFG_G03567: u8 = 0xE9; // g0 g3 g5 g6 g7
pub(crate) const CFG_G12467: u8 = 0xD6; // g1 g2 g4 g6 g7
pub(crate) const CFG_G024567: u8 = 0xF5; // g0 g2 g4 g5 g6 g7
pub(crate) const CFG_G13456: u8 = 0x7A; // g1 g3 g4 g5 g6
pub(crate) const CFG_BODY_DIAGONAL: u8 = 0x41; // g0 g6
pub(crate) const CFG_TRIPOD: u8 = 0x25; // g0 g2 g5
pub(crate) const CFG_TETRAHEDRON: u8 = 0xA5; // g0 g2 g5 g7

/// Corner cap around g0: three quarter-face quads meeting at the cell
/// center.
const SINGLE_CORNER: [PatchTri; 6] = [
    [[-1, 0, -1], [0, 0, -1], [0, 0, 0]],
    [[-1, 0, -1], [0, 0, 0], [-1, 0, 0]],
    [[0, 0, 0], [0, 1, 0], [-1, 1, 0]],
    [[0, 0, 0], [-1, 1, 0], [-1, 0, 0]],
    [[0, 0, 0], [0, 0, -1], [0, 1, -1]],
    [[0, 0, 0], [0, 1, -1], [0, 1, 0]],
];

/// Full face on the y = 0 plane, split into four quads for subdivision
/// compatibility with the partial patches.
const SINGLE_FACE: [PatchTri; 8] = [
    [[-1, 0, -1], [0, 0, -1], [0, 0, 0]],
    [[-1, 0, -1], [0, 0, 0], [-1, 0, 0]],
    [[0, 0, -1], [1, 0, -1], [1, 0, 0]],
    [[0, 0, -1], [1, 0, 0], [0, 0, 0]],
    [[-1, 0, 0], [0, 0, 0], [0, 0, 1]],
    [[-1, 0, 0], [0, 0, 1], [-1, 0, 1]],
    [[0, 0, 0], [1, 0, 0], [1, 0, 1]],
    [[0, 0, 0], [1, 0, 1], [0, 0, 1]],
];

/// Strip over the shared edge of two adjacent filled corners (g0, g1).
const TWO_ADJACENT: [PatchTri; 8] = [
    [[-1, 0, 0], [0, 0, 0], [0, 1, 0]],
    [[-1, 0, 0], [0, 1, 0], [-1, 1, 0]],
    [[0, 0, 0], [1, 0, 0], [1, 1, 0]],
    [[0, 0, 0], [1, 1, 0], [0, 1, 0]],
    [[-1, 0, 0], [-1, 0, -1], [0, 0, -1]],
    [[-1, 0, 0], [0, 0, -1], [0, 0, 0]],
    [[0, 0, 0], [0, 0, -1], [1, 0, -1]],
    [[0, 0, 0], [1, 0, -1], [1, 0, 0]],
];

/// Face-diagonal pair (g0, g2): the ambiguous case, resolved by bridging
/// the two caps with a four-triangle saddle ring.
const SADDLE: [PatchTri; 8] = [
    [[-1, 1, 0], [-1, 0, 0], [0, -1, 0]],
    [[-1, 1, 0], [0, -1, 0], [1, -1, 0]],
    [[-1, 1, 0], [1, -1, 0], [1, 0, 0]],
    [[-1, 1, 0], [1, 0, 0], [0, 1, 0]],
    [[-1, 0, 0], [-1, 0, -1], [0, -1, -1]],
    [[-1, 0, 0], [0, -1, -1], [0, -1, 0]],
    [[1, 0, 0], [1, 0, -1], [0, 1, -1]],
    [[1, 0, 0], [0, 1, -1], [0, 1, 0]],
];

/// L of three corners on the bottom face (g0, g1, g2).
const THREE_ADJACENT: [PatchTri; 8] = [
    [[-1, 0, 0], [1, 0, 0], [1, 1, 0]],
    [[-1, 0, 0], [1, 1, 0], [-1, 1, 0]],
    [[-1, 0, -1], [0, 0, -1], [0, 0, 0]],
    [[-1, 0, -1], [0, 0, 0], [-1, 0, 0]],
    [[0, 0, 0], [0, 0, -1], [0, -1, -1]],
    [[0, 0, 0], [0, -1, -1], [0, -1, 0]],
    [[0, 0, 0], [0, -1, 0], [1, -1, 0]],
    [[0, 0, 0], [1, -1, 0], [1, 0, 0]],
];

/// Two quarter-face quads; three rotated copies tile the claw
/// configuration (a corner plus its three edge neighbors, g0 g1 g2 g5).
const HALF_CORNER: [PatchTri; 4] = [
    [[-1, 0, -1], [0, 0, -1], [0, 0, 0]],
    [[-1, 0, -1], [0, 0, 0], [-1, 0, 0]],
    [[0, 0, 0], [0, 1, 0], [-1, 1, 0]],
    [[0, 0, 0], [-1, 1, 0], [-1, 0, 0]],
];

/// Bottom-face edge plus a body-diagonal corner (g2 g3 g4).
const G234: [PatchTri; 12] = [
    [[0, 0, -1], [-1, 0, -1], [-1, 1, 0]],
    [[0, 0, -1], [-1, 1, 0], [0, 1, 0]],
    [[0, 0, -1], [0, 1, 0], [0, 0, 0]],
    [[0, 0, -1], [0, 0, 0], [1, 0, -1]],
    [[0, 0, 0], [1, 0, 0], [1, 0, -1]],
    [[0, 0, 0], [1, -1, 0], [1, 0, 0]],
    [[0, 0, 0], [0, -1, 0], [1, -1, 0]],
    [[0, 0, 0], [0, 0, 1], [0, -1, 0]],
    [[0, 0, 0], [0, 1, 1], [0, 0, 1]],
    [[0, 0, 0], [0, 1, 0], [0, 1, 1]],
    [[0, -1, 0], [0, 0, 1], [-1, 0, 1]],
    [[0, -1, 0], [-1, 0, 1], [-1, -1, 0]],
];

/// Path of three edges, g0-g1-g5-g6.
const SNAKE: [PatchTri; 8] = [
    [[-1, 0, -1], [1, 0, -1], [1, 0, 0]],
    [[-1, 0, -1], [1, 0, 0], [-1, 0, 0]],
    [[0, 1, 0], [0, -1, 0], [0, -1, 1]],
    [[0, 1, 0], [0, -1, 1], [0, 1, 1]],
    [[0, 0, 0], [0, 1, 0], [-1, 1, 0]],
    [[0, 0, 0], [-1, 1, 0], [-1, 0, 0]],
    [[0, 0, 0], [1, 0, 0], [1, -1, 0]],
    [[0, 0, 0], [1, -1, 0], [0, -1, 0]],
];

/// Tetrahedral four-corner case g2 g4 g5 g7: an edge on the top face
/// with an oblique wall and a chord wall below.
const G2457: [PatchTri; 6] = [
    [[1, -1, 0], [1, 0, 1], [0, -1, 1]],
    [[0, -1, 1], [1, 0, 1], [0, 0, 1]],
    [[0, 0, -1], [0, -1, -1], [-1, -1, 0]],
    [[0, 0, -1], [-1, -1, 0], [-1, 1, 0]],
    [[0, 0, -1], [-1, 1, 0], [1, 1, 0]],
    [[0, 0, -1], [1, 1, 0], [1, 0, -1]],
];

/// Five-corner case g1 g2 g4 g6 g7.
const G12467: [PatchTri; 10] = [
    [[1, 0, 0], [1, 1, 0], [0, 1, 1]],
    [[1, 0, 0], [0, 1, 1], [0, 0, 1]],
    [[1, 0, 0], [0, 0, 1], [1, 0, 1]],
    [[0, 0, -1], [0, -1, -1], [0, -1, 0]],
    [[0, 0, -1], [0, -1, 0], [0, 0, 0]],
    [[0, 0, -1], [0, 0, 0], [-1, 0, 0]],
    [[0, 0, -1], [-1, 0, 0], [-1, 1, 0]],
    [[0, 0, -1], [-1, 1, 0], [0, 1, -1]],
    [[0, 0, 0], [0, -1, 0], [-1, -1, 0]],
    [[0, 0, 0], [-1, -1, 0], [-1, 0, 0]],
];

/// Five-corner case g0 g3 g5 g6 g7.
const G03567: [PatchTri; 10] = [
    [[-1, 0, 0], [-1, 0, 1], [0, 0, 1]],
    [[-1, 0, 0], [0, 0, 1], [0, 1, 1]],
    [[-1, 0, 0], [0, 1, 1], [-1, 1, 0]],
    [[0, 0, -1], [0, 1, -1], [1, 1, 0]],
    [[0, 0, -1], [1, 1, 0], [1, 0, 0]],
    [[0, 0, 0], [0, 0, -1], [1, 0, 0]],
    [[0, 0, 0], [1, 0, 0], [1, -1, 0]],
    [[0, 0, 0], [1, -1, 0], [0, -1, 0]],
    [[0, 0, 0], [0, -1, 0], [0, -1, -1]],
    [[0, 0, 0], [0, -1, -1], [0, 0, -1]],
];

/// Six-corner complement of a face-diagonal pair (all but g1, g3): two
/// separate chord caps over the empty corners.
const G024567: [PatchTri; 6] = [
    [[-1, 0, 0], [-1, 0, -1], [0, -1, -1]],
    [[-1, 0, 0], [0, -1, -1], [0, -1, 0]],
    [[-1, 0, 0], [0, -1, 0], [-1, -1, 0]],
    [[1, 0, 0], [1, 0, -1], [0, 1, -1]],
    [[1, 0, 0], [0, 1, -1], [0, 1, 0]],
    [[1, 0, 0], [0, 1, 0], [1, 1, 0]],
];

/// Five-corner complement of a tripod (all but g0, g2, g7): three chord
/// walls.
const G13456: [PatchTri; 6] = [
    [[-1, -1, 0], [0, -1, 1], [0, 0, 1]],
    [[-1, -1, 0], [0, 0, 1], [-1, 0, 1]],
    [[0, -1, -1], [1, 0, -1], [1, 0, 0]],
    [[0, -1, -1], [1, 0, 0], [1, -1, 0]],
    [[-1, 0, -1], [-1, 1, 0], [0, 1, 0]],
    [[-1, 0, -1], [0, 1, 0], [0, 1, -1]],
];

/// Two parallel opposite edges (g0 g1 and g6 g7): two oblique walls.
const G0167: [PatchTri; 4] = [
    [[1, 1, 0], [-1, 1, 0], [-1, 0, 1]],
    [[1, 1, 0], [-1, 0, 1], [1, 0, 1]],
    [[-1, 0, -1], [1, 0, -1], [1, -1, 0]],
    [[-1, 0, -1], [1, -1, 0], [-1, -1, 0]],
];

fn transformed(tris: &[PatchTri], m: IMat3) -> Vec<PatchTri> {
    tris.iter()
        .map(|t| [mat_apply(m, t[0]), mat_apply(m, t[1]), mat_apply(m, t[2])])
        .collect()
}

/// A corner cap rotated from g0 onto the given corner.
///
/// The cap is symmetric under the three rotations fixing its corner, so
/// any rotation taking g0 to the target yields the same surface.
fn cap_at(corner: usize, rotations: &[IMat3]) -> Vec<PatchTri> {
    let rot = rotations
        .iter()
        .find(|m| mat_apply(**m, CORNERS[0]) == CORNERS[corner]);
    match rot {
        Some(m) => transformed(&SINGLE_CORNER, *m),
        None => unreachable!("every corner is reachable by a rotation"),
    }
}

/// Build the canonical patch set.
///
/// Returns the patches together with the configuration bit mask each one
/// serves in its canonical orientation, in registration priority order.
pub(crate) fn canonical_patches() -> Vec<(u8, Patch)> {
    let rotations: Vec<IMat3> = symmetry_group()
        .into_iter()
        .filter(|m| crate::transform::det(*m) == 1)
        .collect();

    // The claw is three rotated half-corner pieces glued together.
    let mut claw = transformed(&HALF_CORNER, IDENTITY);
    claw.extend(transformed(&HALF_CORNER, mat_mul(ROT_Z_CCW, ROT_X_CW)));
    claw.extend(transformed(&HALF_CORNER, mat_mul(ROT_Y_CW, ROT_X_CCW)));

    // Multi-corner composites assembled from independent caps.
    let mut body_diagonal = cap_at(0, &rotations);
    body_diagonal.extend(cap_at(6, &rotations));

    let mut tripod = cap_at(0, &rotations);
    tripod.extend(cap_at(2, &rotations));
    tripod.extend(cap_at(5, &rotations));

    let mut tetrahedron = cap_at(0, &rotations);
    tetrahedron.extend(cap_at(2, &rotations));
    tetrahedron.extend(cap_at(5, &rotations));
    tetrahedron.extend(cap_at(7, &rotations));

    vec![
        (CFG_SINGLE_CORNER, Patch { tris: SINGLE_CORNER.to_vec() }),
        (CFG_SINGLE_FACE, Patch { tris: SINGLE_FACE.to_vec() }),
        (CFG_TWO_ADJACENT, Patch { tris: TWO_ADJACENT.to_vec() }),
        (CFG_SADDLE, Patch { tris: SADDLE.to_vec() }),
        (CFG_THREE_ADJACENT, Patch { tris: THREE_ADJACENT.to_vec() }),
        (CFG_CLAW, Patch { tris: claw }),
        (CFG_EDGE_PLUS_CORNER, Patch { tris: G2457.to_vec() }),
        (CFG_SNAKE, Patch { tris: SNAKE.to_vec() }),
        (CFG_PARALLEL_EDGES, Patch { tris: G0167.to_vec() }),
        (CFG_G234, Patch { tris: G234.to_vec() }),
        (CFG_G03567, Patch { tris: G03567.to_vec() }),
        (CFG_G12467, Patch { tris: G12467.to_vec() }),
        (CFG_G024567, Patch { tris: G024567.to_vec() }),
        (CFG_G13456, Patch { tris: G13456.to_vec() }),
        (CFG_BODY_DIAGONAL, Patch { tris: body_diagonal }),
        (CFG_TRIPOD, Patch { tris: tripod }),
        (CFG_TETRAHEDRON, Patch { tris: tetrahedron }),
    ]
}
