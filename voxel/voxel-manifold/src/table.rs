//! The 256-entry configuration dispatch table.
//!
//! Rather than a hand-written switch over every configuration, the table
//! is generated once from the canonical patches: each patch is pushed
//! through all 48 cube symmetries, and each resulting configuration (and
//! its complement, with winding inverted) records the patch, the integer
//! transform and whether to flip triangle orientation on emission.

use std::sync::OnceLock;

use crate::templates::{canonical_patches, Patch, CORNERS};
use crate::transform::{det, mat_apply, symmetry_group, IDENTITY, IMat3};

/// How to mesh one cell configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CaseEntry {
    /// Index into [`DispatchTable::patches`].
    pub patch: usize,
    /// Transform applied to template vertices before placement.
    pub mat: IMat3,
    /// Reverse triangle winding on emission.
    pub flip: bool,
}

/// The generated dispatch table.
pub(crate) struct DispatchTable {
    pub patches: Vec<Patch>,
    pub cases: [Option<CaseEntry>; 256],
}

/// Lazily built singleton table.
pub(crate) fn dispatch_table() -> &'static DispatchTable {
    static TABLE: OnceLock<DispatchTable> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

/// Index of a corner position on the doubled lattice.
fn corner_index(p: [i32; 3]) -> usize {
    match CORNERS.iter().position(|&c| c == p) {
        Some(i) => i,
        // signed permutations map the corner lattice onto itself
        None => unreachable!("transformed corner left the lattice"),
    }
}

/// Image of a configuration bit mask under a cube symmetry.
fn transform_config(config: u8, m: IMat3) -> u8 {
    let mut out = 0_u8;
    for (i, &corner) in CORNERS.iter().enumerate() {
        if config & (1 << i) != 0 {
            out |= 1 << corner_index(mat_apply(m, corner));
        }
    }
    out
}

fn build_table() -> DispatchTable {
    let canonical = canonical_patches();
    let transforms = symmetry_group();

    let mut patches = Vec::with_capacity(canonical.len());
    let mut configs = Vec::with_capacity(canonical.len());
    for (config, patch) in canonical {
        configs.push(config);
        patches.push(patch);
    }

    let mut cases: [Option<CaseEntry>; 256] = [None; 256];

    // Seed every patch with its own canonical configuration so that each
    // template serves at least the orientation it was authored for.
    for (pidx, &config) in configs.iter().enumerate() {
        cases[config as usize] = Some(CaseEntry {
            patch: pidx,
            mat: IDENTITY,
            flip: false,
        });
    }

    // Direct images: an orientation-reversing transform flips winding.
    for (pidx, &config) in configs.iter().enumerate() {
        for &m in &transforms {
            let c = transform_config(config, m) as usize;
            if cases[c].is_none() {
                cases[c] = Some(CaseEntry {
                    patch: pidx,
                    mat: m,
                    flip: det(m) < 0,
                });
            }
        }
    }

    // Complements: the same surface bounds the inverse solid with the
    // opposite orientation, so the flip sense inverts.
    for (pidx, &config) in configs.iter().enumerate() {
        for &m in &transforms {
            let c = (transform_config(config, m) ^ 0xFF) as usize;
            if cases[c].is_none() {
                cases[c] = Some(CaseEntry {
                    patch: pidx,
                    mat: m,
                    flip: det(m) > 0,
                });
            }
        }
    }

    DispatchTable { patches, cases }
}
