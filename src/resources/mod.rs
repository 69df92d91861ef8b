//! Procedurally generated resource data for test scenes.
//!
//! Everything here is a pure function of its arguments; scenes stay
//! bit-identical across builds because no resource involves randomness,
//! time or I/O.

/// Row-major `dim` x `dim` checkerboard of gray texels.
///
/// Texel (h, w) is bright (0.8) when row and column parity match and dark
/// (0.2) otherwise, so neighbouring texels differ along both axes.
pub fn checkerboard_texels(dim: usize) -> Vec<[f32; 3]> {
    let mut texels = Vec::with_capacity(dim * dim);
    for h in 0..dim {
        for w in 0..dim {
            let level = if h & 1 == w & 1 { 0.8 } else { 0.2 };
            texels.push([level; 3]);
        }
    }
    texels
}
