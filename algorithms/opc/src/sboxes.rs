//! Fixed substitution and diffusion tables for the round function.
//!
//! The four byte boxes are bijections over `0..=255` paired as exact
//! inverses: `BSB0[FSB0[x]] == x` and `BSB1[FSB1[x]] == x`. The diffusion
//! index table drives the 32-lane binary layer of the round-subkey
//! generator: output lane `i` is the XOR of the sixteen input lanes listed
//! in `DIFFUSION_ROWS[i]`.

// =============================================================================
// FORWARD SUBSTITUTION BOXES
// =============================================================================

/// Forward byte substitution box 0.
pub(crate) const FSB0: [u8; 256] = [
    0xC4, 0x08, 0xAE, 0x34, 0x74, 0x88, 0xC6, 0xF5, 0xB8, 0x36, 0x71, 0x97, 0x49, 0x4B, 0xFF, 0x64,
    0x6E, 0x60, 0x4E, 0x6A, 0x87, 0x29, 0x55, 0x17, 0xB0, 0x1C, 0x46, 0xDE, 0xEF, 0x2A, 0xD7, 0x93,
    0x5C, 0xDA, 0x37, 0x48, 0x83, 0x01, 0x65, 0xF9, 0xDD, 0xA1, 0xE3, 0x53, 0xC9, 0x2B, 0xD3, 0x20,
    0x51, 0x9F, 0x3B, 0xC5, 0xDB, 0xD2, 0x59, 0xD8, 0x96, 0x68, 0x3C, 0x00, 0x84, 0x8D, 0x52, 0xDC,
    0x58, 0xA4, 0xC8, 0x38, 0x67, 0x54, 0x30, 0x2E, 0xA7, 0x42, 0x06, 0x61, 0x81, 0xCA, 0x76, 0xE7,
    0x07, 0x92, 0x14, 0x9E, 0x0B, 0x0F, 0xCB, 0xB7, 0xF1, 0x1B, 0x8F, 0x7C, 0xD5, 0xED, 0x40, 0xA0,
    0x5D, 0xC1, 0xA9, 0x5F, 0x91, 0x85, 0x90, 0xAA, 0x2F, 0x1D, 0xA5, 0xE1, 0xB6, 0xD6, 0x0C, 0x8C,
    0xF6, 0x3E, 0xE8, 0xEC, 0xF0, 0x6D, 0x02, 0x78, 0x12, 0x9D, 0xBA, 0xAB, 0x16, 0x0E, 0x9B, 0x3F,
    0xFA, 0xEA, 0x13, 0x56, 0x9C, 0xC3, 0xF8, 0x09, 0xDF, 0x89, 0xCD, 0x69, 0xE0, 0x50, 0xC0, 0xB2,
    0x6B, 0x21, 0x44, 0xC2, 0x8A, 0x31, 0x1A, 0xBE, 0x2C, 0x35, 0x1F, 0x63, 0xA8, 0x23, 0x4C, 0x5B,
    0xE6, 0xD1, 0x15, 0xE4, 0x82, 0x10, 0xBD, 0x7E, 0x41, 0xFE, 0xB5, 0x9A, 0x77, 0x47, 0xAF, 0xFD,
    0xB9, 0x98, 0x73, 0x4F, 0xBF, 0x24, 0x99, 0xFB, 0x72, 0xB3, 0xB4, 0x79, 0x6C, 0x22, 0xCF, 0x33,
    0x70, 0x27, 0xBC, 0xE5, 0x8E, 0xF7, 0x18, 0xF4, 0xEE, 0x5E, 0xE2, 0xF2, 0xD0, 0x95, 0xE9, 0x39,
    0x7A, 0xEB, 0x80, 0xBB, 0xCC, 0x25, 0x5A, 0xCE, 0x8B, 0x43, 0x1E, 0x32, 0x3D, 0x7D, 0x57, 0x3A,
    0x86, 0x0D, 0xAC, 0x05, 0x66, 0x03, 0xD9, 0x4D, 0x7F, 0xA6, 0xA2, 0xB1, 0x62, 0x2D, 0x04, 0x28,
    0xFC, 0x6F, 0x0A, 0x11, 0x26, 0xC7, 0x94, 0xA3, 0x7B, 0x75, 0x19, 0xD4, 0xF3, 0x4A, 0x45, 0xAD,
];

/// Forward byte substitution box 1.
pub(crate) const FSB1: [u8; 256] = [
    0x0F, 0x3A, 0x71, 0xCD, 0xA2, 0xE7, 0xC5, 0x50, 0x00, 0xD5, 0x49, 0xE6, 0x37, 0x5C, 0xDC, 0x23,
    0xF1, 0x62, 0xB1, 0x73, 0x51, 0xEA, 0x38, 0xA8, 0x15, 0xFD, 0xDB, 0x31, 0xBB, 0x4E, 0x43, 0x18,
    0x04, 0xB3, 0xF0, 0x1B, 0x7E, 0xC7, 0x74, 0x53, 0xB4, 0xF8, 0x30, 0xD3, 0x6C, 0x9E, 0x02, 0x44,
    0x9D, 0xDA, 0x58, 0x03, 0xB9, 0x81, 0xC6, 0xEB, 0xF5, 0x2F, 0x35, 0x25, 0xD8, 0xC0, 0x40, 0xE3,
    0x07, 0xF3, 0x0C, 0x67, 0xED, 0x4D, 0x28, 0xFA, 0x9B, 0xA4, 0x2B, 0x64, 0x55, 0x97, 0x22, 0x2E,
    0x32, 0xD6, 0xD1, 0xA3, 0x27, 0x66, 0x59, 0xC4, 0xAC, 0x94, 0xD2, 0x01, 0xE1, 0x52, 0xB2, 0x45,
    0xAF, 0xE9, 0x72, 0x6E, 0x46, 0x54, 0xE0, 0xDD, 0x3C, 0x41, 0xA1, 0xCB, 0x5F, 0xEE, 0x5D, 0xCF,
    0x17, 0x05, 0xFF, 0x12, 0x6F, 0x7C, 0xAA, 0x82, 0x26, 0x4B, 0x2A, 0x29, 0x8B, 0x1C, 0xC9, 0x99,
    0xCE, 0x68, 0x90, 0x9A, 0x95, 0xEF, 0xE4, 0xE2, 0x8D, 0x06, 0xC1, 0xBA, 0xC3, 0x9C, 0xF2, 0x3D,
    0x39, 0xF6, 0x8A, 0xAD, 0xD4, 0xE8, 0x7F, 0x13, 0x1A, 0x33, 0x61, 0x5B, 0xD9, 0xC8, 0x0E, 0xBD,
    0xD0, 0x36, 0x78, 0xFC, 0x0B, 0xA6, 0x60, 0xCA, 0x89, 0xA0, 0x7D, 0x11, 0x4F, 0x16, 0xB8, 0x48,
    0x88, 0x08, 0xB0, 0xB6, 0x6D, 0x4C, 0xBF, 0x91, 0x92, 0x3E, 0x83, 0xCC, 0x1D, 0x2D, 0x76, 0x19,
    0x7A, 0x96, 0x65, 0x42, 0xDE, 0xAB, 0x34, 0xB7, 0x3F, 0xBC, 0xEC, 0x80, 0xA9, 0x70, 0x4A, 0x8C,
    0xA7, 0x5A, 0x8F, 0x5E, 0x21, 0xF9, 0xE5, 0xA5, 0xB5, 0x98, 0x86, 0x75, 0x14, 0x20, 0x93, 0x63,
    0xD7, 0x6A, 0xFE, 0x47, 0x57, 0x2C, 0x24, 0x79, 0x1E, 0x56, 0xC2, 0x8E, 0x6B, 0x7B, 0xF4, 0xAE,
    0x9F, 0x85, 0x1F, 0x09, 0x84, 0xDF, 0x3B, 0x0D, 0x10, 0x69, 0x77, 0x0A, 0xF7, 0xFB, 0x87, 0xBE,
];

// =============================================================================
// BACKWARD SUBSTITUTION BOXES
// =============================================================================

/// Inverse of [`FSB0`].
pub(crate) const BSB0: [u8; 256] = [
    0x3B, 0x25, 0x76, 0xE5, 0xEE, 0xE3, 0x4A, 0x50, 0x01, 0x87, 0xF2, 0x54, 0x6E, 0xE1, 0x7D, 0x55,
    0xA5, 0xF3, 0x78, 0x82, 0x52, 0xA2, 0x7C, 0x17, 0xC6, 0xFA, 0x96, 0x59, 0x19, 0x69, 0xDA, 0x9A,
    0x2F, 0x91, 0xBD, 0x9D, 0xB5, 0xD5, 0xF4, 0xC1, 0xEF, 0x15, 0x1D, 0x2D, 0x98, 0xED, 0x47, 0x68,
    0x46, 0x95, 0xDB, 0xBF, 0x03, 0x99, 0x09, 0x22, 0x43, 0xCF, 0xDF, 0x32, 0x3A, 0xDC, 0x71, 0x7F,
    0x5E, 0xA8, 0x49, 0xD9, 0x92, 0xFE, 0x1A, 0xAD, 0x23, 0x0C, 0xFD, 0x0D, 0x9E, 0xE7, 0x12, 0xB3,
    0x8D, 0x30, 0x3E, 0x2B, 0x45, 0x16, 0x83, 0xDE, 0x40, 0x36, 0xD6, 0x9F, 0x20, 0x60, 0xC9, 0x63,
    0x11, 0x4B, 0xEC, 0x9B, 0x0F, 0x26, 0xE4, 0x44, 0x39, 0x8B, 0x13, 0x90, 0xBC, 0x75, 0x10, 0xF1,
    0xC0, 0x0A, 0xB8, 0xB2, 0x04, 0xF9, 0x4E, 0xAC, 0x77, 0xBB, 0xD0, 0xF8, 0x5B, 0xDD, 0xA7, 0xE8,
    0xD2, 0x4C, 0xA4, 0x24, 0x3C, 0x65, 0xE0, 0x14, 0x05, 0x89, 0x94, 0xD8, 0x6F, 0x3D, 0xC4, 0x5A,
    0x66, 0x64, 0x51, 0x1F, 0xF6, 0xCD, 0x38, 0x0B, 0xB1, 0xB6, 0xAB, 0x7E, 0x84, 0x79, 0x53, 0x31,
    0x5F, 0x29, 0xEA, 0xF7, 0x41, 0x6A, 0xE9, 0x48, 0x9C, 0x62, 0x67, 0x7B, 0xE2, 0xFF, 0x02, 0xAE,
    0x18, 0xEB, 0x8F, 0xB9, 0xBA, 0xAA, 0x6C, 0x57, 0x08, 0xB0, 0x7A, 0xD3, 0xC2, 0xA6, 0x97, 0xB4,
    0x8E, 0x61, 0x93, 0x85, 0x00, 0x33, 0x06, 0xF5, 0x42, 0x2C, 0x4D, 0x56, 0xD4, 0x8A, 0xD7, 0xBE,
    0xCC, 0xA1, 0x35, 0x2E, 0xFB, 0x5C, 0x6D, 0x1E, 0x37, 0xE6, 0x21, 0x34, 0x3F, 0x28, 0x1B, 0x88,
    0x8C, 0x6B, 0xCA, 0x2A, 0xA3, 0xC3, 0xA0, 0x4F, 0x72, 0xCE, 0x81, 0xD1, 0x73, 0x5D, 0xC8, 0x1C,
    0x74, 0x58, 0xCB, 0xFC, 0xC7, 0x07, 0x70, 0xC5, 0x86, 0x27, 0x80, 0xB7, 0xF0, 0xAF, 0xA9, 0x0E,
];

/// Inverse of [`FSB1`].
pub(crate) const BSB1: [u8; 256] = [
    0x08, 0x5B, 0x2E, 0x33, 0x20, 0x71, 0x89, 0x40, 0xB1, 0xF3, 0xFB, 0xA4, 0x42, 0xF7, 0x9E, 0x00,
    0xF8, 0xAB, 0x73, 0x97, 0xDC, 0x18, 0xAD, 0x70, 0x1F, 0xBF, 0x98, 0x23, 0x7D, 0xBC, 0xE8, 0xF2,
    0xDD, 0xD4, 0x4E, 0x0F, 0xE6, 0x3B, 0x78, 0x54, 0x46, 0x7B, 0x7A, 0x4A, 0xE5, 0xBD, 0x4F, 0x39,
    0x2A, 0x1B, 0x50, 0x99, 0xC6, 0x3A, 0xA1, 0x0C, 0x16, 0x90, 0x01, 0xF6, 0x68, 0x8F, 0xB9, 0xC8,
    0x3E, 0x69, 0xC3, 0x1E, 0x2F, 0x5F, 0x64, 0xE3, 0xAF, 0x0A, 0xCE, 0x79, 0xB5, 0x45, 0x1D, 0xAC,
    0x07, 0x14, 0x5D, 0x27, 0x65, 0x4C, 0xE9, 0xE4, 0x32, 0x56, 0xD1, 0x9B, 0x0D, 0x6E, 0xD3, 0x6C,
    0xA6, 0x9A, 0x11, 0xDF, 0x4B, 0xC2, 0x55, 0x43, 0x81, 0xF9, 0xE1, 0xEC, 0x2C, 0xB4, 0x63, 0x74,
    0xCD, 0x02, 0x62, 0x13, 0x26, 0xDB, 0xBE, 0xFA, 0xA2, 0xE7, 0xC0, 0xED, 0x75, 0xAA, 0x24, 0x96,
    0xCB, 0x35, 0x77, 0xBA, 0xF4, 0xF1, 0xDA, 0xFE, 0xB0, 0xA8, 0x92, 0x7C, 0xCF, 0x88, 0xEB, 0xD2,
    0x82, 0xB7, 0xB8, 0xDE, 0x59, 0x84, 0xC1, 0x4D, 0xD9, 0x7F, 0x83, 0x48, 0x8D, 0x30, 0x2D, 0xF0,
    0xA9, 0x6A, 0x04, 0x53, 0x49, 0xD7, 0xA5, 0xD0, 0x17, 0xCC, 0x76, 0xC5, 0x58, 0x93, 0xEF, 0x60,
    0xB2, 0x12, 0x5E, 0x21, 0x28, 0xD8, 0xB3, 0xC7, 0xAE, 0x34, 0x8B, 0x1C, 0xC9, 0x9F, 0xFF, 0xB6,
    0x3D, 0x8A, 0xEA, 0x8C, 0x57, 0x06, 0x36, 0x25, 0x9D, 0x7E, 0xA7, 0x6B, 0xBB, 0x03, 0x80, 0x6F,
    0xA0, 0x52, 0x5A, 0x2B, 0x94, 0x09, 0x51, 0xE0, 0x3C, 0x9C, 0x31, 0x1A, 0x0E, 0x67, 0xC4, 0xF5,
    0x66, 0x5C, 0x87, 0x3F, 0x86, 0xD6, 0x0B, 0x05, 0x95, 0x61, 0x15, 0x37, 0xCA, 0x44, 0x6D, 0x85,
    0x22, 0x10, 0x8E, 0x41, 0xEE, 0x38, 0x91, 0xFC, 0x29, 0xD5, 0x47, 0xFD, 0xA3, 0x19, 0xE2, 0x72,
];

// =============================================================================
// BINARY DIFFUSION LAYER
// =============================================================================

/// Input-lane index sets for the 32-lane binary diffusion layer.
///
/// The table is *not* invertible over GF(2) (rank 13; rows 16..=23 repeat
/// rows 8..=15), and nothing in the cipher depends on inverting it: the
/// layer runs on the key-schedule path identically for both directions.
pub(crate) const DIFFUSION_ROWS: [[u8; 16]; 32] = [
    [24, 8, 6, 1, 9, 4, 10, 3, 26, 2, 5, 15, 17, 13, 23, 12],
    [19, 11, 22, 14, 25, 31, 7, 0, 30, 21, 28, 20, 18, 27, 29, 16],
    [4, 18, 10, 26, 1, 22, 30, 21, 20, 5, 23, 12, 17, 6, 3, 25],
    [11, 19, 24, 16, 0, 7, 28, 13, 29, 14, 2, 15, 27, 8, 31, 9],
    [21, 13, 28, 4, 7, 24, 25, 9, 16, 5, 6, 19, 23, 31, 27, 1],
    [15, 3, 11, 2, 12, 20, 17, 30, 10, 22, 8, 0, 18, 26, 29, 14],
    [16, 24, 21, 25, 18, 10, 30, 22, 0, 6, 27, 1, 23, 4, 28, 3],
    [12, 20, 14, 31, 15, 2, 9, 8, 29, 11, 5, 19, 26, 13, 17, 7],
    [7, 31, 8, 24, 2, 9, 3, 22, 14, 6, 4, 20, 27, 17, 26, 21],
    [19, 23, 15, 28, 5, 0, 1, 10, 25, 30, 13, 12, 18, 16, 29, 11],
    [25, 9, 30, 22, 14, 3, 10, 18, 12, 4, 26, 21, 27, 24, 8, 28],
    [0, 17, 1, 19, 11, 13, 5, 7, 29, 15, 6, 20, 16, 31, 23, 2],
    [9, 17, 13, 5, 7, 2, 28, 30, 11, 4, 24, 0, 26, 23, 16, 22],
    [12, 20, 27, 19, 8, 6, 21, 25, 3, 10, 31, 1, 18, 14, 29, 15],
    [7, 3, 11, 30, 28, 18, 10, 25, 1, 24, 16, 22, 26, 9, 13, 8],
    [20, 12, 21, 23, 31, 15, 6, 2, 29, 19, 4, 0, 14, 17, 27, 5],
    [7, 31, 8, 24, 2, 9, 3, 22, 14, 6, 4, 20, 27, 17, 26, 21],
    [19, 23, 15, 28, 5, 0, 1, 10, 25, 30, 13, 12, 18, 16, 29, 11],
    [25, 9, 30, 22, 14, 3, 10, 18, 12, 4, 26, 21, 27, 24, 8, 28],
    [0, 17, 1, 19, 11, 13, 5, 7, 29, 15, 6, 20, 16, 31, 23, 2],
    [9, 17, 13, 5, 7, 2, 28, 30, 11, 4, 24, 0, 26, 23, 16, 22],
    [12, 20, 27, 19, 8, 6, 21, 25, 3, 10, 31, 1, 18, 14, 29, 15],
    [7, 3, 11, 30, 28, 18, 10, 25, 1, 24, 16, 22, 26, 9, 13, 8],
    [20, 12, 21, 23, 31, 15, 6, 2, 29, 19, 4, 0, 14, 17, 27, 5],
    [31, 7, 23, 6, 10, 2, 5, 8, 15, 24, 9, 12, 16, 27, 14, 30],
    [0, 4, 20, 13, 1, 22, 26, 3, 28, 25, 17, 21, 18, 11, 29, 19],
    [18, 10, 2, 15, 8, 28, 25, 3, 21, 9, 14, 30, 16, 7, 31, 13],
    [17, 1, 22, 27, 19, 0, 4, 5, 29, 20, 24, 12, 11, 23, 26, 6],
    [27, 2, 4, 13, 5, 6, 17, 25, 19, 9, 7, 1, 14, 26, 11, 10],
    [28, 12, 16, 24, 0, 31, 21, 30, 8, 3, 23, 22, 18, 15, 29, 20],
    [13, 5, 3, 19, 25, 8, 18, 28, 22, 7, 11, 10, 14, 2, 17, 31],
    [21, 6, 30, 12, 20, 24, 23, 26, 29, 0, 9, 1, 15, 27, 16, 4],
];

/// GF(2) rank of the diffusion matrix, computed once over the embedded
/// table. Pinned by a unit test; a table edit that changes the rank is a
/// different cipher.
pub(crate) fn diffusion_matrix_rank() -> u32 {
    let mut rows = [0u32; 32];
    for (packed, indices) in rows.iter_mut().zip(DIFFUSION_ROWS.iter()) {
        for &index in indices {
            *packed |= 1 << u32::from(index);
        }
    }

    let mut rank = 0usize;
    for col in 0..32 {
        let Some(pivot) = (rank..32).find(|&r| (rows[r] >> col) & 1 == 1) else {
            continue;
        };
        rows.swap(rank, pivot);
        for r in 0..32 {
            if r != rank && (rows[r] >> col) & 1 == 1 {
                rows[r] ^= rows[rank];
            }
        }
        rank += 1;
    }
    rank as u32
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_permutation(sbox: &[u8; 256]) {
        let mut seen = [false; 256];
        for &value in sbox {
            assert!(!seen[value as usize], "duplicate entry {value:#04x}");
            seen[value as usize] = true;
        }
    }

    #[test]
    fn boxes_are_permutations() {
        assert_permutation(&FSB0);
        assert_permutation(&FSB1);
        assert_permutation(&BSB0);
        assert_permutation(&BSB1);
    }

    #[test]
    fn backward_boxes_invert_forward_boxes() {
        for x in 0..=255u8 {
            assert_eq!(BSB0[FSB0[x as usize] as usize], x);
            assert_eq!(BSB1[FSB1[x as usize] as usize], x);
        }
    }

    #[test]
    fn diffusion_rows_are_well_formed() {
        for row in &DIFFUSION_ROWS {
            let mut seen = [false; 32];
            for &index in row {
                assert!(index < 32);
                assert!(!seen[index as usize], "repeated index in diffusion row");
                seen[index as usize] = true;
            }
        }
    }

    #[test]
    fn diffusion_rank_is_pinned() {
        assert_eq!(diffusion_matrix_rank(), 13);
    }
}
