//! Round-subkey derivation: accumulator matrix, whitening, binary diffusion,
//! the Pseudo-Hadamard half-rounds, and the per-word crazy transform.

use crate::matrix::QuadWordMatrix;
use crate::sboxes::DIFFUSION_ROWS;
use crate::state::CommonState;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// =============================================================================
// ROUND SUBKEY GENERATOR
// =============================================================================

/// Persistent round-subkey state: the accumulator matrix and the flattened
/// subkey vector the round function walks.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct RoundSubkeyGenerator {
    matrix: QuadWordMatrix,
    vector: Vec<u64>,
    counter: u64,
}

impl RoundSubkeyGenerator {
    pub(crate) fn new(side: usize) -> Self {
        Self {
            matrix: QuadWordMatrix::zeros(side),
            vector: vec![0u64; side * side],
            counter: 0,
        }
    }

    /// The current round-subkey vector.
    pub(crate) fn subkeys(&self) -> &[u64] {
        &self.vector
    }

    /// Derive the next round-subkey vector from the common state.
    ///
    /// Accumulates the unpredictable matrix transform, whitens the vector
    /// with the accumulator elements, and replaces it with its image under
    /// the 32-lane binary diffusion layer.
    pub(crate) fn generate(&mut self, state: &CommonState) {
        if self.counter == 0 {
            self.vector.zeroize();
            self.matrix.clear();
        }

        self.accumulate_matrix_transform(state);

        // Key whitening against the accumulator, walked in the matrix's
        // column-major element order.
        for (index, word) in self.vector.iter_mut().enumerate() {
            *word ^= self.matrix.get_column_major(index);
        }

        // Binary diffusion layer over 32-lane blocks.
        let mut diffused = Zeroizing::new(vec![0u64; self.vector.len()]);
        for (out_block, in_block) in diffused
            .chunks_exact_mut(32)
            .zip(self.vector.chunks_exact(32))
        {
            for (out, row) in out_block.iter_mut().zip(DIFFUSION_ROWS.iter()) {
                *out = row
                    .iter()
                    .fold(0u64, |acc, &index| acc ^ in_block[index as usize]);
            }
        }
        self.vector.copy_from_slice(&diffused);

        self.counter += 1;
    }

    /// `M += (R^T * L^T) * A * K` with `L = A + K^T`, `R = K - A^T`.
    ///
    /// The temporary product matrix is cleared before it goes out of scope.
    fn accumulate_matrix_transform(&mut self, state: &CommonState) {
        let random = &state.random_matrix;
        let transformed = &state.transformed_matrix;

        let lhs = random.add(&transformed.transpose());
        let rhs = transformed.sub(&random.transpose());

        let mut temporary = rhs.transpose().mul(&lhs.transpose());
        let right_once = random.mul(transformed);
        self.matrix.add_assign(&temporary.mul(&right_once));

        temporary.clear();
    }

    /// One-way per-word mixer indexing the accumulator matrix through the
    /// shuffled offset permutation.
    pub(crate) fn crazy_transform(&self, state: &CommonState, word: u32, key_material: u64) -> u32 {
        let key_high = (key_material >> 32) as u32;
        let key_low = key_material as u32;

        // Pseudo-random value combining the key material with the word.
        let wide = u64::from(word);
        let pseudo = ((key_material ^ wide) << 32) | ((!key_material ^ wide) >> 32);

        let shift = (key_material & 63) as u32;
        let mut c = ((pseudo << shift) >> 32) as u32;
        let mut d = (pseudo >> shift) as u32;

        c = (word | key_high) & c;
        d = (word & key_low) | d;

        let mut a = c;
        let mut b = d;

        a = a.wrapping_add(key_high).rotate_left((pseudo % 32) as u32);
        b = b.wrapping_add(key_low).rotate_right((pseudo % 32) as u32);

        c = (b & !key_high) ^ (d | word);
        d = (a & !key_low) ^ (c | word);

        a ^= c;
        b ^= d;

        // Matrix lookup through the shuffled row/column permutation.
        let indices = &state.matrix_offset_indices;
        let count = indices.len() as u32;
        let row = indices[(a % count) as usize] as usize;
        let col = indices[(b % count) as usize] as usize;

        let shift_amount = a.wrapping_add(b);
        let shift_amount2 = a.wrapping_add(b.wrapping_mul(2));
        let rotate_amount = (col as u32).wrapping_sub(row as u32);
        let rotate_amount2 = (row as u32).wrapping_mul(2).wrapping_sub(col as u32);

        let mut round_subkey = self.matrix.get(row, col);

        // Two evenly selected subkey bits, rotated into a mask.
        let bit = (round_subkey >> (shift_amount % 64)) & 1;
        let bit2 = (round_subkey >> (shift_amount2 % 64)) & 1;
        let left_rotated = bit.rotate_left(rotate_amount % 64);
        let right_rotated = bit2.rotate_right(rotate_amount2 % 64);

        // Merged bitmask; the zero fallback is selected without branching on
        // the (secret-derived) mask value.
        let mask = left_rotated ^ right_rotated;
        let fallback = 1u64 << ((row + col) * 2 % 64);
        let mask = u64::conditional_select(&mask, &fallback, mask.ct_eq(&0));

        round_subkey &= !mask;

        a ^= (round_subkey >> 32) as u32;
        b ^= round_subkey as u32;

        word ^ a ^ b
    }
}

// =============================================================================
// PSEUDO-HADAMARD HALF-ROUNDS
// =============================================================================

/// Forward Pseudo-Hadamard Transform with the XOR/rotate mix:
/// `(A, B) = (L + R, L + 2R)`, then `B ^= rotl(A, 1)` and `A ^= rotr(B, 63)`.
#[must_use]
pub fn forward_transform(left: u32, right: u32) -> (u32, u32) {
    let mut a = left.wrapping_add(right);
    let mut b = left.wrapping_add(right.wrapping_mul(2));

    b ^= a.rotate_left(1);
    a ^= b.rotate_right(63);

    (a, b)
}

/// Exact inverse of [`forward_transform`].
#[must_use]
pub fn backward_transform(mut left: u32, mut right: u32) -> (u32, u32) {
    left ^= right.rotate_right(63);
    right ^= left.rotate_left(1);

    let b = right.wrapping_sub(left);
    let a = left.wrapping_mul(2).wrapping_sub(right);

    (a, b)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mix::MixTransform;
    use crate::subkey::generate_subkeys;
    use crate::types::OpcConfig;

    fn prepared() -> (CommonState, RoundSubkeyGenerator) {
        let config = OpcConfig::minimal(vec![0u8; 16], 1, 1, 0xB7E1_5162_8AED_2A6A);
        let mut state = CommonState::new(&config).unwrap();
        let mut mix = MixTransform::new();
        generate_subkeys(&mut state, &mut mix, &[1, 2, 3, 4]);
        let generator = RoundSubkeyGenerator::new(state.random_matrix.side());
        (state, generator)
    }

    #[test]
    fn pht_round_trips_exhaustive_corners() {
        let corners = [0u32, 1, 0x7FFF_FFFF, 0x8000_0000, u32::MAX];
        for &left in &corners {
            for &right in &corners {
                let (a, b) = forward_transform(left, right);
                assert_eq!(backward_transform(a, b), (left, right));
            }
        }
    }

    #[test]
    fn pht_literal_vector() {
        let (a, b) = forward_transform(0x1234_5678, 0x9ABC_DEF0);
        assert_eq!(backward_transform(a, b), (0x1234_5678, 0x9ABC_DEF0));
    }

    #[test]
    fn generate_fills_the_vector() {
        let (state, mut generator) = prepared();
        generator.generate(&state);
        assert!(generator.subkeys().iter().any(|&w| w != 0));
    }

    #[test]
    fn successive_generations_differ() {
        let (state, mut generator) = prepared();
        generator.generate(&state);
        let first = generator.subkeys().to_vec();
        generator.generate(&state);
        assert_ne!(first, generator.subkeys());
    }

    #[test]
    fn crazy_transform_is_deterministic_and_key_sensitive() {
        let (state, mut generator) = prepared();
        generator.generate(&state);
        let a = generator.crazy_transform(&state, 0xAABB_CCDD, 42);
        let b = generator.crazy_transform(&state, 0xAABB_CCDD, 42);
        let c = generator.crazy_transform(&state, 0xAABB_CCDD, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
