//! Secure subkey generation.
//!
//! One call per data block: reseed the mix-transform stream registers from
//! the generators, expand the current key material into a 32-bit pool,
//! assemble a fresh random word matrix cell by cell, advance the transformed
//! subkey matrix through the one-way matrix transform, and reshuffle the
//! offset permutation.

use crate::mix::MixTransform;
use crate::state::CommonState;
use zeroize::Zeroizing;

// =============================================================================
// SUBKEY GENERATION
// =============================================================================

/// Produce the next transformed subkey matrix from `material`.
///
/// An empty `material` means the master key is out of the picture and fresh
/// words are drawn purely from the generators.
pub(crate) fn generate_subkeys(state: &mut CommonState, mix: &mut MixTransform, material: &[u64]) {
    mix.initialize(&mut state.prngs);

    // 32-bit material pool, little-endian split of the 64-bit words.
    let mut pool: Zeroizing<Vec<u32>> = Zeroizing::new(if material.is_empty() {
        let mut words = Vec::with_capacity(state.key_block_qwords * 2);
        for _ in 0..state.key_block_qwords {
            let word = state.prngs.nlfsr.next_word() ^ state.prngs.lfsr.next_word();
            words.push(word as u32);
            words.push((word >> 32) as u32);
        }
        words
    } else {
        let mut words = Vec::with_capacity(material.len() * 2);
        for &word in material {
            words.push(word as u32);
            words.push((word >> 32) as u32);
        }
        words
    });

    // Associate the initial vector with the material, then whiten each word
    // through the material substitution boxes.
    if !state.word_initial_vector.is_empty() {
        let iv = &state.word_initial_vector;
        for (index, word) in pool.iter_mut().enumerate() {
            *word ^= iv[index % iv.len()];
        }
    }
    for word in pool.iter_mut() {
        *word = MixTransform::substitute_word(*word);
    }

    let expanded = Zeroizing::new(mix.expand_key(&pool));

    // Two mixer outputs per cell, over consecutive wrapping four-word
    // windows of the expanded pool.
    let side = state.random_matrix.side();
    let mut window = 0usize;
    for row in 0..side {
        for col in 0..side {
            let low = mix.key_with_function(&take_window(&expanded, &mut window));
            let high = mix.key_with_function(&take_window(&expanded, &mut window));
            state
                .random_matrix
                .set(row, col, (u64::from(high) << 32) | u64::from(low));
        }
    }

    // One-way transform: K' = (K - A^T)^T * (A + K^T)^T, wrapping mod 2^64.
    let lhs = state.random_matrix.add(&state.transformed_matrix.transpose());
    let rhs = state.transformed_matrix.sub(&state.random_matrix.transpose());
    state.transformed_matrix = rhs.transpose().mul(&lhs.transpose());

    state.shuffle_indices();
}

/// Copy the next four expanded words, advancing and wrapping the window.
fn take_window(expanded: &[u32], window: &mut usize) -> [u32; 4] {
    let mut out = [0u32; 4];
    for slot in &mut out {
        *slot = expanded[*window % expanded.len()];
        *window += 1;
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::OpcConfig;

    fn fresh_state() -> CommonState {
        let config = OpcConfig::minimal(vec![0u8; 16], 1, 1, 0xB7E1_5162_8AED_2A6A);
        CommonState::new(&config).unwrap()
    }

    #[test]
    fn transformed_matrix_leaves_zero() {
        let mut state = fresh_state();
        let mut mix = MixTransform::new();
        generate_subkeys(&mut state, &mut mix, &[1, 2, 3, 4]);
        assert!(state.transformed_matrix.as_slice().iter().any(|&w| w != 0));
        assert!(state.random_matrix.as_slice().iter().any(|&w| w != 0));
    }

    #[test]
    fn material_changes_the_matrices() {
        let mut state_a = fresh_state();
        let mut state_b = fresh_state();
        let mut mix_a = MixTransform::new();
        let mut mix_b = MixTransform::new();
        generate_subkeys(&mut state_a, &mut mix_a, &[1, 2, 3, 4]);
        generate_subkeys(&mut state_b, &mut mix_b, &[1, 2, 3, 5]);
        assert_ne!(
            state_a.random_matrix.as_slice(),
            state_b.random_matrix.as_slice()
        );
    }

    #[test]
    fn empty_material_draws_from_generators() {
        let mut state = fresh_state();
        let mut mix = MixTransform::new();
        generate_subkeys(&mut state, &mut mix, &[]);
        assert!(state.transformed_matrix.as_slice().iter().any(|&w| w != 0));
    }

    #[test]
    fn successive_calls_keep_mutating() {
        let mut state = fresh_state();
        let mut mix = MixTransform::new();
        generate_subkeys(&mut state, &mut mix, &[9, 9, 9, 9]);
        let first = state.transformed_matrix.as_slice().to_vec();
        generate_subkeys(&mut state, &mut mix, &[9, 9, 9, 9]);
        assert_ne!(first, state.transformed_matrix.as_slice());
    }
}
