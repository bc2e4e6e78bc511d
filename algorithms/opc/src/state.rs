//! Shared cipher state: generators, key material, subkey matrices.

use crate::byte_fns::words32_from_bytes;
use crate::matrix::QuadWordMatrix;
use crate::prng::PrngSet;
use crate::sboxes;
use crate::types::{OpcConfig, OpcError};
use zeroize::{Zeroize, ZeroizeOnDrop};

// =============================================================================
// COMMON STATE
// =============================================================================

/// Everything one cipher instance owns and mutates across blocks.
///
/// The state is a linear resource: a single encryption or decryption call
/// drives it forward irreversibly, which is what the self-mutating key
/// schedule is built on. Every buffer here is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct CommonState {
    /// The three internal generators.
    pub prngs: PrngSet,
    /// Initial vector packed into 32-bit words, little-endian.
    pub word_initial_vector: Vec<u32>,
    /// Key material buffer, one key block of 64-bit words.
    pub word_key: Vec<u64>,
    /// Fresh random words assembled per subkey generation.
    pub random_matrix: QuadWordMatrix,
    /// The evolving one-way transformed subkey matrix.
    pub transformed_matrix: QuadWordMatrix,
    /// Shuffled permutation of `0..side`, indexed by the crazy transform.
    pub matrix_offset_indices: Vec<u32>,
    /// Block size in 64-bit words.
    pub data_block_qwords: usize,
    /// Key block size in 64-bit words.
    pub key_block_qwords: usize,
}

impl CommonState {
    /// Validate the configuration and build the initial state.
    pub(crate) fn new(config: &OpcConfig) -> Result<Self, OpcError> {
        validate(config)?;

        // One-time table sanity check; the embedded diffusion table is part
        // of the cipher definition and its GF(2) rank is pinned.
        debug_assert_eq!(sboxes::diffusion_matrix_rank(), 13);

        let key_block = config.key_block_qwords as usize;
        let side = key_block * 2;

        Ok(Self {
            prngs: PrngSet::new(config.lfsr_seed, config.nlfsr_seed, config.sdp_seed),
            word_initial_vector: words32_from_bytes(&config.initial_vector),
            word_key: vec![0u64; key_block],
            random_matrix: QuadWordMatrix::zeros(side),
            transformed_matrix: QuadWordMatrix::zeros(side),
            matrix_offset_indices: (0..side as u32).collect(),
            data_block_qwords: config.data_block_qwords as usize,
            key_block_qwords: key_block,
        })
    }

    /// Fisher-Yates over the offset permutation, the NLFSR as the source.
    pub(crate) fn shuffle_indices(&mut self) {
        for index in 1..self.matrix_offset_indices.len() {
            let other = (self.prngs.nlfsr.next_word() % (index as u64 + 1)) as usize;
            self.matrix_offset_indices.swap(index, other);
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn validate(config: &OpcConfig) -> Result<(), OpcError> {
    if config.data_block_qwords % 2 != 0 || config.data_block_qwords < 2 {
        return Err(OpcError::ConfigInvalid(
            "data_block_qwords must be a multiple of 2 and at least 2",
        ));
    }
    if config.key_block_qwords % 4 != 0 || config.key_block_qwords < 4 {
        return Err(OpcError::ConfigInvalid(
            "key_block_qwords must be a multiple of 4 and at least 4",
        ));
    }
    if config.key_block_qwords <= config.data_block_qwords
        || config.key_block_qwords % config.data_block_qwords != 0
    {
        return Err(OpcError::ConfigInvalid(
            "key_block_qwords must be a strict multiple of data_block_qwords",
        ));
    }
    if config.initial_vector.len() % config.data_block_bytes() != 0 {
        return Err(OpcError::ConfigInvalid(
            "initial_vector length must be a multiple of the data block size",
        ));
    }
    if config.lfsr_seed == 0 || config.nlfsr_seed == 0 {
        return Err(OpcError::ConfigInvalid("LFSR and NLFSR seeds must be non-zero"));
    }
    if config.sdp_seed < 10_000_000_000 {
        return Err(OpcError::ConfigInvalid(
            "sdp_seed is too small to drive the pendulum out of rest",
        ));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn valid_config() -> OpcConfig {
        OpcConfig::minimal(vec![0u8; 16], 1, 1, 0xB7E1_5162_8AED_2A6A)
    }

    #[test]
    fn valid_config_builds() {
        let state = CommonState::new(&valid_config()).unwrap();
        assert_eq!(state.matrix_offset_indices, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(state.word_initial_vector.len(), 4);
        assert_eq!(state.random_matrix.side(), 8);
    }

    #[test]
    fn invariants_are_enforced() {
        let mut config = valid_config();
        config.data_block_qwords = 3;
        assert!(matches!(CommonState::new(&config), Err(OpcError::ConfigInvalid(_))));

        let mut config = valid_config();
        config.key_block_qwords = 6;
        assert!(CommonState::new(&config).is_err());

        let mut config = valid_config();
        config.key_block_qwords = 2;
        assert!(CommonState::new(&config).is_err());

        let mut config = valid_config();
        config.initial_vector = vec![0u8; 15];
        assert!(CommonState::new(&config).is_err());

        let mut config = valid_config();
        config.lfsr_seed = 0;
        assert!(CommonState::new(&config).is_err());

        let mut config = valid_config();
        config.sdp_seed = 9_999_999_999;
        assert!(CommonState::new(&config).is_err());
    }

    #[test]
    fn shuffle_keeps_a_permutation() {
        let mut state = CommonState::new(&valid_config()).unwrap();
        state.shuffle_indices();
        let mut sorted = state.matrix_offset_indices.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }
}
