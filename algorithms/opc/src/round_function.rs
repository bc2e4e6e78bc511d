//! The 16-round Lai-Massey block transformation with dual-SBox byte
//! substitution.

use crate::byte_fns::{read_words64_from_bytes, write_bytes_from_words64};
use crate::round_subkey::{backward_transform, forward_transform, RoundSubkeyGenerator};
use crate::sboxes::{BSB0, BSB1, FSB0, FSB1};
use crate::state::CommonState;
use crate::types::Direction;
use zeroize::Zeroizing;

/// Rounds per block.
pub(crate) const BLOCK_ROUNDS: usize = 16;

// =============================================================================
// BYTE SUBSTITUTION LAYER
// =============================================================================

/// Per-lane byte substitution over 8-byte groups.
///
/// Forward lane pattern `(FSB1, FSB0, BSB1, BSB0, FSB0, BSB1, FSB0, BSB1)`;
/// the backward pattern swaps each box for its inverse. Buffers whose length
/// is not a multiple of 8 are left untouched.
pub(crate) fn byte_substitution(bytes: &mut [u8], direction: Direction) {
    if bytes.len() % 8 != 0 {
        return;
    }

    match direction {
        Direction::Encrypt => {
            for group in bytes.chunks_exact_mut(8) {
                group[0] = FSB1[group[0] as usize];
                group[1] = FSB0[group[1] as usize];
                group[2] = BSB1[group[2] as usize];
                group[3] = BSB0[group[3] as usize];

                group[4] = FSB0[group[4] as usize];
                group[5] = BSB1[group[5] as usize];
                group[6] = FSB0[group[6] as usize];
                group[7] = BSB1[group[7] as usize];
            }
        }
        Direction::Decrypt => {
            for group in bytes.chunks_exact_mut(8) {
                group[0] = BSB1[group[0] as usize];
                group[1] = BSB0[group[1] as usize];
                group[2] = FSB1[group[2] as usize];
                group[3] = FSB0[group[3] as usize];

                group[4] = BSB0[group[4] as usize];
                group[5] = FSB1[group[5] as usize];
                group[6] = BSB0[group[6] as usize];
                group[7] = FSB1[group[7] as usize];
            }
        }
    }
}

// =============================================================================
// LAI-MASSEY WORD STEP
// =============================================================================

/// One Lai-Massey step on a single 64-bit lane.
///
/// Encrypt: split little-endian into `(L, R)`, XOR the crazy-transformed
/// `L ^ R` into both halves, then the forward PHT half-round. Decrypt walks
/// the same structure backwards; `L ^ R` is invariant under the double XOR,
/// which is what makes the F-function one-way-safe here.
fn lai_massey_word(
    round_keys: &RoundSubkeyGenerator,
    state: &CommonState,
    word: u64,
    key_material: u64,
    direction: Direction,
) -> u64 {
    match direction {
        Direction::Encrypt => {
            let mut left = (word >> 32) as u32;
            let mut right = word as u32;

            let transform_key = round_keys.crazy_transform(state, left ^ right, key_material);
            left ^= transform_key;
            right ^= transform_key;

            let (a, b) = forward_transform(left, right);
            (u64::from(a) << 32) | u64::from(b)
        }
        Direction::Decrypt => {
            let left = (word >> 32) as u32;
            let right = word as u32;

            let (mut a, mut b) = backward_transform(left, right);

            let transform_key = round_keys.crazy_transform(state, a ^ b, key_material);
            b ^= transform_key;
            a ^= transform_key;

            (u64::from(a) << 32) | u64::from(b)
        }
    }
}

// =============================================================================
// ROUND FUNCTION
// =============================================================================

/// Run the full 16-round transformation over one block, regenerating the
/// round-subkey vector exactly once beforehand.
///
/// The key-index walk is deliberate: the index advances per lane (guarded,
/// restarting at zero on exhaustion) and each round traverses the whole
/// subkey vector once. Decryption walks the vector from the top down with
/// the lanes in reverse order.
pub(crate) fn run(
    round_keys: &mut RoundSubkeyGenerator,
    state: &CommonState,
    block: &mut [u64],
    direction: Direction,
) {
    if block.len() != state.data_block_qwords {
        return;
    }

    round_keys.generate(state);

    let mut bytes = Zeroizing::new(vec![0u8; block.len() * 8]);
    let key_count = round_keys.subkeys().len();

    match direction {
        Direction::Encrypt => {
            let mut key_index = 0usize;
            for _round in 0..BLOCK_ROUNDS {
                loop {
                    for lane in block.iter_mut() {
                        let key_material = round_keys.subkeys()[key_index];
                        *lane = lai_massey_word(round_keys, state, *lane, key_material, direction);
                        if key_index < key_count {
                            key_index += 1;
                        }
                    }
                    if key_index < key_count {
                        continue;
                    }
                    key_index = 0;
                    break;
                }

                write_bytes_from_words64(block, &mut bytes);
                byte_substitution(&mut bytes, direction);
                read_words64_from_bytes(&bytes, block);
            }
        }
        Direction::Decrypt => {
            let mut key_index = key_count;
            for _round in 0..BLOCK_ROUNDS {
                write_bytes_from_words64(block, &mut bytes);
                byte_substitution(&mut bytes, direction);
                read_words64_from_bytes(&bytes, block);

                loop {
                    for lane in block.iter_mut().rev() {
                        let key_material = round_keys.subkeys()[key_index - 1];
                        *lane = lai_massey_word(round_keys, state, *lane, key_material, direction);
                        if key_index - 1 > 0 {
                            key_index -= 1;
                        }
                    }
                    if key_index - 1 > 0 {
                        continue;
                    }
                    key_index = key_count;
                    break;
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_substitution_round_trips() {
        let original: Vec<u8> = (0u8..=255).chain(0u8..=255).take(256).collect();
        let mut bytes = original.clone();
        byte_substitution(&mut bytes, Direction::Encrypt);
        assert_ne!(bytes, original);
        byte_substitution(&mut bytes, Direction::Decrypt);
        assert_eq!(bytes, original);
    }

    #[test]
    fn byte_substitution_ignores_ragged_buffers() {
        let mut bytes = vec![1u8, 2, 3];
        byte_substitution(&mut bytes, Direction::Encrypt);
        assert_eq!(bytes, vec![1, 2, 3]);
    }
}
