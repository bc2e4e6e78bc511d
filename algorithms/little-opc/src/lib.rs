//! # Little-OPC
//!
//! The reduced sibling of the OPC block cipher: 64-bit blocks, 64-bit keys,
//! eight rounds of the same Lai-Massey template with the same dual-SBox byte
//! substitution, and a 128-entry round-subkey table in place of the big
//! cipher's evolving matrix. Unlike its sibling, a `LittleOpc` instance is
//! stateless after key expansion: the same input always maps to the same
//! output, which is what the deterministic counter mode builds on.
//!
//! # Usage
//! ```rust
//! use little_opc::LittleOpc;
//!
//! let cipher = LittleOpc::new(0x0123_4567_89AB_CDEF);
//!
//! let block = cipher.encrypt_block(0xDEAD_BEEF_CAFE_F00D);
//! assert_eq!(cipher.decrypt_block(block), 0xDEAD_BEEF_CAFE_F00D);
//!
//! // Counter-mode stream: encrypt == decrypt.
//! let nonce = 42;
//! let mut data = *b"attack at dawn";
//! cipher.apply_keystream(&mut data, nonce);
//! cipher.apply_keystream(&mut data, nonce);
//! assert_eq!(&data, b"attack at dawn");
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod ffi;
mod key_schedule;
mod sboxes;

use key_schedule::SUBKEY_COUNT;
use sboxes::{BSB0, BSB1, FSB0, FSB1};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Rounds per block.
const ROUNDS: usize = 8;

/// Subkeys consumed per round; `ROUNDS * KEYS_PER_ROUND` covers the table
/// exactly once per block.
const KEYS_PER_ROUND: usize = SUBKEY_COUNT / ROUNDS;

// =============================================================================
// CIPHER
// =============================================================================

/// A keyed Little-OPC instance holding its expanded subkey table.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LittleOpc {
    subkeys: [u64; SUBKEY_COUNT],
}

impl LittleOpc {
    /// Expand `key` into the 128-entry subkey table.
    #[must_use]
    pub fn new(key: u64) -> Self {
        Self {
            subkeys: key_schedule::expand(key),
        }
    }

    // =========================================================================
    // BLOCK API
    // =========================================================================

    /// Encrypt one 64-bit block.
    #[must_use]
    pub fn encrypt_block(&self, mut block: u64) -> u64 {
        for round in 0..ROUNDS {
            for step in 0..KEYS_PER_ROUND {
                block = self.lai_massey_encrypt(block, self.subkeys[round * KEYS_PER_ROUND + step]);
            }
            block = substitute_forward(block);
        }
        block
    }

    /// Decrypt one 64-bit block.
    #[must_use]
    pub fn decrypt_block(&self, mut block: u64) -> u64 {
        for round in (0..ROUNDS).rev() {
            block = substitute_backward(block);
            for step in (0..KEYS_PER_ROUND).rev() {
                block = self.lai_massey_decrypt(block, self.subkeys[round * KEYS_PER_ROUND + step]);
            }
        }
        block
    }

    // =========================================================================
    // COUNTER MODE
    // =========================================================================

    /// Keystream block `counter` for the given nonce.
    #[must_use]
    pub fn keystream_block(&self, nonce: u64, counter: u64) -> u64 {
        self.encrypt_block(nonce.wrapping_add(counter))
    }

    /// XOR the deterministic keystream over `data` in place. Applying the
    /// same nonce twice restores the original bytes; this one call is both
    /// the encrypt and the decrypt direction.
    pub fn apply_keystream(&self, data: &mut [u8], nonce: u64) {
        for (counter, chunk) in data.chunks_mut(8).enumerate() {
            let keystream = self.keystream_block(nonce, counter as u64).to_le_bytes();
            for (byte, key_byte) in chunk.iter_mut().zip(keystream.iter()) {
                *byte ^= key_byte;
            }
        }
    }

    /// Bulk-stream convenience: copy, then [`apply_keystream`](Self::apply_keystream).
    #[must_use]
    pub fn process_stream(&self, data: &[u8], nonce: u64) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply_keystream(&mut out, nonce);
        out
    }

    // =========================================================================
    // LAI-MASSEY STEPS
    // =========================================================================

    fn lai_massey_encrypt(&self, word: u64, key_material: u64) -> u64 {
        let mut left = (word >> 32) as u32;
        let mut right = word as u32;

        let transform_key = self.one_way_mix(left ^ right, key_material);
        left ^= transform_key;
        right ^= transform_key;

        let (a, b) = forward_half_round(left, right);
        (u64::from(a) << 32) | u64::from(b)
    }

    fn lai_massey_decrypt(&self, word: u64, key_material: u64) -> u64 {
        let left = (word >> 32) as u32;
        let right = word as u32;

        let (mut a, mut b) = backward_half_round(left, right);

        let transform_key = self.one_way_mix(a ^ b, key_material);
        b ^= transform_key;
        a ^= transform_key;

        (u64::from(a) << 32) | u64::from(b)
    }

    /// The per-word one-way mixer, indexing the subkey table where the big
    /// cipher indexes its shuffled matrix.
    fn one_way_mix(&self, word: u32, key_material: u64) -> u32 {
        let key_high = (key_material >> 32) as u32;
        let key_low = key_material as u32;

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

        let mut table_key = self.subkeys[((a ^ b) as usize) % SUBKEY_COUNT];

        let shift_amount = a.wrapping_add(b);
        let shift_amount2 = a.wrapping_add(b.wrapping_mul(2));
        let rotate_amount = b.wrapping_sub(a);
        let rotate_amount2 = a.wrapping_mul(2).wrapping_sub(b);

        let bit = (table_key >> (shift_amount % 64)) & 1;
        let bit2 = (table_key >> (shift_amount2 % 64)) & 1;
        let left_rotated = bit.rotate_left(rotate_amount % 64);
        let right_rotated = bit2.rotate_right(rotate_amount2 % 64);

        let mask = left_rotated ^ right_rotated;
        let fallback = 1u64 << ((a ^ b) & 63);
        let mask = u64::conditional_select(&mask, &fallback, mask.ct_eq(&0));

        table_key &= !mask;

        a ^= (table_key >> 32) as u32;
        b ^= table_key as u32;

        word ^ a ^ b
    }
}

// =============================================================================
// HALF ROUNDS & SUBSTITUTION
// =============================================================================

/// Forward Pseudo-Hadamard half-round with the XOR/rotate mix.
fn forward_half_round(left: u32, right: u32) -> (u32, u32) {
    let mut a = left.wrapping_add(right);
    let mut b = left.wrapping_add(right.wrapping_mul(2));

    b ^= a.rotate_left(1);
    a ^= b.rotate_right(63);

    (a, b)
}

/// Exact inverse of [`forward_half_round`].
fn backward_half_round(mut left: u32, mut right: u32) -> (u32, u32) {
    left ^= right.rotate_right(63);
    right ^= left.rotate_left(1);

    let b = right.wrapping_sub(left);
    let a = left.wrapping_mul(2).wrapping_sub(right);

    (a, b)
}

fn substitute_forward(block: u64) -> u64 {
    let b = block.to_le_bytes();
    u64::from_le_bytes([
        FSB1[b[0] as usize],
        FSB0[b[1] as usize],
        BSB1[b[2] as usize],
        BSB0[b[3] as usize],
        FSB0[b[4] as usize],
        BSB1[b[5] as usize],
        FSB0[b[6] as usize],
        BSB1[b[7] as usize],
    ])
}

fn substitute_backward(block: u64) -> u64 {
    let b = block.to_le_bytes();
    u64::from_le_bytes([
        BSB1[b[0] as usize],
        BSB0[b[1] as usize],
        FSB1[b[2] as usize],
        FSB0[b[3] as usize],
        BSB0[b[4] as usize],
        FSB1[b[5] as usize],
        BSB0[b[6] as usize],
        FSB1[b[7] as usize],
    ])
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_round_trip() {
        let cipher = LittleOpc::new(0x0123_4567_89AB_CDEF);
        for block in [0u64, 1, u64::MAX, 0xDEAD_BEEF_CAFE_F00D] {
            let encrypted = cipher.encrypt_block(block);
            assert_ne!(encrypted, block);
            assert_eq!(cipher.decrypt_block(encrypted), block);
        }
    }

    #[test]
    fn block_round_trip_random_keys() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..32 {
            let cipher = LittleOpc::new(rng.random::<u64>());
            let block = rng.random::<u64>();
            assert_eq!(cipher.decrypt_block(cipher.encrypt_block(block)), block);
        }
    }

    #[test]
    fn encryption_is_key_sensitive() {
        let a = LittleOpc::new(1);
        let b = LittleOpc::new(2);
        assert_ne!(a.encrypt_block(0), b.encrypt_block(0));
    }

    #[test]
    fn substitution_layers_invert() {
        for block in [0u64, u64::MAX, 0x0102_0304_0506_0708] {
            assert_eq!(substitute_backward(substitute_forward(block)), block);
        }
    }

    #[test]
    fn keystream_is_deterministic_and_nonce_sensitive() {
        let cipher = LittleOpc::new(99);
        assert_eq!(cipher.keystream_block(5, 0), cipher.keystream_block(5, 0));
        assert_ne!(cipher.keystream_block(5, 0), cipher.keystream_block(6, 0));
        assert_ne!(cipher.keystream_block(5, 0), cipher.keystream_block(5, 1));
    }

    #[test]
    fn stream_round_trips_with_ragged_tail() {
        let cipher = LittleOpc::new(0xFEED_FACE_0000_0001);
        let message = b"not a multiple of eight bytes...?";
        let encrypted = cipher.process_stream(message, 7);
        assert_eq!(encrypted.len(), message.len());
        assert_ne!(&encrypted[..], &message[..]);
        assert_eq!(cipher.process_stream(&encrypted, 7), message);
    }

    #[test]
    fn different_nonces_give_different_streams() {
        let cipher = LittleOpc::new(123);
        let zeros = vec![0u8; 64];
        assert_ne!(cipher.process_stream(&zeros, 1), cipher.process_stream(&zeros, 2));
    }
}
