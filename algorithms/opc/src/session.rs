//! Session driver: padding, the block walk, and the subkey regimes.
//!
//! Three regimes feed the key schedule as a call streams through its blocks:
//! master-key-driven (fold the next key block into the key buffer),
//! self-diffusing (bit-diffuse + byte-substitute the buffer when the master
//! key first runs out and on every 8192th derivation), and KDF-reseeded
//! (scrypt over the random key vector on the 6144/4096 marks, a pure
//! generator-driven derivation on every other 2048th). The descending check
//! order x4, x3, x2, x1 is part of the cipher definition.

use crate::byte_fns::{bytes_from_words64, read_words64_from_bytes, words64_from_bytes};
use crate::cipher::Opc;
use crate::round_function::{self, byte_substitution};
use crate::subkey::generate_subkeys;
use crate::types::{Direction, OpcError};
use rand::Rng;
use rand_mt::Mt19937GenRand64;
use zeroize::Zeroizing;

// =============================================================================
// PUBLIC SESSION API
// =============================================================================

impl Opc {
    /// Encrypt with ISO 10126-style randomized padding appended first.
    ///
    /// The output is always a whole number of blocks and strictly longer
    /// than the input. This call mutates the instance; decrypting the result
    /// requires a fresh instance built from the same configuration.
    ///
    /// # Errors
    /// [`OpcError::SizeMismatch`] if `keys` is empty or not a multiple of
    /// the key block size.
    pub fn encrypt_with_padding(&mut self, plaintext: &[u8], keys: &[u8]) -> Result<Vec<u8>, OpcError> {
        let mut padded = Zeroizing::new(plaintext.to_vec());
        self.pad(&mut padded);

        let mut data = Zeroizing::new(words64_from_bytes(&padded));
        let key_words = Zeroizing::new(self.pack_keys(keys)?);

        self.walk_blocks(&mut data, &key_words, Direction::Encrypt)?;
        Ok(bytes_from_words64(&data))
    }

    /// Decrypt and strip the trailing padding.
    ///
    /// # Errors
    /// [`OpcError::SizeMismatch`] on mis-sized keys or ciphertext;
    /// [`OpcError::PaddingInvalid`] if the recovered pad byte is 0 or larger
    /// than one block.
    pub fn decrypt_with_padding(&mut self, ciphertext: &[u8], keys: &[u8]) -> Result<Vec<u8>, OpcError> {
        let block_bytes = self.state.data_block_qwords * 8;
        if ciphertext.is_empty() || ciphertext.len() % block_bytes != 0 {
            return Err(OpcError::SizeMismatch {
                what: "data",
                multiple_of: block_bytes,
            });
        }

        let mut data = Zeroizing::new(words64_from_bytes(ciphertext));
        let key_words = Zeroizing::new(self.pack_keys(keys)?);

        self.walk_blocks(&mut data, &key_words, Direction::Decrypt)?;

        let mut plaintext = bytes_from_words64(&data);
        self.unpad(&mut plaintext)?;
        Ok(plaintext)
    }

    /// Encrypt block-aligned data as-is.
    ///
    /// # Errors
    /// [`OpcError::SizeMismatch`] if the input is not a whole number of
    /// blocks or the keys are mis-sized.
    pub fn encrypt_without_padding(&mut self, plaintext: &[u8], keys: &[u8]) -> Result<Vec<u8>, OpcError> {
        let block_bytes = self.state.data_block_qwords * 8;
        if plaintext.len() % block_bytes != 0 {
            return Err(OpcError::SizeMismatch {
                what: "data",
                multiple_of: block_bytes,
            });
        }

        let mut data = Zeroizing::new(words64_from_bytes(plaintext));
        let key_words = Zeroizing::new(self.pack_keys(keys)?);

        self.walk_blocks(&mut data, &key_words, Direction::Encrypt)?;
        Ok(bytes_from_words64(&data))
    }

    /// Decrypt block-aligned data without interpreting padding.
    ///
    /// # Errors
    /// [`OpcError::SizeMismatch`] as for [`Opc::encrypt_without_padding`].
    pub fn decrypt_without_padding(&mut self, ciphertext: &[u8], keys: &[u8]) -> Result<Vec<u8>, OpcError> {
        let block_bytes = self.state.data_block_qwords * 8;
        if ciphertext.len() % block_bytes != 0 {
            return Err(OpcError::SizeMismatch {
                what: "data",
                multiple_of: block_bytes,
            });
        }

        let mut data = Zeroizing::new(words64_from_bytes(ciphertext));
        let key_words = Zeroizing::new(self.pack_keys(keys)?);

        self.walk_blocks(&mut data, &key_words, Direction::Decrypt)?;
        Ok(bytes_from_words64(&data))
    }
}

// =============================================================================
// BLOCK WALK
// =============================================================================

impl Opc {
    /// Validate and pack the master key bytes into 64-bit words.
    fn pack_keys(&self, keys: &[u8]) -> Result<Vec<u64>, OpcError> {
        let key_block_bytes = self.state.key_block_qwords * 8;
        if keys.is_empty() || keys.len() % key_block_bytes != 0 {
            return Err(OpcError::SizeMismatch {
                what: "keys",
                multiple_of: key_block_bytes,
            });
        }
        Ok(words64_from_bytes(keys))
    }

    /// Drive every block of `data` through the round function, advancing the
    /// subkey regime in between. Identical for both directions except for
    /// the flag handed to the round function.
    fn walk_blocks(&mut self, data: &mut [u64], keys: &[u64], direction: Direction) -> Result<(), OpcError> {
        let block = self.state.data_block_qwords;
        let key_block = self.state.key_block_qwords;

        debug_assert_eq!(data.len() % block, 0);
        debug_assert_eq!(keys.len() % key_block, 0);

        // Prime the key buffer from the first key block.
        self.state.word_key.copy_from_slice(&keys[..key_block]);
        let mut key_offset = key_block;
        {
            let material = Zeroizing::new(self.state.word_key.clone());
            generate_subkeys(&mut self.state, &mut self.mix, &material);
        }

        let mut random_key_vector = Zeroizing::new(vec![0u64; key_block * 2]);
        let mut first_exhausted = true;
        // Salt stream starts from the canonical MT19937-64 default seed and
        // is re-keyed from the KDF output on the x2 marks.
        let mut twister = Mt19937GenRand64::new(5489);

        let mut offset = 0usize;
        while offset < data.len() {
            if key_offset < keys.len() {
                // Master-key regime: fold the next key block into the key
                // buffer. Equal words would cancel under XOR, hence the
                // complement-of-sum substitute.
                let slice = &keys[key_offset..key_offset + key_block];
                for (current, &incoming) in self.state.word_key.iter_mut().zip(slice) {
                    *current = if incoming == *current {
                        !incoming.wrapping_add(*current)
                    } else {
                        incoming ^ *current
                    };
                }
                key_offset += key_block;

                let material = Zeroizing::new(self.state.word_key.clone());
                generate_subkeys(&mut self.state, &mut self.mix, &material);
                self.subkeys_counter += 1;
            } else {
                if first_exhausted || self.subkeys_counter % (2048 * 4) == 0 {
                    self.diffuse_word_key();
                    let material = Zeroizing::new(self.state.word_key.clone());
                    generate_subkeys(&mut self.state, &mut self.mix, &material);
                    first_exhausted = false;
                    self.subkeys_counter += 1;
                    // This derivation replaces the block's processing.
                    offset += block;
                    continue;
                }

                if self.subkeys_counter % 2048 == 0 {
                    let mut salt_words = Zeroizing::new([0u64; 16]);
                    for word in salt_words.iter_mut() {
                        *word = twister.next_u64();
                    }

                    if self.subkeys_counter % (2048 * 3) == 0 {
                        self.kdf_reseed(&salt_words, &mut random_key_vector)?;
                        generate_subkeys(&mut self.state, &mut self.mix, &random_key_vector);
                    } else if self.subkeys_counter % (2048 * 2) == 0 {
                        self.kdf_reseed(&salt_words, &mut random_key_vector)?;
                        generate_subkeys(&mut self.state, &mut self.mix, &random_key_vector);
                        twister = Mt19937GenRand64::new_with_key(random_key_vector.iter().copied());
                    }

                    // Every 2048th derivation also advances purely from the
                    // generators, whatever the branches above did.
                    generate_subkeys(&mut self.state, &mut self.mix, &[]);
                }
                self.subkeys_counter += 1;
            }

            round_function::run(
                &mut self.round_keys,
                &self.state,
                &mut data[offset..offset + block],
                direction,
            );
            offset += block;
        }

        // A single-block payload gets one (possibly the only) round-function
        // pass here; without it a one-block message under an immediately
        // exhausted master key would never be transformed.
        if data.len() == block {
            round_function::run(&mut self.round_keys, &self.state, data, direction);
        }

        self.subkeys_counter = 0;
        Ok(())
    }

    /// 16 iterations of per-word bit diffusion over the key buffer, each
    /// followed by the forward byte-substitution layer.
    fn diffuse_word_key(&mut self) {
        let mut bytes = Zeroizing::new(vec![0u8; self.state.word_key.len() * 8]);
        for _ in 0..16 {
            for word in self.state.word_key.iter_mut() {
                let mut a = *word >> 32;
                let mut b = *word & 0xFFFF_FFFF;

                a ^= b;
                a = !a;
                b ^= a;
                b = b.rotate_left(19);
                a ^= b;
                a = a.rotate_left(13);
                b ^= a;
                b = !b;
                a ^= b;
                a = a.rotate_left(27);
                b ^= a;
                b = b.rotate_left(23);

                *word = (a << 32) | b;
            }

            crate::byte_fns::write_bytes_from_words64(&self.state.word_key, &mut bytes);
            byte_substitution(&mut bytes, Direction::Encrypt);
            read_words64_from_bytes(&bytes, &mut self.state.word_key);
        }
    }

    /// Scrypt over the current random key vector; the derived bytes replace
    /// the vector in place. N=1024, r=8, p=16, output length = vector bytes.
    fn kdf_reseed(&self, salt_words: &[u64; 16], random_key_vector: &mut [u64]) -> Result<(), OpcError> {
        let salt = Zeroizing::new(bytes_from_words64(salt_words));
        let password = Zeroizing::new(bytes_from_words64(random_key_vector));
        let mut derived = Zeroizing::new(vec![0u8; random_key_vector.len() * 8]);

        let params = scrypt::Params::new(10, 8, 16, derived.len()).map_err(|_| OpcError::StateCorruption)?;
        scrypt::scrypt(&password, &salt, &params, &mut derived).map_err(|_| OpcError::StateCorruption)?;

        read_words64_from_bytes(&derived, random_key_vector);
        Ok(())
    }

    // =========================================================================
    // PADDING
    // =========================================================================

    /// ISO 10126 style: random filler bytes, the final byte carrying the pad
    /// length (always in `1..=block`). The filler comes from the thread RNG,
    /// never from cipher state — decryption does not replay the padding.
    fn pad(&self, data: &mut Vec<u8>) {
        let block_bytes = self.state.data_block_qwords * 8;
        let remainder = data.len() % block_bytes;
        let pad_count = block_bytes - remainder;

        let mut rng = rand::rng();
        for _ in 0..pad_count {
            data.push(rng.random::<u8>());
        }
        let last = data.len() - 1;
        data[last] = pad_count as u8;
    }

    fn unpad(&self, data: &mut Vec<u8>) -> Result<(), OpcError> {
        let block_bytes = self.state.data_block_qwords * 8;
        let Some(&pad_count) = data.last() else {
            return Err(OpcError::PaddingInvalid);
        };
        let pad_count = pad_count as usize;
        if pad_count == 0 || pad_count > block_bytes || pad_count > data.len() {
            return Err(OpcError::PaddingInvalid);
        }
        data.truncate(data.len() - pad_count);
        Ok(())
    }
}
