//! The OPC cipher instance.

use crate::mix::MixTransform;
use crate::round_subkey::RoundSubkeyGenerator;
use crate::state::CommonState;
use crate::types::{OpcConfig, OpcError};

// =============================================================================
// CIPHER INSTANCE
// =============================================================================

/// One OPC cipher instance: the common state, the mix-transform unit and the
/// round-subkey generator, plus the retained configuration for rebuilds.
///
/// An instance is a linear resource. Every encryption or decryption call
/// irreversibly mutates the internal generators and subkey matrices, so the
/// same instance cannot run the symmetric operation afterwards: encrypt with
/// one instance, then decrypt with a fresh instance built from (or
/// [`reset`](Opc::reset) to) the same configuration. This is deliberate —
/// two identical calls on one instance produce different output streams.
///
/// Instances are not concurrency-safe and hold no interior mutability;
/// callers needing parallelism build independent instances with distinct
/// seeds.
pub struct Opc {
    config: OpcConfig,
    pub(crate) state: CommonState,
    pub(crate) mix: MixTransform,
    pub(crate) round_keys: RoundSubkeyGenerator,
    pub(crate) subkeys_counter: u64,
}

impl Opc {
    /// Build an instance, validating every configuration invariant.
    ///
    /// # Errors
    /// [`OpcError::ConfigInvalid`] naming the violated invariant.
    pub fn new(config: OpcConfig) -> Result<Self, OpcError> {
        let state = CommonState::new(&config)?;
        let side = state.key_block_qwords * 2;
        Ok(Self {
            config,
            state,
            mix: MixTransform::new(),
            round_keys: RoundSubkeyGenerator::new(side),
            subkeys_counter: 0,
        })
    }

    /// Destroy and rebuild from the retained configuration.
    ///
    /// After a reset the instance behaves exactly like a newly constructed
    /// one; this is how a caller runs the symmetric operation without
    /// constructing a second instance.
    ///
    /// # Errors
    /// Propagates [`OpcError::ConfigInvalid`]; cannot fail for a config that
    /// already built once.
    pub fn reset(&mut self) -> Result<(), OpcError> {
        *self = Self::new(self.config.clone())?;
        Ok(())
    }

    /// The configuration this instance was built from.
    #[must_use]
    pub fn config(&self) -> &OpcConfig {
        &self.config
    }

    /// Output length of [`encrypt`](Opc::encrypt) for an input of `input_len`
    /// bytes: block-aligned input passes through unpadded, anything else is
    /// padded up to the next whole block.
    #[must_use]
    pub fn encrypted_len(&self, input_len: usize) -> usize {
        let block_bytes = self.config.data_block_bytes();
        if input_len % block_bytes == 0 {
            input_len
        } else {
            (input_len / block_bytes + 1) * block_bytes
        }
    }

    /// Encrypt, choosing the unpadded path for block-aligned input and the
    /// padded path otherwise.
    ///
    /// # Errors
    /// See [`Opc::encrypt_with_padding`] / [`Opc::encrypt_without_padding`].
    pub fn encrypt(&mut self, plaintext: &[u8], keys: &[u8]) -> Result<Vec<u8>, OpcError> {
        if plaintext.len() % self.config.data_block_bytes() == 0 {
            self.encrypt_without_padding(plaintext, keys)
        } else {
            self.encrypt_with_padding(plaintext, keys)
        }
    }

    /// Decrypt, mirroring [`Opc::encrypt`]: block-aligned input is assumed
    /// unpadded; anything else is rejected by the underlying size check.
    ///
    /// # Errors
    /// See [`Opc::decrypt_with_padding`] / [`Opc::decrypt_without_padding`].
    pub fn decrypt(&mut self, ciphertext: &[u8], keys: &[u8]) -> Result<Vec<u8>, OpcError> {
        if ciphertext.len() % self.config.data_block_bytes() == 0 {
            self.decrypt_without_padding(ciphertext, keys)
        } else {
            self.decrypt_with_padding(ciphertext, keys)
        }
    }
}
