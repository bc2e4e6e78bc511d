//! Shared types used across the OPC library.

use core::fmt;
use std::error;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Cipher instance configuration.
///
/// Validated once at construction; an [`Opc`](crate::Opc) built from a given
/// config always starts from the same internal state, which is what makes the
/// destroy-and-rebuild decryption contract work.
#[derive(Clone)]
pub struct OpcConfig {
    /// Data block size in 64-bit words. Multiple of 2, at least 2.
    /// The main cipher uses 2 (128-bit blocks).
    pub data_block_qwords: u64,
    /// Key block size in 64-bit words. Multiple of 4, at least 4, strictly
    /// greater than and divisible by `data_block_qwords`.
    pub key_block_qwords: u64,
    /// Initial vector bytes; length must be a multiple of
    /// `data_block_qwords * 8`.
    pub initial_vector: Vec<u8>,
    /// Seed for the linear feedback shift register. Must be non-zero.
    pub lfsr_seed: u64,
    /// Seed for the nonlinear feedback shift register. Must be non-zero.
    pub nlfsr_seed: u64,
    /// Seed for the chaotic double-pendulum generator. Must be at least
    /// `10_000_000_000` so the simulated system has enough seed bits to
    /// leave its resting state.
    pub sdp_seed: u64,
}

impl OpcConfig {
    /// Smallest valid configuration: 128-bit blocks, 256-bit key blocks.
    #[must_use]
    pub fn minimal(initial_vector: Vec<u8>, lfsr_seed: u64, nlfsr_seed: u64, sdp_seed: u64) -> Self {
        Self {
            data_block_qwords: 2,
            key_block_qwords: 4,
            initial_vector,
            lfsr_seed,
            nlfsr_seed,
            sdp_seed,
        }
    }

    /// Data block size in bytes.
    #[must_use]
    pub const fn data_block_bytes(&self) -> usize {
        self.data_block_qwords as usize * 8
    }

    /// Key block size in bytes.
    #[must_use]
    pub const fn key_block_bytes(&self) -> usize {
        self.key_block_qwords as usize * 8
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Direction flag threaded through the round function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward (encrypting) transformation.
    Encrypt,
    /// Backward (decrypting) transformation.
    Decrypt,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced at the public call boundary.
///
/// Nothing is retried internally and there is no partial-result guarantee;
/// on any error the cipher instance should be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcError {
    /// A construction-time invariant on [`OpcConfig`] does not hold.
    ConfigInvalid(&'static str),
    /// Key or data buffer length is not a multiple of the required block size.
    SizeMismatch {
        /// What was mis-sized ("keys" or "data").
        what: &'static str,
        /// The required multiple, in bytes.
        multiple_of: usize,
    },
    /// On decrypt, the trailing padding byte is 0 or larger than one block.
    PaddingInvalid,
    /// An internal invariant failed (e.g. the KDF rejected its fixed
    /// parameters). Indicates a corrupted instance.
    StateCorruption,
}

impl fmt::Display for OpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigInvalid(detail) => write!(f, "invalid configuration: {detail}"),
            Self::SizeMismatch { what, multiple_of } => {
                write!(f, "{what} length must be a non-zero multiple of {multiple_of} bytes")
            }
            Self::PaddingInvalid => write!(f, "padding byte is zero or exceeds the block size"),
            Self::StateCorruption => write!(f, "internal cipher state is corrupted"),
        }
    }
}

impl error::Error for OpcError {}
