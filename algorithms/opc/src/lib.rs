//! # OPC
//!
//! An experimental 128-bit block cipher family with a *self-mutating* key
//! schedule: every encryption or decryption call irreversibly advances the
//! instance's internal state (feedback-shift-register and chaotic
//! generators, an evolving subkey matrix), so the same instance never
//! produces the same stream twice. The symmetric operation therefore runs on
//! a fresh instance built from the same configuration.
//!
//! This is a research construction. It makes **no** formal security claim,
//! provides no authentication, and is not interoperable with any standard
//! cipher.
//!
//! # Usage
//! ```rust
//! use opc::{Opc, OpcConfig};
//!
//! let config = OpcConfig::minimal(vec![0u8; 16], 1, 1, 0xB7E1_5162_8AED_2A6A);
//! let keys = vec![0x5Au8; 32];
//!
//! let mut cipher = Opc::new(config.clone())?;
//! let ciphertext = cipher.encrypt(b"sixteen byte msg", &keys)?;
//!
//! // The call mutated the instance; decrypt with a fresh one.
//! let mut cipher = Opc::new(config)?;
//! let plaintext = cipher.decrypt(&ciphertext, &keys)?;
//! assert_eq!(plaintext, b"sixteen byte msg");
//! # Ok::<(), opc::OpcError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod byte_fns;
mod cipher;
mod ffi;
mod matrix;
mod mix;
pub mod prng;
mod round_function;
mod round_subkey;
mod sboxes;
mod session;
mod state;
mod subkey;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use cipher::Opc;
pub use round_subkey::{backward_transform, forward_transform};
pub use types::{Direction, OpcConfig, OpcError};
