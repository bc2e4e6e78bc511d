//! Internal randomness sources.
//!
//! Three deterministic generators drive the key schedule: a 128-bit linear
//! feedback shift register, a gated nonlinear feedback shift register over
//! four 64-bit words, and a numerically integrated chaotic double pendulum.
//! They are uniform-bit generators in the loose sense only — `next() -> u64`
//! plus `discard(n)` — and none of them is a CSPRNG on its own; the cipher
//! uses them as evolving internal state, not as a security boundary.

mod lfsr;
mod nlfsr;
mod pendulum;

pub use lfsr::Lfsr128;
pub use nlfsr::Nlfsr256;
pub use pendulum::DoublePendulum;

use zeroize::{Zeroize, ZeroizeOnDrop};

// =============================================================================
// GENERATOR BUNDLE
// =============================================================================

/// The three generators owned by one cipher instance, advanced in lockstep
/// by the key schedule.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrngSet {
    /// Linear feedback shift register.
    pub lfsr: Lfsr128,
    /// Nonlinear feedback shift register.
    pub nlfsr: Nlfsr256,
    /// Chaotic double-pendulum simulator.
    pub pendulum: DoublePendulum,
}

impl PrngSet {
    /// Build all three generators from their seeds. Zero seeds for the shift
    /// registers are remapped to 1 by the engines themselves; the pendulum
    /// seed is validated by the caller.
    #[must_use]
    pub fn new(lfsr_seed: u64, nlfsr_seed: u64, sdp_seed: u64) -> Self {
        Self {
            lfsr: Lfsr128::new(lfsr_seed),
            nlfsr: Nlfsr256::new(nlfsr_seed),
            pendulum: DoublePendulum::new(sdp_seed),
        }
    }
}
