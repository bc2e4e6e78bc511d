//! Gated nonlinear feedback shift register.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

// =============================================================================
// CONSTANTS
// =============================================================================

/// The nine gated feedback polynomial slots, as 64-bit masks.
///
/// Degrees 24, 55, 48, 31, 64, 27, 7, 16, 42; slot 8 doubles as the default
/// when the selection index is out of range.
const FEEDBACK_MASKS: [u64; 9] = [
    0x0000_0000_0080_0759,
    0x4000_0000_0000_07FC,
    0x0000_8000_0000_0D39,
    0x0000_0000_4000_03BF,
    0x8000_0000_0000_1324,
    0x0000_0000_0400_040F,
    0x0000_0000_0000_0041,
    0x0000_0000_0000_84BE,
    0x0000_0200_0000_0D7E,
];

// =============================================================================
// NLFSR
// =============================================================================

/// Four-register NLFSR with nine gated polynomial slots and a χ-like
/// combining function.
///
/// Every step derives a 9-bit gate mask from the current state, picks the
/// four lowest set slots with constant-time selection, advances each register
/// by its selected polynomial, and combines the four output bits through
/// `f(u1..u4) = u1 ^ (u1 & u2) ^ u3 ^ u4`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Nlfsr256 {
    state: [u64; 4],
}

impl Nlfsr256 {
    /// Construct from a seed (zero remapped to 1), deriving the four
    /// registers with fixed XOR/rotate constants and running 256 warm-up
    /// steps.
    #[must_use]
    pub fn new(mut seed: u64) -> Self {
        if seed == 0 {
            seed = 1;
        }
        let mut nlfsr = Self {
            state: [
                seed,
                (seed ^ 0xA5A5_A5A5_A5A5_A5A5).rotate_right(17),
                (seed ^ 0x3C3C_3C3C_3C3C_3C3C).rotate_left(29),
                !seed ^ 0xC3C3_C3C3_C3C3_C3C3,
            ],
        };
        for _ in 0..256 {
            nlfsr.next_bit();
        }
        nlfsr
    }

    /// Re-seed in place, equivalent to rebuilding with [`Nlfsr256::new`].
    pub fn seed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Produce one 64-bit output word, most significant bit first.
    pub fn next_word(&mut self) -> u64 {
        let mut answer: u64 = 0;
        for _ in 0..64 {
            answer <<= 1;
            answer |= u64::from(self.next_bit());
        }
        answer
    }

    /// Discard `rounds` output words. A round count of zero still discards
    /// one word; callers rely on `discard` always advancing the state.
    pub fn discard(&mut self, rounds: usize) {
        let rounds = rounds.max(1);
        for _ in 0..rounds {
            self.next_word();
        }
    }

    /// Emit up to 64 "unpredictable" bits after a one-time injection of
    /// `base` into the registers and 16 warm-up steps.
    ///
    /// Each output bit passes through the degree-3 combiner `f2`, with the
    /// running answer's low bit feeding back as the `extra` input. Requests
    /// beyond 64 bits are emitted as 64; the over-64 regime is where the
    /// accumulator loses its linear structure, and that chaotic behavior is
    /// part of the contract.
    pub fn unpredictable_bits(&mut self, base: u64, number_bits: usize) -> u64 {
        self.state[0] ^= base;
        self.state[1] ^= base.rotate_right(17);
        self.state[2] ^= base.rotate_left(29);
        self.state[3] ^= !base;

        for _ in 0..16 {
            self.next_bit();
        }

        let mut answer: u64 = 0;
        let iterations = number_bits.min(64);
        for _ in 0..iterations {
            let f1 = self.next_bit();
            let u1 = (self.state[0] & 1) as u8;
            let u2 = (self.state[1] & 1) as u8;
            let u3 = (self.state[2] & 1) as u8;
            let u4 = (self.state[3] & 1) as u8;
            let extra = ((answer & 1) as u8) & (u1 ^ u3);

            let out = combine_f2(f1, u1, u2, u3, u4, extra);
            answer <<= 1;
            answer |= u64::from(out);
        }
        answer
    }

    /// One NLFSR step producing a single bit.
    fn next_bit(&mut self) -> u8 {
        // 9-bit gate mask from mixed state taps.
        let mut gate = ((self.state[0]
            ^ self.state[1].rotate_right(7)
            ^ self.state[2].rotate_left(19)
            ^ (self.state[3] >> 3)
            ^ (self.state[0] >> 41))
            & 0x1FF) as u16;

        // gate == 0 would select nothing; repair branchlessly.
        let is_zero = gate.ct_eq(&0);
        gate |= u16::from(is_zero.unwrap_u8());

        let amount = ((self.state[0] ^ self.state[1] ^ self.state[2] ^ self.state[3]) & 7) as u32;
        gate = rotl9(gate, amount);

        // Pick the four lowest set slot indices, constant time: nine fixed
        // iterations with masked selection, no data-dependent branch.
        let mut picks: [u8; 4] = [0, 1, 2, 3];
        let mut picked: u8 = 0;
        for i in 0..9u8 {
            let bit = ((gate >> i) & 1) as u8;
            let is_set = Choice::from(bit);
            for (slot, pick) in picks.iter_mut().enumerate() {
                let take = is_set & picked.ct_eq(&(slot as u8));
                *pick = u8::conditional_select(pick, &i, take);
            }
            picked = picked.wrapping_add(bit);
        }

        let taken: [u8; 4] = [
            (self.state[0] & 1) as u8,
            (self.state[1] & 1) as u8,
            (self.state[2] & 1) as u8,
            (self.state[3] & 1) as u8,
        ];
        for (k, (&slot, &bit)) in picks.iter().zip(taken.iter()).enumerate() {
            self.state[k] = step_register(self.state[k], slot, bit);
        }

        let u1 = (self.state[0] & 1) as u8;
        let u2 = (self.state[1] & 1) as u8;
        let u3 = (self.state[2] & 1) as u8;
        let u4 = (self.state[3] & 1) as u8;
        combine_f(u1, u2, u3, u4)
    }
}

// =============================================================================
// STEP PRIMITIVES
// =============================================================================

/// Advance one register by the polynomial in `slot`, folding the previously
/// extracted output bit back into the low position.
///
/// The slot dispatch is a masked table walk rather than an index branch.
fn step_register(mut state: u64, slot: u8, bit: u8) -> u64 {
    let mut feedback = FEEDBACK_MASKS[8];
    for (k, mask) in FEEDBACK_MASKS.iter().enumerate().take(8) {
        let eq = slot.ct_eq(&(k as u8));
        feedback = u64::conditional_select(&feedback, mask, eq);
    }

    let lowest = state & 1;
    state >>= 1;
    state ^= lowest.wrapping_neg() & feedback;
    state ^ u64::from(bit & 1)
}

/// Combiner `f`: balanced, degree 2, algebraic immunity 2.
fn combine_f(u1: u8, u2: u8, u3: u8, u4: u8) -> u8 {
    (u1 ^ (u1 & u2) ^ u3 ^ u4) & 1
}

/// Combiner `f2`: degree 3, used only by `unpredictable_bits`.
fn combine_f2(f1: u8, u1: u8, u2: u8, u3: u8, u4: u8, extra: u8) -> u8 {
    let out = f1
        ^ (u1 & u3)
        ^ (u2 & u4)
        ^ (u3 & u4)
        ^ (u1 & extra)
        ^ (u4 & extra)
        ^ (f1 & u3 & u4)
        ^ (f1 & u1 & extra);
    out & 1
}

/// Rotate a 9-bit value left, result kept in `0..0x1FF`.
fn rotl9(x: u16, r: u32) -> u16 {
    let r = r % 9;
    if r == 0 {
        return x & 0x1FF;
    }
    ((x << r) | (x >> (9 - r))) & 0x1FF
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_is_remapped() {
        let mut a = Nlfsr256::new(0);
        let mut b = Nlfsr256::new(1);
        assert_eq!(a.next_word(), b.next_word());
    }

    #[test]
    fn deterministic_and_seed_sensitive() {
        let mut a = Nlfsr256::new(42);
        let mut b = Nlfsr256::new(42);
        let mut c = Nlfsr256::new(43);
        let wa = a.next_word();
        assert_eq!(wa, b.next_word());
        assert_ne!(wa, c.next_word());
    }

    #[test]
    fn discard_zero_still_advances() {
        let mut a = Nlfsr256::new(9);
        let mut b = Nlfsr256::new(9);
        a.discard(0);
        assert_ne!(a.next_word(), b.next_word());
    }

    #[test]
    fn unpredictable_bits_depend_on_base() {
        let mut a = Nlfsr256::new(5);
        let mut b = Nlfsr256::new(5);
        assert_ne!(a.unpredictable_bits(1, 64), b.unpredictable_bits(2, 64));
    }

    #[test]
    fn unpredictable_bits_clamp_to_64() {
        let mut a = Nlfsr256::new(5);
        let mut b = Nlfsr256::new(5);
        assert_eq!(a.unpredictable_bits(7, 64), b.unpredictable_bits(7, 1000));
    }

    #[test]
    fn short_requests_fit_in_low_bits() {
        let mut a = Nlfsr256::new(5);
        let bits = a.unpredictable_bits(7, 5);
        assert!(bits < (1 << 5));
    }

    #[test]
    fn state_survives_many_outputs() {
        let mut nlfsr = Nlfsr256::new(1);
        for _ in 0..(1 << 10) {
            nlfsr.next_word();
            assert!(nlfsr.state.iter().any(|&s| s != 0));
        }
    }

    #[test]
    #[ignore = "long-running period check"]
    fn state_survives_two_pow_twenty_outputs() {
        let mut nlfsr = Nlfsr256::new(1);
        for _ in 0..(1 << 20) {
            nlfsr.next_word();
            assert!(nlfsr.state.iter().any(|&s| s != 0));
        }
    }
}
