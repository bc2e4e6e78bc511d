//! Chaotic double-pendulum generator.
//!
//! A deterministic numerical integration of the canonical two-segment
//! pendulum. The seed is expanded bit-by-bit into the physical parameters
//! (lengths, masses, initial tensions, a warm-up radius), and every output
//! advances the simulation one step and folds the segment positions into a
//! 64-bit word. Chaotic sensitivity to the seed stands in for statistical
//! quality; determinism is the only contract.

use zeroize::{Zeroize, ZeroizeOnDrop};

const GRAVITY: f64 = 9.8;
const STEP: f64 = 0.002;

// =============================================================================
// GENERATOR
// =============================================================================

/// Double-pendulum simulator seeded from a 64-bit value.
///
/// `system` layout: `[length1, length2, mass1, mass2, tension1, tension2,
/// radius, seed_bit_count, velocity1, velocity2]`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DoublePendulum {
    backup_tensions: [f64; 2],
    backup_velocities: [f64; 2],
    system: [f64; 10],
}

impl DoublePendulum {
    /// Construct from a seed. Callers must keep seeds at or above
    /// `10_000_000_000`; smaller values leave the simulated system too close
    /// to rest to behave chaotically (enforced by the cipher configuration).
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut pendulum = Self {
            backup_tensions: [0.0; 2],
            backup_velocities: [0.0; 2],
            system: [0.0; 10],
        };
        pendulum.seed(seed);
        pendulum
    }

    /// Re-seed in place: expand the seed to its 64-bit binary sequence
    /// (most significant bit first) and rebuild the system parameters.
    pub fn seed(&mut self, seed: u64) {
        self.backup_tensions = [0.0; 2];
        self.backup_velocities = [0.0; 2];
        self.system = [0.0; 10];

        let mut bits = [0u8; 64];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = ((seed >> (63 - i)) & 1) as u8;
        }
        self.initialize(&bits);
    }

    /// Restore the integration variables snapshotted at the end of seeding.
    pub fn reset(&mut self) {
        self.system[4] = self.backup_tensions[0];
        self.system[5] = self.backup_tensions[1];
        self.system[8] = self.backup_velocities[0];
        self.system[9] = self.backup_velocities[1];
    }

    /// One full-range output word.
    pub fn next_word(&mut self) -> u64 {
        self.next_in_range(0, u64::MAX)
    }

    /// One output in `[min, max]`, by modular reduction with negative
    /// correction. The full-range case degenerates to the raw word.
    pub fn next_in_range(&mut self, min: u64, max: u64) -> u64 {
        let modulus = max.wrapping_sub(min).wrapping_add(1) as i64;

        let mut value = self.generate();
        if modulus != 0 {
            value = value.wrapping_rem(modulus);
        }
        if value < 0 {
            value = value.wrapping_add(modulus);
        }

        (min as i64).wrapping_add(value) as u64
    }

    /// Advance and discard `rounds` outputs.
    pub fn discard(&mut self, rounds: usize) {
        for _ in 0..rounds {
            self.generate();
        }
    }

    /// Distribute seed bits across the parameter slots and warm up.
    fn initialize(&mut self, bits: &[u8]) {
        let size = bits.len();
        let quarter = size / 4;

        // Seven XOR-combination parameter streams of 64 entries each, the
        // underlying bit pattern cycling with period `quarter`.
        let mut params = [[0u8; 64]; 7];
        let mut outer = 0usize;
        'fill: loop {
            for inner in 0..quarter {
                let g0 = bits[inner];
                let g1 = bits[quarter + inner];
                let g2 = bits[size / 2 + inner];
                let g3 = bits[size * 3 / 4 + inner];

                params[0][outer] = g0 ^ g1;
                params[1][outer] = g0 ^ g2;
                params[2][outer] = g0 ^ g3;
                params[3][outer] = g1 ^ g2;
                params[4][outer] = g1 ^ g3;
                params[5][outer] = g2 ^ g3;
                params[6][outer] = g0;

                outer += 1;
                if outer >= 64 {
                    break 'fill;
                }
            }
        }

        for i in 0..64 {
            for j in 0..6 {
                if params[j][i] == 1 {
                    self.system[j] += 2.0f64.powi(-(i as i32));
                }
            }
            if params[6][i] == 1 {
                self.system[6] += 2.0f64.powi(4 - i as i32);
            }
        }
        self.system[7] = size as f64;

        let warmup = (self.system[6] * self.system[7]).round() as u64;
        self.run_system(true, warmup);
    }

    /// Integrate `time` steps of the standard double-pendulum equations.
    fn run_system(&mut self, initialize_mode: bool, time: u64) {
        let length1 = self.system[0];
        let length2 = self.system[1];
        let mass1 = self.system[2];
        let mass2 = self.system[3];

        for _ in 0..time {
            let tension1 = self.system[4];
            let tension2 = self.system[5];
            let velocity1 = self.system[8];
            let velocity2 = self.system[9];

            let denominator = 2.0 * mass1 + mass2 - mass2 * (2.0 * tension1 - 2.0 * tension2).cos();

            let mut alpha1 = -GRAVITY * (2.0 * mass1 + mass2) * tension1.sin()
                - mass2 * GRAVITY * (tension1 - 2.0 * tension2).sin()
                - 2.0
                    * (tension1 - tension2).sin()
                    * mass2
                    * (velocity2 * velocity2 * length2
                        + velocity1 * velocity1 * length1 * (tension1 - tension2).cos());
            alpha1 /= length1 * denominator;

            let mut alpha2 = 2.0
                * (tension1 - tension2).sin()
                * (velocity1 * velocity1 * length1 * (mass1 + mass2)
                    + GRAVITY * (mass1 + mass2) * tension1.cos()
                    + velocity2 * velocity2 * length2 * mass2 * (tension1 - tension2).cos());
            alpha2 /= length2 * denominator;

            self.system[8] += STEP * alpha1;
            self.system[9] += STEP * alpha2;
            self.system[4] += STEP * self.system[8];
            self.system[5] += STEP * self.system[9];
        }

        if initialize_mode {
            self.backup_tensions = [self.system[4], self.system[5]];
            self.backup_velocities = [self.system[8], self.system[9]];
        }
    }

    /// One integration step folded into a signed 64-bit word.
    fn generate(&mut self) -> i64 {
        self.run_system(false, 1);

        let position = self.system[0] * self.system[4].sin() + self.system[1] * self.system[5].sin();
        let mirrored = -position;

        let left = ((position * 1000.0) % 1.0 * 4_294_967_296.0).floor() as i64;
        let right = ((mirrored * 1000.0) % 1.0 * 4_294_967_296.0).floor() as i64;

        interleave(left as i32, right as i32)
    }
}

// =============================================================================
// BIT INTERLEAVE
// =============================================================================

/// Interleave two 32-bit halves bit-by-bit (`a` on even positions, `b` on
/// odd). The halves are sign-extended before spreading, matching the word
/// widening the fold was defined with.
fn interleave(a: i32, b: i32) -> i64 {
    let mut x = a as i64 as u64;
    let mut y = b as i64 as u64;

    x = (x | (x << 16)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x << 8)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    x = (x | (x << 1)) & 0x5555_5555_5555_5555;

    y = (y | (y << 16)) & 0x0000_FFFF_0000_FFFF;
    y = (y | (y << 8)) & 0x00FF_00FF_00FF_00FF;
    y = (y | (y << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    y = (y | (y << 2)) & 0x3333_3333_3333_3333;
    y = (y | (y << 1)) & 0x5555_5555_5555_5555;

    ((y << 1) | x) as i64
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u64 = 0xB7E1_5162_8AED_2A6A;

    #[test]
    fn deterministic_and_seed_sensitive() {
        let mut a = DoublePendulum::new(SEED);
        let mut b = DoublePendulum::new(SEED);
        let mut c = DoublePendulum::new(SEED + 1);
        let wa = a.next_word();
        assert_eq!(wa, b.next_word());
        assert_ne!(wa, c.next_word());
    }

    #[test]
    fn reset_replays_the_stream() {
        let mut pendulum = DoublePendulum::new(SEED);
        let first: Vec<u64> = (0..8).map(|_| pendulum.next_word()).collect();
        pendulum.reset();
        let replay: Vec<u64> = (0..8).map(|_| pendulum.next_word()).collect();
        assert_eq!(first, replay);
    }

    #[test]
    fn ranged_output_is_bounded() {
        let mut pendulum = DoublePendulum::new(SEED);
        for _ in 0..256 {
            let value = pendulum.next_in_range(10, 20);
            assert!((10..=20).contains(&value));
        }
    }

    #[test]
    fn outputs_are_not_constant() {
        let mut pendulum = DoublePendulum::new(SEED);
        let first = pendulum.next_word();
        assert!((0..64).map(|_| pendulum.next_word()).any(|w| w != first));
    }

    #[test]
    #[ignore = "long-running non-triviality check"]
    fn two_pow_twenty_outputs_never_stick_at_zero() {
        let mut pendulum = DoublePendulum::new(SEED);
        let mut zero_run = 0u32;
        for _ in 0..(1 << 20) {
            if pendulum.next_word() == 0 {
                zero_run += 1;
                assert!(zero_run < 64);
            } else {
                zero_run = 0;
            }
        }
    }
}
