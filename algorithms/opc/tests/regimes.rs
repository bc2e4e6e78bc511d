//! Subkey-regime transition tests.
//!
//! The driver consumes master-key blocks one per data block; once they run
//! out it switches to the self-diffusing regime. Round trips must hold
//! across the transition on fresh instances.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use opc::{Opc, OpcConfig};

const SDP_SEED: u64 = 0xB7E1_5162_8AED_2A6A;

fn config() -> OpcConfig {
    OpcConfig::minimal(vec![0u8; 16], 123_456, 456_789, SDP_SEED)
}

fn patterned(len: usize, salt: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(0xA7) ^ salt).collect()
}

// =============================================================================
// SCENARIO 4: CROSS-REGIME TRANSITION
// =============================================================================

#[test]
fn two_key_blocks_then_exhausted_regime() {
    // Plaintext spans KeyBlock*8*3 = 96 bytes = 6 data blocks; keys cover
    // two key blocks. The driver must consume both and keep going in the
    // master-exhausted regime without error.
    let plaintext = patterned(96, 0x5C);
    let keys = patterned(64, 0x00);

    let mut cipher = Opc::new(config()).unwrap();
    let ciphertext = cipher.encrypt(&plaintext, &keys).unwrap();
    assert_eq!(ciphertext.len(), plaintext.len());
    assert_ne!(ciphertext, plaintext);

    let mut cipher = Opc::new(config()).unwrap();
    let recovered = cipher.decrypt(&ciphertext, &keys).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn long_exhausted_run_round_trips() {
    // One key block against many data blocks: most of the stream runs on
    // the self-diffusing schedule.
    let plaintext = patterned(16 * 64, 0x13);
    let keys = patterned(32, 0x77);

    let mut cipher = Opc::new(config()).unwrap();
    let ciphertext = cipher.encrypt(&plaintext, &keys).unwrap();

    let mut cipher = Opc::new(config()).unwrap();
    assert_eq!(cipher.decrypt(&ciphertext, &keys).unwrap(), plaintext);
}

#[test]
fn exhausted_regime_blocks_still_differ_from_each_other() {
    // Identical plaintext blocks must not encrypt identically: the subkey
    // state advances between blocks in every regime.
    let plaintext = vec![0xEEu8; 16 * 8];
    let keys = patterned(32, 0x21);

    let mut cipher = Opc::new(config()).unwrap();
    let ciphertext = cipher.encrypt(&plaintext, &keys).unwrap();

    let blocks: Vec<&[u8]> = ciphertext.chunks(16).collect();
    for (i, a) in blocks.iter().enumerate() {
        for b in blocks.iter().skip(i + 1) {
            assert_ne!(a, b, "two ciphertext blocks repeated");
        }
    }
}

#[test]
fn more_key_blocks_change_the_tail() {
    // With four key blocks the fourth data block still sits in the
    // master-key regime; with two it is already exhausted. The ciphertexts
    // must diverge no later than the block where the regimes split.
    let plaintext = patterned(96, 0x04);
    let short_keys = patterned(64, 0x0A);
    let mut long_keys = short_keys.clone();
    long_keys.extend_from_slice(&patterned(64, 0x0B));

    let mut cipher = Opc::new(config()).unwrap();
    let short_ct = cipher.encrypt(&plaintext, &short_keys).unwrap();
    let mut cipher = Opc::new(config()).unwrap();
    let long_ct = cipher.encrypt(&plaintext, &long_keys).unwrap();
    assert_ne!(short_ct, long_ct);

    for (ciphertext, keys) in [(short_ct, short_keys), (long_ct, long_keys)] {
        let mut cipher = Opc::new(config()).unwrap();
        assert_eq!(cipher.decrypt(&ciphertext, &keys).unwrap(), plaintext);
    }
}
