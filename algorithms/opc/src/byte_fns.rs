//! Little-endian byte/word marshalling.
//!
//! Every byte-to-word boundary in the cipher is little-endian; big-endian
//! hosts byte-swap here and nowhere else.

// =============================================================================
// BYTES <-> U32
// =============================================================================

/// Pack bytes into 32-bit words, little-endian. `bytes.len()` must be a
/// multiple of 4.
pub(crate) fn words32_from_bytes(bytes: &[u8]) -> Vec<u32> {
    debug_assert_eq!(bytes.len() % 4, 0);
    bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

// =============================================================================
// BYTES <-> U64
// =============================================================================

/// Pack bytes into 64-bit words, little-endian. `bytes.len()` must be a
/// multiple of 8.
pub(crate) fn words64_from_bytes(bytes: &[u8]) -> Vec<u64> {
    debug_assert_eq!(bytes.len() % 8, 0);
    bytes
        .chunks_exact(8)
        .map(|chunk| {
            u64::from_le_bytes([
                chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
            ])
        })
        .collect()
}

/// Unpack 64-bit words into bytes, little-endian.
pub(crate) fn bytes_from_words64(words: &[u64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 8);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}

/// Unpack 64-bit words into an existing byte buffer, little-endian.
/// `out.len()` must equal `words.len() * 8`.
pub(crate) fn write_bytes_from_words64(words: &[u64], out: &mut [u8]) {
    debug_assert_eq!(out.len(), words.len() * 8);
    for (word, chunk) in words.iter().zip(out.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

/// Repack a byte buffer into an existing 64-bit word buffer, little-endian.
/// `bytes.len()` must equal `words.len() * 8`.
pub(crate) fn read_words64_from_bytes(bytes: &[u8], words: &mut [u64]) {
    debug_assert_eq!(bytes.len(), words.len() * 8);
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
        *word = u64::from_le_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
        ]);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_are_little_endian() {
        let bytes: Vec<u8> = (0u8..16).collect();
        let words = words64_from_bytes(&bytes);
        assert_eq!(words[0], 0x0706_0504_0302_0100);
        assert_eq!(bytes_from_words64(&words), bytes);

        let words = words32_from_bytes(&bytes);
        assert_eq!(words[0], 0x0302_0100);
    }

    #[test]
    fn in_place_variants_match() {
        let bytes: Vec<u8> = (0u8..32).map(|b| b.wrapping_mul(37)).collect();
        let words = words64_from_bytes(&bytes);

        let mut out = vec![0u8; 32];
        write_bytes_from_words64(&words, &mut out);
        assert_eq!(out, bytes);

        let mut back = vec![0u64; 4];
        read_words64_from_bytes(&out, &mut back);
        assert_eq!(back, words);
    }
}
