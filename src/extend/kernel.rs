//! Diagonal extension kernels.
//!
//! The packed kernel is the inner loop of the whole aligner: it runs once per
//! score per diagonal, so it compares 8-byte words instead of single
//! characters and performs no bounds checks. The predicate kernel backs the
//! custom alignment form and steps one character at a time.

use crate::aligner::MatchFn;
use crate::sequence::{PaddedSequences, WORD_BYTES};
use crate::wavefront::{offset_h, offset_v, Offset, OFFSET_NULL};

/// Extend `offset` on diagonal `k` through the run of equal characters
/// starting at its current grid point.
///
/// Compares 8-byte words of pattern and text; on the first differing word,
/// the trailing zero count of the XOR locates the first differing byte.
/// Termination relies on the sentinel padding: the pattern and text tails are
/// filled with distinct sentinels, so a word touching either tail can never
/// compare equal.
#[inline(always)]
pub(crate) fn extend_packed(sequences: &PaddedSequences, k: i32, offset: Offset) -> Offset {
    debug_assert!(offset != OFFSET_NULL);
    let pattern = sequences.pattern_padded();
    let text = sequences.text_padded();
    let mut v = offset_v(k, offset);
    let mut h = offset_h(k, offset);
    debug_assert!(0 <= v && v <= sequences.pattern_len());
    debug_assert!(0 <= h && h <= sequences.text_len());
    let mut offset = offset;
    loop {
        // SAFETY: the loop only re-enters while the previous words compared
        // equal, which is impossible once a read touches a sentinel tail, so
        // v <= pattern_len and h <= text_len here; both buffers carry
        // 2 * WORD_BYTES of trailing slack, keeping the 8-byte reads in
        // bounds.
        let pattern_word =
            u64::from_le(unsafe { (pattern.as_ptr().add(v as usize) as *const u64).read_unaligned() });
        let text_word =
            u64::from_le(unsafe { (text.as_ptr().add(h as usize) as *const u64).read_unaligned() });
        let cmp = pattern_word ^ text_word;
        if cmp != 0 {
            // Equal characters below the first differing bit.
            return offset + (cmp.trailing_zeros() / 8) as Offset;
        }
        offset += WORD_BYTES as Offset;
        v += WORD_BYTES as i32;
        h += WORD_BYTES as i32;
    }
}

/// Extend `offset` on diagonal `k` one character at a time through a user
/// match predicate over `(v, h)`.
///
/// Termination relies on the predicate eventually returning false.
pub(crate) fn extend_predicate(match_fn: &MatchFn, k: i32, offset: Offset) -> Offset {
    debug_assert!(offset != OFFSET_NULL);
    let mut v = offset_v(k, offset);
    let mut h = offset_h(k, offset);
    let mut offset = offset;
    while match_fn(v, h) {
        v += 1;
        h += 1;
        offset += 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// One-character-at-a-time reference for the packed kernel.
    fn extend_by_char(sequences: &PaddedSequences, k: i32, mut offset: Offset) -> Offset {
        let pattern = sequences.pattern();
        let text = sequences.text();
        loop {
            let v = offset_v(k, offset);
            let h = offset_h(k, offset);
            if v >= pattern.len() as i32 || h >= text.len() as i32 {
                return offset;
            }
            if pattern[v as usize] != text[h as usize] {
                return offset;
            }
            offset += 1;
        }
    }

    fn assert_parity(pattern: &[u8], text: &[u8], k: i32, offset: Offset) {
        let seqs = PaddedSequences::new(pattern, text).unwrap();
        let packed = extend_packed(&seqs, k, offset);
        let reference = extend_by_char(&seqs, k, offset);
        assert_eq!(packed, reference, "k={k} offset={offset}");
        assert!(packed >= offset, "offset must never shrink");
    }

    #[test]
    fn test_no_match() {
        assert_parity(b"TTTT", b"AAAA", 0, 0);
    }

    #[test]
    fn test_match_to_pattern_end() {
        // Pattern exhausted mid-text; the sentinel stops the scan.
        assert_parity(b"ACGT", b"ACGTACGT", 0, 0);
    }

    #[test]
    fn test_match_to_text_end() {
        assert_parity(b"ACGTACGT", b"ACGT", 0, 0);
    }

    #[test]
    fn test_match_spanning_several_words() {
        let run: Vec<u8> = b"ACGT".iter().cycle().take(40).copied().collect();
        assert_parity(&run, &run, 0, 0);
    }

    #[test]
    fn test_mismatch_at_word_boundary() {
        let pattern = b"AAAAAAAACAAA";
        let text = b"AAAAAAAAGAAA";
        assert_parity(pattern, text, 0, 0);
        let seqs = PaddedSequences::new(pattern, text).unwrap();
        assert_eq!(extend_packed(&seqs, 0, 0), 8);
    }

    #[test]
    fn test_extension_from_mid_offset() {
        // Restarting inside a match run continues to the same end point.
        let run: Vec<u8> = b"ACGT".iter().cycle().take(24).copied().collect();
        let seqs = PaddedSequences::new(&run, &run).unwrap();
        let full = extend_packed(&seqs, 0, 0);
        assert_eq!(extend_packed(&seqs, 0, 13), full);
    }

    #[test]
    fn test_off_diagonal_extension() {
        // k = 2: text leads the pattern by two characters.
        assert_parity(b"GTAC", b"ACGTAC", 2, 2);
        assert_parity(b"ACGTAC", b"GTAC", -2, 0);
    }

    #[test]
    fn test_random_parity() {
        let mut rng = StdRng::seed_from_u64(0xD1A6);
        for _ in 0..200 {
            let plen = rng.gen_range(1..120);
            let tlen = rng.gen_range(1..120);
            let pattern: Vec<u8> = (0..plen).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect();
            let text: Vec<u8> = (0..tlen).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect();
            let k = rng.gen_range(-(plen as i32)..=tlen as i32);
            let offset = rng.gen_range(k.max(0)..=(tlen as i32).min(plen as i32 + k));
            assert_parity(&pattern, &text, k, offset);
        }
    }

    #[test]
    fn test_predicate_kernel_matches_packed() {
        let pattern = b"ACGTACGTACGTAC".to_vec();
        let text = b"ACGTACGAACGTAC".to_vec();
        let seqs = PaddedSequences::new(&pattern, &text).unwrap();
        let (p, t) = (pattern.clone(), text.clone());
        let match_fn = move |v: i32, h: i32| {
            (v as usize) < p.len() && (h as usize) < t.len() && p[v as usize] == t[h as usize]
        };
        assert_eq!(extend_predicate(&match_fn, 0, 0), extend_packed(&seqs, 0, 0));
    }

    #[test]
    fn test_predicate_kernel_never_matching() {
        let match_fn = |_v: i32, _h: i32| false;
        assert_eq!(extend_predicate(&match_fn, 0, 5), 5);
    }
}
