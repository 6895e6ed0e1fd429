//! Sentinel-padded pattern/text buffers.
//!
//! The packed match kernel compares fixed-width words and may read up to one
//! word past a sequence's logical end. Both buffers are therefore
//! over-allocated with trailing sentinel bytes, and the two sentinels differ,
//! so a word touching the padded tail can never compare equal. The padding
//! invariant lives entirely behind [`PaddedSequences::new`]; no caller can
//! construct a buffer that violates it.

use thiserror::Error;

/// Width in bytes of one packed comparison word.
pub const WORD_BYTES: usize = 8;

/// Trailing sentinel slack appended to each sequence.
pub(crate) const PADDING_BYTES: usize = 2 * WORD_BYTES;

/// Sentinel byte filling the pattern's padded tail.
pub const PATTERN_SENTINEL: u8 = b'!';

/// Sentinel byte filling the text's padded tail.
pub const TEXT_SENTINEL: u8 = b'?';

/// Longest sequence representable with 32-bit offsets.
pub const MAX_SEQUENCE_LENGTH: usize = i32::MAX as usize - PADDING_BYTES;

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("sequence of {0} characters exceeds the maximum supported length")]
    SequenceTooLarge(usize),
    #[error("sequence contains reserved sentinel byte {byte:#04x} at position {position}")]
    ReservedByte { byte: u8, position: usize },
}

/// Pattern/text pair with guaranteed trailing sentinel slack.
///
/// `pattern()` and `text()` expose the logical sequences; the `*_padded()`
/// views include the sentinel tails and are what the packed kernel reads.
#[derive(Debug, Clone)]
pub struct PaddedSequences {
    pattern: Vec<u8>,
    pattern_length: i32,
    text: Vec<u8>,
    text_length: i32,
}

impl PaddedSequences {
    /// Copy both sequences into padded buffers.
    ///
    /// Fails if either sequence contains one of the reserved sentinel bytes
    /// or is too long for 32-bit offsets.
    pub fn new(pattern: &[u8], text: &[u8]) -> Result<Self, SequenceError> {
        validate(pattern)?;
        validate(text)?;
        Ok(PaddedSequences {
            pattern: pad(pattern, PATTERN_SENTINEL),
            pattern_length: pattern.len() as i32,
            text: pad(text, TEXT_SENTINEL),
            text_length: text.len() as i32,
        })
    }

    /// Logical pattern, without the sentinel tail.
    #[inline]
    pub fn pattern(&self) -> &[u8] {
        &self.pattern[..self.pattern_length as usize]
    }

    /// Logical text, without the sentinel tail.
    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text[..self.text_length as usize]
    }

    #[inline]
    pub fn pattern_len(&self) -> i32 {
        self.pattern_length
    }

    #[inline]
    pub fn text_len(&self) -> i32 {
        self.text_length
    }

    /// Pattern including its sentinel tail.
    #[inline]
    pub(crate) fn pattern_padded(&self) -> &[u8] {
        &self.pattern
    }

    /// Text including its sentinel tail.
    #[inline]
    pub(crate) fn text_padded(&self) -> &[u8] {
        &self.text
    }
}

fn validate(seq: &[u8]) -> Result<(), SequenceError> {
    if seq.len() > MAX_SEQUENCE_LENGTH {
        return Err(SequenceError::SequenceTooLarge(seq.len()));
    }
    if let Some(position) = seq
        .iter()
        .position(|&b| b == PATTERN_SENTINEL || b == TEXT_SENTINEL)
    {
        return Err(SequenceError::ReservedByte {
            byte: seq[position],
            position,
        });
    }
    Ok(())
}

fn pad(seq: &[u8], sentinel: u8) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(seq.len() + PADDING_BYTES);
    buffer.extend_from_slice(seq);
    buffer.resize(seq.len() + PADDING_BYTES, sentinel);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_layout() {
        let seqs = PaddedSequences::new(b"ACGT", b"ACGTAC").unwrap();
        assert_eq!(seqs.pattern(), b"ACGT");
        assert_eq!(seqs.text(), b"ACGTAC");
        assert_eq!(seqs.pattern_len(), 4);
        assert_eq!(seqs.text_len(), 6);
        assert_eq!(seqs.pattern_padded().len(), 4 + PADDING_BYTES);
        assert_eq!(seqs.text_padded().len(), 6 + PADDING_BYTES);
        assert!(seqs.pattern_padded()[4..].iter().all(|&b| b == PATTERN_SENTINEL));
        assert!(seqs.text_padded()[6..].iter().all(|&b| b == TEXT_SENTINEL));
    }

    #[test]
    fn test_empty_sequences_are_padded() {
        let seqs = PaddedSequences::new(b"", b"").unwrap();
        assert_eq!(seqs.pattern_len(), 0);
        assert_eq!(seqs.pattern_padded().len(), PADDING_BYTES);
    }

    #[test]
    fn test_reserved_byte_rejected() {
        let err = PaddedSequences::new(b"AC!T", b"ACGT").unwrap_err();
        match err {
            SequenceError::ReservedByte { byte, position } => {
                assert_eq!(byte, b'!');
                assert_eq!(position, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(PaddedSequences::new(b"ACGT", b"AC?T").is_err());
    }
}
