//! Terminal-configuration checks.
//!
//! End-to-end completion is a single fixed-diagonal check performed once per
//! score after extension; ends-free completion is checked per diagonal right
//! after its offset is extended.

use crate::aligner::EndsFree;
use crate::sequence::PaddedSequences;
use crate::wavefront::{offset_h, offset_v, target_diagonal, target_offset, Offset, Wavefront};

/// End-to-end check: done iff the target diagonal lies inside the wavefront
/// and its offset has reached `(text_length, pattern_length)`.
pub(crate) fn end2end_terminal(
    sequences: &PaddedSequences,
    wavefront: &Wavefront,
) -> Option<i32> {
    let k = target_diagonal(sequences.text_len(), sequences.pattern_len());
    if k < wavefront.lo() || k > wavefront.hi() {
        return None;
    }
    // OFFSET_NULL is far below any reachable target offset.
    (wavefront.offset(k) >= target_offset(sequences.text_len())).then_some(k)
}

/// Ends-free check for one diagonal: a diagonal qualifies when one sequence
/// is exhausted and the unaligned suffix of the other fits its free budget.
#[inline]
pub(crate) fn endsfree_qualifies(
    sequences: &PaddedSequences,
    ends_free: EndsFree,
    k: i32,
    offset: Offset,
) -> bool {
    let h = offset_h(k, offset);
    let v = offset_v(k, offset);
    if h >= sequences.text_len() {
        let pattern_left = sequences.pattern_len() - v;
        if pattern_left <= ends_free.pattern_end_free {
            return true;
        }
    }
    if v >= sequences.pattern_len() {
        let text_left = sequences.text_len() - h;
        if text_left <= ends_free.text_end_free {
            return true;
        }
    }
    false
}
