//! Exact-match extension core of a score-indexed wavefront aligner.
//!
//! For a given score, an extension pass advances every active diagonal's
//! offset as far as possible through runs of matching characters, then decides
//! whether the alignment has reached a terminal configuration under one of
//! three forms: end-to-end, ends-free, or a user-supplied match predicate.
//!
//! The surrounding engine owns the score/gap recurrence that produces new
//! wavefronts, backtrace, and sequence loading; this crate owns the packed
//! comparison kernel, the termination checks, and the fork-join dispatch over
//! the diagonal range.

pub mod aligner;
pub mod extend;
pub mod sequence; // Sentinel-padded pattern/text buffers for the packed kernel
pub mod wavefront; // Diagonal/offset model and score-indexed storage
