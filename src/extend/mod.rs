//! Per-score exact-match extension drivers.
//!
//! One driver per alignment form. Each resolves the wavefront for the score,
//! derives a worker count from the diagonal range, runs the match kernel
//! inline or fork-join over disjoint sub-ranges, aggregates termination, and
//! falls back to the heuristic cutoff when no terminal diagonal was found.
//!
//! Workers never share mutable state: each extends its own contiguous slice
//! of the offsets array and reports a local candidate terminal diagonal; the
//! driver reduces the candidates to the minimum qualifying diagonal after the
//! join. Every diagonal of the range is extended even once a candidate is
//! known, so the offsets array and the recorded terminal diagonal are
//! independent of the worker layout.

mod kernel;
mod partition;
mod termination;

pub use partition::{num_threads, thread_limits, ParallelConfig};

use rayon::prelude::*;

use crate::aligner::{
    AlignStatus, AlignmentForm, EndsFree, HeuristicCutoff, MatchFn, WavefrontAligner,
};
use crate::sequence::PaddedSequences;
use crate::wavefront::{Offset, Wavefront, OFFSET_NULL};

impl WavefrontAligner {
    /// Extend every active diagonal of the wavefront at `score`, then check
    /// for termination under the configured alignment form.
    ///
    /// Returns `true` when the alignment is done, either `Successful` or
    /// `HeuristicallyDropped`; the caller advances to the next score on
    /// `false`. An absent wavefront at `score` is not an error and reports
    /// not-done.
    pub fn extend(&mut self, score: i32) -> bool {
        match self.form {
            AlignmentForm::EndToEnd => extend_end2end(self, score),
            AlignmentForm::EndsFree(_) => extend_endsfree(self, score),
            AlignmentForm::CustomSpan { .. } => extend_custom(self, score),
        }
    }
}

fn extend_end2end(aligner: &mut WavefrontAligner, score: i32) -> bool {
    let WavefrontAligner {
        sequences,
        components,
        parallel,
        heuristic,
        status,
        ..
    } = aligner;
    let sequences = &*sequences;
    let score = effective_score(components, score);
    let Some(wavefront) = components.wavefront_mut(score) else {
        return false;
    };
    let (lo, hi) = (wavefront.lo(), wavefront.hi());
    let threads = partition::num_threads(parallel, lo, hi);
    if threads == 1 {
        extend_packed_range(sequences, lo, wavefront.offsets_mut());
    } else {
        log::debug!("extend: score={score} diagonals=[{lo},{hi}] threads={threads}");
        split_offsets(wavefront.offsets_mut(), lo, hi, threads)
            .into_par_iter()
            .for_each(|(chunk_lo, chunk)| extend_packed_range(sequences, chunk_lo, chunk));
    }
    let terminal = termination::end2end_terminal(sequences, wavefront);
    finish(wavefront, heuristic, status, terminal, score)
}

fn extend_endsfree(aligner: &mut WavefrontAligner, score: i32) -> bool {
    let ends_free = match &aligner.form {
        AlignmentForm::EndsFree(ends_free) => *ends_free,
        _ => unreachable!("ends-free driver requires an ends-free form"),
    };
    let WavefrontAligner {
        sequences,
        components,
        parallel,
        heuristic,
        status,
        ..
    } = aligner;
    let sequences = &*sequences;
    let score = effective_score(components, score);
    let Some(wavefront) = components.wavefront_mut(score) else {
        return false;
    };
    let (lo, hi) = (wavefront.lo(), wavefront.hi());
    let threads = partition::num_threads(parallel, lo, hi);
    let terminal = if threads == 1 {
        extend_packed_range_endsfree(sequences, ends_free, lo, wavefront.offsets_mut())
    } else {
        log::debug!("extend: score={score} diagonals=[{lo},{hi}] threads={threads}");
        split_offsets(wavefront.offsets_mut(), lo, hi, threads)
            .into_par_iter()
            .filter_map(|(chunk_lo, chunk)| {
                extend_packed_range_endsfree(sequences, ends_free, chunk_lo, chunk)
            })
            .min()
    };
    finish(wavefront, heuristic, status, terminal, score)
}

fn extend_custom(aligner: &mut WavefrontAligner, score: i32) -> bool {
    let (match_fn, ends_free) = match &aligner.form {
        AlignmentForm::CustomSpan {
            match_fn,
            ends_free,
        } => (match_fn.clone(), *ends_free),
        _ => unreachable!("custom driver requires a custom-span form"),
    };
    let WavefrontAligner {
        sequences,
        components,
        parallel,
        heuristic,
        status,
        ..
    } = aligner;
    let sequences = &*sequences;
    let score = effective_score(components, score);
    let Some(wavefront) = components.wavefront_mut(score) else {
        return false;
    };
    let (lo, hi) = (wavefront.lo(), wavefront.hi());
    let threads = partition::num_threads(parallel, lo, hi);
    let found = if threads == 1 {
        extend_predicate_range(&*match_fn, sequences, ends_free, lo, wavefront.offsets_mut())
    } else {
        log::debug!("extend: score={score} diagonals=[{lo},{hi}] threads={threads}");
        let match_fn = &*match_fn;
        split_offsets(wavefront.offsets_mut(), lo, hi, threads)
            .into_par_iter()
            .filter_map(|(chunk_lo, chunk)| {
                extend_predicate_range(match_fn, sequences, ends_free, chunk_lo, chunk)
            })
            .min()
    };
    // Without ends-free budgets the custom form completes end-to-end.
    let terminal = match ends_free {
        Some(_) => found,
        None => termination::end2end_terminal(sequences, wavefront),
    };
    finish(wavefront, heuristic, status, terminal, score)
}

/// Modular storage folds the score onto its ring slot; the folded score is
/// also what the log lines and the heuristic see.
fn effective_score(components: &crate::wavefront::components::WavefrontComponents, score: i32) -> i32 {
    if components.memory_modular() {
        score % components.max_score_scope()
    } else {
        score
    }
}

/// Record the terminal diagonal or fall back to the heuristic cutoff.
fn finish(
    wavefront: &mut Wavefront,
    heuristic: &mut Option<Box<dyn HeuristicCutoff>>,
    status: &mut AlignStatus,
    terminal: Option<i32>,
    score: i32,
) -> bool {
    if let Some(k) = terminal {
        wavefront.record_terminal(k);
        *status = AlignStatus::Successful;
        log::debug!("extend: terminal diagonal {k} at score {score}");
        return true;
    }
    if let Some(heuristic) = heuristic.as_deref_mut() {
        if heuristic.prune(wavefront, score) {
            *status = AlignStatus::HeuristicallyDropped;
            log::debug!("extend: wavefront dropped heuristically at score {score}");
            return true;
        }
    }
    false
}

/// Extend every active diagonal of one contiguous chunk. `chunk_lo` is the
/// diagonal of the chunk's first offset.
fn extend_packed_range(sequences: &PaddedSequences, chunk_lo: i32, offsets: &mut [Offset]) {
    for (i, offset) in offsets.iter_mut().enumerate() {
        if *offset == OFFSET_NULL {
            continue;
        }
        *offset = kernel::extend_packed(sequences, chunk_lo + i as i32, *offset);
    }
}

/// Packed extension plus the per-diagonal ends-free check. Returns the first
/// (lowest) qualifying diagonal of the chunk; extension continues past it.
fn extend_packed_range_endsfree(
    sequences: &PaddedSequences,
    ends_free: EndsFree,
    chunk_lo: i32,
    offsets: &mut [Offset],
) -> Option<i32> {
    let mut terminal = None;
    for (i, offset) in offsets.iter_mut().enumerate() {
        if *offset == OFFSET_NULL {
            continue;
        }
        let k = chunk_lo + i as i32;
        let extended = kernel::extend_packed(sequences, k, *offset);
        *offset = extended;
        if terminal.is_none() && termination::endsfree_qualifies(sequences, ends_free, k, extended)
        {
            terminal = Some(k);
        }
    }
    terminal
}

/// Predicate-driven extension; ends-free checks only when budgets are set.
fn extend_predicate_range(
    match_fn: &MatchFn,
    sequences: &PaddedSequences,
    ends_free: Option<EndsFree>,
    chunk_lo: i32,
    offsets: &mut [Offset],
) -> Option<i32> {
    let mut terminal = None;
    for (i, offset) in offsets.iter_mut().enumerate() {
        if *offset == OFFSET_NULL {
            continue;
        }
        let k = chunk_lo + i as i32;
        let extended = kernel::extend_predicate(match_fn, k, *offset);
        *offset = extended;
        if let (None, Some(budgets)) = (terminal, ends_free) {
            if termination::endsfree_qualifies(sequences, budgets, k, extended) {
                terminal = Some(k);
            }
        }
    }
    terminal
}

/// Carve the offsets array into per-worker chunks matching `thread_limits`'
/// partition of `[lo, hi]`: disjoint, contiguous, covering.
fn split_offsets(
    mut offsets: &mut [Offset],
    lo: i32,
    hi: i32,
    threads: usize,
) -> Vec<(i32, &mut [Offset])> {
    let mut chunks = Vec::with_capacity(threads);
    for thread_id in 0..threads {
        let (t_lo, t_hi) = partition::thread_limits(thread_id, threads, lo, hi);
        let (head, tail) = offsets.split_at_mut((t_hi - t_lo + 1) as usize);
        chunks.push((t_lo, head));
        offsets = tail;
    }
    debug_assert!(offsets.is_empty());
    chunks
}
