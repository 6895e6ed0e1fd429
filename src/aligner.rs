//! Aligner state shared by the extension drivers.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::extend::ParallelConfig;
use crate::sequence::{PaddedSequences, SequenceError};
use crate::wavefront::components::WavefrontComponents;
use crate::wavefront::Wavefront;

/// User match predicate over `(v, h)` grid coordinates.
///
/// Called with monotonically increasing coordinates from each diagonal's
/// current point; must be pure with respect to alignment state and safe to
/// invoke concurrently from independent diagonals.
pub type MatchFn = dyn Fn(i32, i32) -> bool + Send + Sync;

/// Maximum unaligned suffix tolerated on each sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndsFree {
    pub pattern_end_free: i32,
    pub text_end_free: i32,
}

/// Which terminal configurations end the alignment.
#[derive(Clone)]
pub enum AlignmentForm {
    /// Both sequences fully consumed.
    EndToEnd,
    /// Bounded unaligned suffix allowed on either sequence.
    EndsFree(EndsFree),
    /// Matches decided by a user predicate instead of character comparison;
    /// ends-free budgets optional, otherwise end-to-end completion applies.
    CustomSpan {
        match_fn: Arc<MatchFn>,
        ends_free: Option<EndsFree>,
    },
}

impl fmt::Debug for AlignmentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentForm::EndToEnd => f.write_str("EndToEnd"),
            AlignmentForm::EndsFree(ends_free) => {
                f.debug_tuple("EndsFree").field(ends_free).finish()
            }
            AlignmentForm::CustomSpan { ends_free, .. } => f
                .debug_struct("CustomSpan")
                .field("ends_free", ends_free)
                .finish_non_exhaustive(),
        }
    }
}

/// Alignment progress as seen by the surrounding engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignStatus {
    InProgress,
    Successful,
    /// Ended early by the heuristic cutoff; any reported result is approximate.
    HeuristicallyDropped,
}

/// Heuristic cutoff consulted when a score completes without termination.
pub trait HeuristicCutoff: Send {
    /// Returns true when the alignment should be abandoned at `score`.
    ///
    /// The wavefront may be mutated (e.g. deactivating diagonals); offsets of
    /// surviving diagonals must not shrink.
    fn prune(&mut self, wavefront: &mut Wavefront, score: i32) -> bool;
}

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("ends-free budget {budget} out of range for sequence length {length}")]
    InvalidEndsFree { budget: i32, length: i32 },
}

/// Pairwise aligner state: sequences, alignment form, score-indexed
/// wavefronts, fork-join configuration, and the optional heuristic cutoff.
pub struct WavefrontAligner {
    pub(crate) sequences: PaddedSequences,
    pub(crate) form: AlignmentForm,
    pub(crate) components: WavefrontComponents,
    pub(crate) parallel: ParallelConfig,
    pub(crate) heuristic: Option<Box<dyn HeuristicCutoff>>,
    pub(crate) status: AlignStatus,
}

impl std::fmt::Debug for WavefrontAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavefrontAligner")
            .field("sequences", &self.sequences)
            .field("form", &self.form)
            .field("components", &self.components)
            .field("parallel", &self.parallel)
            .field("heuristic", &self.heuristic.as_ref().map(|_| "<dyn HeuristicCutoff>"))
            .field("status", &self.status)
            .finish()
    }
}

impl WavefrontAligner {
    /// Build an aligner over `pattern` and `text`.
    ///
    /// `components` is filled per score by the score-recurrence stage; this
    /// core only reads and mutates the wavefront at the score being extended.
    /// Ends-free budgets are validated here, at construction time.
    pub fn new(
        pattern: &[u8],
        text: &[u8],
        form: AlignmentForm,
        components: WavefrontComponents,
    ) -> Result<Self, AlignerError> {
        let sequences = PaddedSequences::new(pattern, text)?;
        if let Some(ends_free) = form_ends_free(&form) {
            check_budget(ends_free.pattern_end_free, sequences.pattern_len())?;
            check_budget(ends_free.text_end_free, sequences.text_len())?;
        }
        Ok(WavefrontAligner {
            sequences,
            form,
            components,
            parallel: ParallelConfig::default(),
            heuristic: None,
            status: AlignStatus::InProgress,
        })
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Box<dyn HeuristicCutoff>) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    #[inline]
    pub fn status(&self) -> AlignStatus {
        self.status
    }

    #[inline]
    pub fn form(&self) -> &AlignmentForm {
        &self.form
    }

    #[inline]
    pub fn sequences(&self) -> &PaddedSequences {
        &self.sequences
    }

    #[inline]
    pub fn components(&self) -> &WavefrontComponents {
        &self.components
    }

    /// Mutable storage access for the score-recurrence stage.
    #[inline]
    pub fn components_mut(&mut self) -> &mut WavefrontComponents {
        &mut self.components
    }
}

fn form_ends_free(form: &AlignmentForm) -> Option<EndsFree> {
    match form {
        AlignmentForm::EndToEnd => None,
        AlignmentForm::EndsFree(ends_free) => Some(*ends_free),
        AlignmentForm::CustomSpan { ends_free, .. } => *ends_free,
    }
}

fn check_budget(budget: i32, length: i32) -> Result<(), AlignerError> {
    if budget < 0 || budget > length {
        return Err(AlignerError::InvalidEndsFree { budget, length });
    }
    Ok(())
}
