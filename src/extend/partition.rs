//! Thread-count and diagonal-range partitioning policy.
//!
//! Pure functions of the range bounds, independent of any threading
//! primitive, so the policy is unit-testable without a thread pool.

use std::num::NonZeroUsize;

/// Fork-join sizing knobs for one extension pass.
#[derive(Debug, Clone, Copy)]
pub struct ParallelConfig {
    /// Upper bound on worker threads per extension call.
    pub max_threads: usize,
    /// Diagonals each worker must receive before another thread is worth spawning.
    pub min_diagonals_per_thread: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        ParallelConfig {
            max_threads: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            min_diagonals_per_thread: 512,
        }
    }
}

/// Number of workers for the diagonal range `[lo, hi]`.
///
/// Stays at 1 until the range is wide enough to give every worker at least
/// `min_diagonals_per_thread` diagonals, then scales up to `max_threads`.
pub fn num_threads(config: &ParallelConfig, lo: i32, hi: i32) -> usize {
    let num_diagonals = (hi - lo + 1).max(0) as usize;
    let threads = num_diagonals / config.min_diagonals_per_thread.max(1);
    threads.clamp(1, config.max_threads.max(1))
}

/// Sub-range of diagonals assigned to worker `thread_id` of `num_threads`.
///
/// The sub-ranges are disjoint, contiguous, and cover `[lo, hi]`; sizes
/// differ by at most one, with the remainder going to the leading workers.
pub fn thread_limits(thread_id: usize, num_threads: usize, lo: i32, hi: i32) -> (i32, i32) {
    debug_assert!(thread_id < num_threads);
    debug_assert!(lo <= hi);
    let num_diagonals = (hi - lo + 1) as usize;
    let base = num_diagonals / num_threads;
    let remainder = num_diagonals % num_threads;
    let start = thread_id * base + thread_id.min(remainder);
    let len = base + usize::from(thread_id < remainder);
    let t_lo = lo + start as i32;
    (t_lo, t_lo + len as i32 - 1)
}
