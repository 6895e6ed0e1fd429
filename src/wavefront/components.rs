//! Score-indexed wavefront storage.
//!
//! The score-recurrence stage installs a wavefront per score before the
//! extension core runs at that score. In modular mode the storage is a
//! fixed-size ring indexed by `score % max_score_scope`: once the score
//! advances past the scope, a slot is recycled by the next `insert` and the
//! extension core only ever reads the slot for its current score.

use super::Wavefront;

#[derive(Debug)]
pub struct WavefrontComponents {
    wavefronts: Vec<Option<Wavefront>>,
    memory_modular: bool,
    max_score_scope: i32,
}

impl WavefrontComponents {
    /// Linear storage, one slot per score. Grows on insert.
    pub fn new(num_scores: usize) -> Self {
        WavefrontComponents {
            wavefronts: (0..num_scores).map(|_| None).collect(),
            memory_modular: false,
            max_score_scope: num_scores.max(1) as i32,
        }
    }

    /// Fixed-size ring of `max_score_scope` slots, indexed modulo the scope.
    pub fn new_modular(max_score_scope: i32) -> Self {
        assert!(max_score_scope > 0, "score scope must be positive");
        WavefrontComponents {
            wavefronts: (0..max_score_scope).map(|_| None).collect(),
            memory_modular: true,
            max_score_scope,
        }
    }

    #[inline]
    pub fn memory_modular(&self) -> bool {
        self.memory_modular
    }

    #[inline]
    pub fn max_score_scope(&self) -> i32 {
        self.max_score_scope
    }

    #[inline]
    fn slot(&self, score: i32) -> usize {
        debug_assert!(score >= 0, "negative score {score}");
        if self.memory_modular {
            (score % self.max_score_scope) as usize
        } else {
            score as usize
        }
    }

    /// Install the wavefront for `score`, dropping whatever occupied its slot.
    ///
    /// Owned by the score-recurrence stage; the extension core never inserts.
    pub fn insert(&mut self, score: i32, wavefront: Wavefront) {
        let slot = self.slot(score);
        if slot >= self.wavefronts.len() {
            self.wavefronts.resize_with(slot + 1, || None);
        }
        self.wavefronts[slot] = Some(wavefront);
    }

    /// Wavefront for `score`, if the recurrence has produced one.
    pub fn wavefront(&self, score: i32) -> Option<&Wavefront> {
        self.wavefronts.get(self.slot(score))?.as_ref()
    }

    pub fn wavefront_mut(&mut self, score: i32) -> Option<&mut Wavefront> {
        let slot = self.slot(score);
        self.wavefronts.get_mut(slot)?.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_score_is_none() {
        let components = WavefrontComponents::new(4);
        assert!(components.wavefront(0).is_none());
        assert!(components.wavefront(100).is_none());
    }

    #[test]
    fn test_linear_insert_grows() {
        let mut components = WavefrontComponents::new(1);
        components.insert(5, Wavefront::new(0, 0));
        assert!(components.wavefront(5).is_some());
        assert!(components.wavefront(4).is_none());
    }

    #[test]
    fn test_modular_ring_reuses_slots() {
        let mut components = WavefrontComponents::new_modular(3);
        components.insert(1, Wavefront::new(0, 0));
        assert!(components.wavefront(1).is_some());

        // Score 4 lands on the same slot as score 1 and recycles it.
        components.insert(4, Wavefront::new(-2, 2));
        let wf = components.wavefront(4).unwrap();
        assert_eq!((wf.lo(), wf.hi()), (-2, 2));
        assert_eq!(
            components.wavefront(1).map(|w| (w.lo(), w.hi())),
            Some((-2, 2))
        );
    }
}
