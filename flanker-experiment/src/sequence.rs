use rand::seq::SliceRandom;
use rand::Rng;

/// Block-condition sequence: the multiset `labels x repetitions` in a uniform
/// random order, consumed one entry per block. Popping past exhaustion is a
/// programming error in the caller (the planned block count must equal the
/// sequence length), so `pop` returns `None` and the session driver aborts.
#[derive(Debug, Clone)]
pub struct BlockSequence<L: Copy> {
    // Stored reversed so pop() serves entries front-first.
    remaining: Vec<L>,
}

impl<L: Copy> BlockSequence<L> {
    pub fn randomized(labels: &[L], repetitions: usize, rng: &mut impl Rng) -> Self {
        let mut seq = Vec::with_capacity(labels.len() * repetitions);
        for _ in 0..repetitions {
            seq.extend_from_slice(labels);
        }
        seq.shuffle(rng);
        seq.reverse();
        Self { remaining: seq }
    }

    /// Every distinct label exactly once, in declaration order. Used for the
    /// practice phase so each condition is seen before the main sequence.
    pub fn enumerated(labels: &[L]) -> Self {
        let mut seq = labels.to_vec();
        seq.reverse();
        Self { remaining: seq }
    }

    pub fn pop(&mut self) -> Option<L> {
        self.remaining.pop()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
