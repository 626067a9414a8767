use crate::conditions::{flanker_letter, Congruency, TargetLetter};
use serde::{Deserialize, Serialize};

/// One cell of the factorial design: everything that varies trial to trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialFactors {
    pub target: TargetLetter,
    pub left: Congruency,
    pub right: Congruency,
}

impl TrialFactors {
    pub fn left_letter(&self) -> char {
        flanker_letter(self.left, self.target)
    }

    pub fn right_letter(&self) -> char {
        flanker_letter(self.right, self.target)
    }
}

/// Declares the experiment factors and their allowed levels. Immutable once
/// constructed; consumed to generate the full factorial trial table before
/// block and trial counts are known.
#[derive(Debug, Clone)]
pub struct IndependentVariableSet {
    target_letters: Vec<TargetLetter>,
    left_flankers: Vec<Congruency>,
    right_flankers: Vec<Congruency>,
}

impl IndependentVariableSet {
    /// The full design: target in {H, S}, each flanker independently in
    /// {congruent, incongruent, neutral}.
    pub fn standard() -> Self {
        Self {
            target_letters: TargetLetter::ALL.to_vec(),
            left_flankers: Congruency::ALL.to_vec(),
            right_flankers: Congruency::ALL.to_vec(),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.target_letters.len() * self.left_flankers.len() * self.right_flankers.len()
    }

    /// Cross of all factor levels, in declaration order.
    pub fn factorial(&self) -> Vec<TrialFactors> {
        let mut cells = Vec::with_capacity(self.cell_count());
        for &target in &self.target_letters {
            for &left in &self.left_flankers {
                for &right in &self.right_flankers {
                    cells.push(TrialFactors {
                        target,
                        left,
                        right,
                    });
                }
            }
        }
        cells
    }
}

impl Default for IndependentVariableSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_factorial_has_eighteen_distinct_cells() {
        let cells = IndependentVariableSet::standard().factorial();
        assert_eq!(cells.len(), 18);
        for (i, a) in cells.iter().enumerate() {
            for b in cells.iter().skip(i + 1) {
                assert_ne!(a, b, "duplicate factorial cell {:?}", a);
            }
        }
    }

    #[test]
    fn factorial_covers_every_level_of_every_factor() {
        let cells = IndependentVariableSet::standard().factorial();
        for target in TargetLetter::ALL {
            assert!(cells.iter().any(|c| c.target == target));
        }
        for level in Congruency::ALL {
            assert!(cells.iter().any(|c| c.left == level));
            assert!(cells.iter().any(|c| c.right == level));
        }
    }
}
