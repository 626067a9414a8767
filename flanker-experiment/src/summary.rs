use flanker_core::{Outcome, TrialRecord};
use std::fmt;

/// End-of-session accuracy and latency digest, printed at debrief.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub trials: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub no_response: usize,
    pub mean_rt_ms: Option<f64>,
    pub min_rt_ms: Option<f64>,
    pub max_rt_ms: Option<f64>,
}

impl SessionSummary {
    pub fn from_records(records: &[TrialRecord]) -> Self {
        let mut correct = 0;
        let mut incorrect = 0;
        let mut no_response = 0;
        let mut rts = Vec::new();

        for record in records {
            match record.response_error {
                Outcome::Correct => {
                    correct += 1;
                    rts.push(record.response_time);
                }
                Outcome::Incorrect => incorrect += 1,
                Outcome::NoResponse => no_response += 1,
            }
        }

        let mean_rt_ms = if rts.is_empty() {
            None
        } else {
            Some(rts.iter().sum::<f64>() / rts.len() as f64)
        };
        let min_rt_ms = rts.iter().cloned().reduce(f64::min);
        let max_rt_ms = rts.iter().cloned().reduce(f64::max);

        Self {
            trials: records.len(),
            correct,
            incorrect,
            no_response,
            mean_rt_ms,
            min_rt_ms,
            max_rt_ms,
        }
    }

    pub fn accuracy_pct(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.correct as f64 / self.trials as f64 * 100.0
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trials: {}, correct {}, incorrect {}, no response {} ({:.1}% accuracy)",
            self.trials,
            self.correct,
            self.incorrect,
            self.no_response,
            self.accuracy_pct()
        )?;
        match (self.mean_rt_ms, self.min_rt_ms, self.max_rt_ms) {
            (Some(mean), Some(min), Some(max)) => write!(
                f,
                "Correct-response times: mean {mean:.1} ms, min {min:.1} ms, max {max:.1} ms"
            ),
            _ => write!(f, "No correct responses recorded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flanker_core::{Congruency, HandPlacement, ResponseMade, TargetLetter};

    fn record(outcome: Outcome, rt: f64) -> TrialRecord {
        TrialRecord {
            block_num: 1,
            trial_num: 1,
            hand_placed: HandPlacement::Left,
            fix_target_asynchrony: 900.0,
            target_letter: TargetLetter::H,
            left_flanker_type: Congruency::Neutral,
            right_flanker_type: Congruency::Neutral,
            response_time: rt,
            response_made: match outcome {
                Outcome::NoResponse => ResponseMade::NoResponse,
                _ => ResponseMade::H,
            },
            response_error: outcome,
        }
    }

    #[test]
    fn summary_counts_the_three_outcomes_separately() {
        let records = vec![
            record(Outcome::Correct, 400.0),
            record(Outcome::Correct, 600.0),
            record(Outcome::Incorrect, 350.0),
            record(Outcome::NoResponse, 1000.0),
        ];
        let summary = SessionSummary::from_records(&records);
        assert_eq!(summary.trials, 4);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.no_response, 1);
        assert_eq!(summary.accuracy_pct(), 50.0);
        assert_eq!(summary.mean_rt_ms, Some(500.0));
        assert_eq!(summary.min_rt_ms, Some(400.0));
        assert_eq!(summary.max_rt_ms, Some(600.0));
    }

    #[test]
    fn empty_session_has_no_latency_stats() {
        let summary = SessionSummary::from_records(&[]);
        assert_eq!(summary.trials, 0);
        assert!(summary.mean_rt_ms.is_none());
    }
}
