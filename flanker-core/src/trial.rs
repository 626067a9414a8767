use crate::conditions::{Congruency, HandPlacement, TargetLetter};
use serde::{Deserialize, Serialize};

/// Per-trial phase controller states, in running order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    Fixation,
    AwaitingOnset,
    Collecting,
    Feedback,
    InterTrial,
    Complete,
}

/// Three-way trial outcome. No-response is a distinct category and is never
/// folded into incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    NoResponse,
}

/// What the participant pressed, or the timeout sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseMade {
    H,
    S,
    #[serde(rename = "NO_RESPONSE")]
    NoResponse,
}

impl From<TargetLetter> for ResponseMade {
    fn from(letter: TargetLetter) -> Self {
        match letter {
            TargetLetter::H => ResponseMade::H,
            TargetLetter::S => ResponseMade::S,
        }
    }
}

impl ResponseMade {
    pub fn matches(&self, target: TargetLetter) -> bool {
        matches!(
            (self, target),
            (ResponseMade::H, TargetLetter::H) | (ResponseMade::S, TargetLetter::S)
        )
    }
}

/// One output row per completed trial. Created at trial end, immutable
/// afterwards, handed to the data sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    pub block_num: usize,
    pub trial_num: usize,
    pub hand_placed: HandPlacement,
    pub fix_target_asynchrony: f64,
    pub target_letter: TargetLetter,
    pub left_flanker_type: Congruency,
    pub right_flanker_type: Congruency,
    pub response_time: f64,
    pub response_made: ResponseMade,
    pub response_error: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_the_sink_schema() {
        let record = TrialRecord {
            block_num: 2,
            trial_num: 7,
            hand_placed: HandPlacement::Right,
            fix_target_asynchrony: 1234.5,
            target_letter: TargetLetter::H,
            left_flanker_type: Congruency::Incongruent,
            right_flanker_type: Congruency::Neutral,
            response_time: 512.25,
            response_made: ResponseMade::H,
            response_error: Outcome::Correct,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["block_num"], 2);
        assert_eq!(json["trial_num"], 7);
        assert_eq!(json["hand_placed"], "right");
        assert_eq!(json["fix_target_asynchrony"], 1234.5);
        assert_eq!(json["target_letter"], "H");
        assert_eq!(json["left_flanker_type"], "incongruent");
        assert_eq!(json["right_flanker_type"], "neutral");
        assert_eq!(json["response_time"], 512.25);
        assert_eq!(json["response_made"], "H");
        assert_eq!(json["response_error"], "correct");
    }

    #[test]
    fn timeout_sentinel_serializes_as_no_response() {
        let json = serde_json::to_value(ResponseMade::NoResponse).unwrap();
        assert_eq!(json, "NO_RESPONSE");
        let json = serde_json::to_value(Outcome::NoResponse).unwrap();
        assert_eq!(json, "no_response");
    }

    #[test]
    fn response_matches_only_its_own_target() {
        assert!(ResponseMade::H.matches(TargetLetter::H));
        assert!(!ResponseMade::H.matches(TargetLetter::S));
        assert!(ResponseMade::S.matches(TargetLetter::S));
        assert!(!ResponseMade::NoResponse.matches(TargetLetter::H));
        assert!(!ResponseMade::NoResponse.matches(TargetLetter::S));
    }
}
