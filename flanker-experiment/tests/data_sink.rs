use flanker_core::{
    Congruency, HandPlacement, Outcome, ResponseMade, TargetLetter, TrialRecord,
};
use flanker_experiment::{JsonLinesSink, TrialSink};
use std::fs;

fn record(trial_num: usize) -> TrialRecord {
    TrialRecord {
        block_num: 1,
        trial_num,
        hand_placed: HandPlacement::Left,
        fix_target_asynchrony: 750.0,
        target_letter: TargetLetter::S,
        left_flanker_type: Congruency::Congruent,
        right_flanker_type: Congruency::Incongruent,
        response_time: 431.5,
        response_made: ResponseMade::S,
        response_error: Outcome::Correct,
    }
}

#[test]
fn sink_writes_one_schema_complete_json_object_per_trial() {
    let path = std::env::temp_dir().join(format!(
        "flanker_sink_test_{}.jsonl",
        std::process::id()
    ));
    {
        let mut sink = JsonLinesSink::create(&path).unwrap();
        sink.commit(&record(1)).unwrap();
        sink.commit(&record(2)).unwrap();
        sink.finish().unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).ok();

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for (i, line) in lines.iter().enumerate() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["trial_num"], i + 1);
        for key in [
            "block_num",
            "trial_num",
            "hand_placed",
            "fix_target_asynchrony",
            "target_letter",
            "left_flanker_type",
            "right_flanker_type",
            "response_time",
            "response_made",
            "response_error",
        ] {
            assert!(value.get(key).is_some(), "missing field {key}");
        }
    }
}
