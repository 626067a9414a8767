use flanker_core::{
    Congruency, HandPlacement, Outcome, ResponseMade, TargetLetter, TrialFactors, TrialState,
};
use flanker_experiment::{ExperimentConfig, TrialContext, TrialEvent};

const MS: u64 = 1_000_000;

fn config(window_ms: u64, iti_ms: u64) -> ExperimentConfig {
    let mut config = ExperimentConfig::default();
    config.response_window_ms = window_ms;
    config.inter_trial_ms = iti_ms;
    config
}

fn trial(factors: TrialFactors, soa_ms: f64) -> TrialContext {
    TrialContext::new(1, 1, HandPlacement::Left, factors, soa_ms, 0)
}

fn h_incongruent_neutral() -> TrialFactors {
    TrialFactors {
        target: TargetLetter::H,
        left: Congruency::Incongruent,
        right: Congruency::Neutral,
    }
}

#[test]
fn target_appears_exactly_at_the_asynchrony_deadline() {
    let config = config(1000, 500);
    let mut trial = trial(h_incongruent_neutral(), 900.0);

    assert_eq!(trial.state(), TrialState::Fixation);
    assert_eq!(trial.tick(0, &config), None);
    assert_eq!(trial.state(), TrialState::AwaitingOnset);
    assert_eq!(trial.tick(899 * MS, &config), None);
    assert_eq!(trial.tick(900 * MS, &config), Some(TrialEvent::TargetShown));
    assert_eq!(trial.state(), TrialState::Collecting);
}

#[test]
fn in_window_matching_response_is_correct_with_its_latency() {
    let config = config(1000, 500);
    let mut trial = trial(h_incongruent_neutral(), 900.0);
    trial.tick(0, &config);
    trial.tick(900 * MS, &config);

    let outcome = trial.respond(TargetLetter::H, 1250 * MS, &config);
    assert_eq!(outcome, Some(Outcome::Correct));
    assert_eq!(trial.state(), TrialState::Feedback);
    assert_eq!(trial.response_time_ms(&config), 350.0);

    let record = complete(&mut trial, 1250 * MS, &config);
    assert_eq!(record.response_error, Outcome::Correct);
    assert_eq!(record.response_made, ResponseMade::H);
    assert_eq!(record.response_time, 350.0);
    assert_eq!(record.left_flanker_type, Congruency::Incongruent);
    assert_eq!(record.right_flanker_type, Congruency::Neutral);
    assert_eq!(record.fix_target_asynchrony, 900.0);
}

#[test]
fn mismatching_response_is_incorrect_not_no_response() {
    let config = config(1000, 500);
    let mut trial = trial(h_incongruent_neutral(), 900.0);
    trial.tick(0, &config);
    trial.tick(900 * MS, &config);

    let outcome = trial.respond(TargetLetter::S, 1100 * MS, &config);
    assert_eq!(outcome, Some(Outcome::Incorrect));
    let record = complete(&mut trial, 1100 * MS, &config);
    assert_eq!(record.response_error, Outcome::Incorrect);
    assert_eq!(record.response_made, ResponseMade::S);
}

#[test]
fn timeout_records_the_sentinel_and_the_full_window() {
    let config = config(1000, 500);
    let mut trial = trial(h_incongruent_neutral(), 900.0);
    trial.tick(0, &config);
    trial.tick(900 * MS, &config);

    assert_eq!(trial.tick(1899 * MS, &config), None);
    assert_eq!(
        trial.tick(1900 * MS, &config),
        Some(TrialEvent::TimedOut),
        "window must close exactly at onset + 1000 ms"
    );
    let record = complete(&mut trial, 1900 * MS, &config);
    assert_eq!(record.response_error, Outcome::NoResponse);
    assert_eq!(record.response_made, ResponseMade::NoResponse);
    assert_eq!(record.response_time, 1000.0);
}

#[test]
fn a_key_landing_after_the_window_is_ignored() {
    let config = config(1000, 500);
    let mut trial = trial(h_incongruent_neutral(), 900.0);
    trial.tick(0, &config);
    trial.tick(900 * MS, &config);

    assert_eq!(trial.respond(TargetLetter::H, 1950 * MS, &config), None);
    assert_eq!(
        trial.tick(1950 * MS, &config),
        Some(TrialEvent::TimedOut),
        "late key must fall through to the timeout"
    );
}

#[test]
fn responses_before_target_onset_are_not_collected() {
    let config = config(1000, 500);
    let mut trial = trial(h_incongruent_neutral(), 900.0);
    trial.tick(0, &config);
    assert_eq!(trial.state(), TrialState::AwaitingOnset);
    assert_eq!(trial.respond(TargetLetter::H, 500 * MS, &config), None);
    assert_eq!(trial.state(), TrialState::AwaitingOnset);
}

#[test]
fn inter_trial_interval_gates_completion() {
    let config = config(1000, 500);
    let mut trial = trial(h_incongruent_neutral(), 900.0);
    trial.tick(0, &config);
    trial.tick(900 * MS, &config);
    trial.respond(TargetLetter::H, 1000 * MS, &config);

    // Feedback redraw happens before this tick; the interval starts here.
    assert_eq!(trial.tick(1000 * MS, &config), None);
    assert_eq!(trial.state(), TrialState::InterTrial);
    assert_eq!(trial.tick(1499 * MS, &config), None);
    assert_eq!(trial.tick(1500 * MS, &config), Some(TrialEvent::Finished));
    assert_eq!(trial.state(), TrialState::Complete);
}

fn complete(
    trial: &mut TrialContext,
    from_ns: u64,
    config: &ExperimentConfig,
) -> flanker_core::TrialRecord {
    // Feedback -> InterTrial -> Complete.
    trial.tick(from_ns, config);
    let iti_ns = config.inter_trial_ms * MS;
    assert_eq!(
        trial.tick(from_ns + iti_ns, config),
        Some(TrialEvent::Finished)
    );
    let record = trial.to_record(config);
    assert!(
        record.response_time >= 0.0
            && record.response_time <= config.response_window_ms as f64,
        "response time {} outside [0, window]",
        record.response_time
    );
    record
}
