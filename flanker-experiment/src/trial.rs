use crate::config::ExperimentConfig;
use flanker_core::{
    HandPlacement, Outcome, ResponseMade, TargetLetter, TrialFactors, TrialRecord, TrialState,
};
use flanker_timing::Ticket;

/// Emitted by `tick` when a deadline fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEvent {
    /// The asynchrony deadline passed; the target array is now visible.
    TargetShown,
    /// The response window elapsed with no key collected.
    TimedOut,
    /// The inter-trial interval elapsed; the trial is complete.
    Finished,
}

/// Everything one trial owns, passed through the phase controller by
/// reference. Nothing about a trial lives outside this value, so state
/// cannot leak across trials.
#[derive(Debug, Clone)]
pub struct TrialContext {
    block_num: usize,
    trial_num: usize,
    hand: HandPlacement,
    factors: TrialFactors,
    soa_ms: f64,

    state: TrialState,
    onset_ticket: Ticket,
    iti_ticket: Option<Ticket>,
    onset_ns: Option<u64>,
    response: Option<(ResponseMade, u64)>,
    outcome: Option<Outcome>,
}

impl TrialContext {
    pub fn new(
        block_num: usize,
        trial_num: usize,
        hand: HandPlacement,
        factors: TrialFactors,
        soa_ms: f64,
        now_ns: u64,
    ) -> Self {
        // Fixation is on screen from trial start; the target onset deadline
        // is registered against that same instant.
        let due_ns = now_ns + (soa_ms * 1e6) as u64;
        Self {
            block_num,
            trial_num,
            hand,
            factors,
            soa_ms,
            state: TrialState::Fixation,
            onset_ticket: Ticket::at("target_onset", due_ns),
            iti_ticket: None,
            onset_ns: None,
            response: None,
            outcome: None,
        }
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    pub fn factors(&self) -> TrialFactors {
        self.factors
    }

    pub fn hand(&self) -> HandPlacement {
        self.hand
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Advance the controller against the clock. Called once per poll
    /// iteration; the caller services input and quit requests between calls.
    pub fn tick(&mut self, now_ns: u64, config: &ExperimentConfig) -> Option<TrialEvent> {
        match self.state {
            TrialState::Fixation => {
                // The onset ticket was registered at prep; nothing further to
                // wait for before the asynchrony countdown.
                self.state = TrialState::AwaitingOnset;
                self.tick(now_ns, config)
            }
            TrialState::AwaitingOnset => {
                if self.onset_ticket.is_due(now_ns) {
                    self.state = TrialState::Collecting;
                    self.onset_ns = Some(now_ns);
                    return Some(TrialEvent::TargetShown);
                }
                None
            }
            TrialState::Collecting => {
                let onset = self.onset_ns.unwrap_or(now_ns);
                let window_ns = config.response_window_ms * 1_000_000;
                if now_ns.saturating_sub(onset) >= window_ns {
                    self.outcome = Some(Outcome::NoResponse);
                    self.state = TrialState::Feedback;
                    return Some(TrialEvent::TimedOut);
                }
                None
            }
            TrialState::Feedback => {
                // The host redraws (target blanked, guide only) before this
                // tick, so the inter-trial countdown starts here.
                self.iti_ticket = Some(Ticket::at(
                    "inter_trial",
                    now_ns + config.inter_trial_ms * 1_000_000,
                ));
                self.state = TrialState::InterTrial;
                None
            }
            TrialState::InterTrial => {
                let ticket = self.iti_ticket.expect("inter-trial ticket registered");
                if ticket.is_due(now_ns) {
                    self.state = TrialState::Complete;
                    return Some(TrialEvent::Finished);
                }
                None
            }
            TrialState::Complete => None,
        }
    }

    /// Collect a key response. Accepted only while the target is up and the
    /// window is still open; a late key is ignored and the timeout fires on
    /// the next tick instead.
    pub fn respond(
        &mut self,
        letter: TargetLetter,
        now_ns: u64,
        config: &ExperimentConfig,
    ) -> Option<Outcome> {
        if self.state != TrialState::Collecting {
            return None;
        }
        let onset = self.onset_ns?;
        if now_ns.saturating_sub(onset) >= config.response_window_ms * 1_000_000 {
            return None;
        }
        let made = ResponseMade::from(letter);
        let outcome = if made.matches(self.factors.target) {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        self.response = Some((made, now_ns));
        self.outcome = Some(outcome);
        self.state = TrialState::Feedback;
        Some(outcome)
    }

    pub fn response_time_ms(&self, config: &ExperimentConfig) -> f64 {
        match (self.response, self.onset_ns) {
            (Some((_, at_ns)), Some(onset_ns)) => at_ns.saturating_sub(onset_ns) as f64 / 1e6,
            _ => config.response_window_ms as f64,
        }
    }

    /// The immutable output row. Valid once the trial is complete.
    pub fn to_record(&self, config: &ExperimentConfig) -> TrialRecord {
        let outcome = self.outcome.unwrap_or(Outcome::NoResponse);
        let response_made = match self.response {
            Some((made, _)) => made,
            None => ResponseMade::NoResponse,
        };
        TrialRecord {
            block_num: self.block_num,
            trial_num: self.trial_num,
            hand_placed: self.hand,
            fix_target_asynchrony: self.soa_ms,
            target_letter: self.factors.target,
            left_flanker_type: self.factors.left,
            right_flanker_type: self.factors.right,
            response_time: self.response_time_ms(config),
            response_made,
            response_error: outcome,
        }
    }
}
