use crate::config::ExperimentConfig;
use crate::display;
use crate::io::{ErrorCue, TrialSink};
use crate::sequence::BlockSequence;
use crate::soa::SoaSampler;
use crate::summary::SessionSummary;
use crate::trial::{TrialContext, TrialEvent};
use anyhow::{bail, Result};
use flanker_core::{
    DrawCmd, HandPlacement, IndependentVariableSet, Layout, Outcome, SessionPhase, TargetLetter,
    TrialFactors, TrialRecord,
};
use flanker_timing::Timer;
use rand::seq::SliceRandom;
use rand::Rng;

/// Input events after key-to-label mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Space: leave the welcome or block-intro screen.
    Advance,
    /// A response key, already mapped to its label.
    Respond(TargetLetter),
    /// Escape or window close: unwind the session immediately.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    BlockReady,
    TrialFinished,
    PhaseAdvanced,
    SessionFinished,
}

struct BlockPlan {
    num: usize,
    hand: HandPlacement,
    table: Vec<TrialFactors>,
    next: usize,
}

/// Session driver: owns the block sequences, the active trial context and the
/// collaborators, and is polled from the host event loop. Each `update` call
/// is one iteration of the responsive wait: quit is checked first, then the
/// active trial's deadlines.
pub struct ExperimentDriver<T, R, S, C>
where
    T: Timer,
    R: Rng,
    S: TrialSink,
    C: ErrorCue,
{
    pub timer: T,
    rng: R,
    sink: S,
    cue: C,
    config: ExperimentConfig,
    ivars: IndependentVariableSet,
    sampler: SoaSampler,
    layout: Layout,

    phase: SessionPhase,
    practice_seq: BlockSequence<HandPlacement>,
    main_seq: BlockSequence<HandPlacement>,
    blocks_done: usize,
    block: Option<BlockPlan>,
    awaiting_start: bool,
    trial: Option<TrialContext>,

    records: Vec<TrialRecord>,
    practice_total: usize,
    practice_correct: usize,
    quit_requested: bool,
    finished: bool,
}

impl<T, R, S, C> ExperimentDriver<T, R, S, C>
where
    T: Timer,
    R: Rng,
    S: TrialSink,
    C: ErrorCue,
{
    pub fn new(config: ExperimentConfig, timer: T, mut rng: R, sink: S, cue: C) -> Result<Self> {
        config.validate()?;
        let sampler = SoaSampler::new(config.soa_min_ms, config.soa_mean_ms, config.soa_max_ms)?;

        // Practice sees each placement once, in declaration order; the main
        // phase draws from a separately shuffled placements x reps sequence.
        let practice_seq = BlockSequence::enumerated(&HandPlacement::ALL);
        let main_seq =
            BlockSequence::randomized(&HandPlacement::ALL, config.blocks_per_hand, &mut rng);

        let layout = Layout::new(1920, 1080, config.px_per_degree);

        Ok(Self {
            timer,
            rng,
            sink,
            cue,
            config,
            ivars: IndependentVariableSet::standard(),
            sampler,
            layout,
            phase: SessionPhase::default(),
            practice_seq,
            main_seq,
            blocks_done: 0,
            block: None,
            awaiting_start: true,
            trial: None,
            records: Vec::new(),
            practice_total: 0,
            practice_correct: 0,
            quit_requested: false,
            finished: false,
        })
    }

    /// Recompute stimulus geometry for the actual surface size.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.layout = Layout::new(width, height, self.config.px_per_degree);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_awaiting_start(&self) -> bool {
        self.awaiting_start
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn current_trial(&self) -> Option<&TrialContext> {
        self.trial.as_ref()
    }

    /// Hand-guide placement of the prepared or running block.
    pub fn current_hand(&self) -> Option<HandPlacement> {
        self.block.as_ref().map(|b| b.hand)
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    fn phase_blocks(&self) -> usize {
        if self.phase.is_practice() {
            HandPlacement::ALL.len()
        } else {
            self.config.blocks
        }
    }

    fn phase_trials_per_block(&self) -> usize {
        if self.phase.is_practice() {
            self.config.practice_trials_per_block
        } else {
            self.config.trials_per_block
        }
    }

    /// Per-block trial table: whole reshuffled passes over the factorial
    /// design, so no cell repeats before the design is exhausted.
    fn build_block_table(&mut self, trials: usize) -> Vec<TrialFactors> {
        let cells = self.ivars.factorial();
        let mut table = Vec::with_capacity(trials);
        while table.len() < trials {
            let mut pass = cells.clone();
            pass.shuffle(&mut self.rng);
            let take = (trials - table.len()).min(pass.len());
            table.extend(pass.into_iter().take(take));
        }
        table
    }

    fn prepare_next_block(&mut self) -> Result<()> {
        let hand = match self.phase {
            SessionPhase::Practice => self.practice_seq.pop(),
            SessionPhase::Experiment => self.main_seq.pop(),
            _ => bail!("no block to prepare in phase {:?}", self.phase),
        };
        let Some(hand) = hand else {
            bail!("block sequence exhausted: more blocks requested than planned");
        };
        let num = self.blocks_done + 1;
        let table = self.build_block_table(self.phase_trials_per_block());
        println!(
            "{:?} block {num}/{} ready, hand guide on the {}",
            self.phase,
            self.phase_blocks(),
            hand.label()
        );
        self.block = Some(BlockPlan {
            num,
            hand,
            table,
            next: 0,
        });
        self.awaiting_start = true;
        self.trial = None;
        Ok(())
    }

    fn start_trial(&mut self) {
        let (block_num, trial_idx, hand, factors) = {
            let block = self.block.as_ref().expect("active block");
            (block.num, block.next, block.hand, block.table[block.next])
        };
        let soa_ms = self.sampler.sample(&mut self.rng);
        let now_ns = self.timer.now_ns();
        println!(
            "Block {block_num} trial {} started, asynchrony {soa_ms:.0} ms",
            trial_idx + 1
        );
        self.trial = Some(TrialContext::new(
            block_num,
            trial_idx + 1,
            hand,
            factors,
            soa_ms,
            now_ns,
        ));
    }

    pub fn handle_key(&mut self, key: KeyInput) -> Result<Vec<DriverEvent>> {
        let mut events = Vec::new();
        if self.finished {
            return Ok(events);
        }
        match key {
            KeyInput::Quit => self.quit_requested = true,
            KeyInput::Advance => match self.phase {
                SessionPhase::Welcome => {
                    self.advance_phase(&mut events)?;
                }
                SessionPhase::Practice | SessionPhase::Experiment => {
                    if self.awaiting_start && self.block.is_some() {
                        self.awaiting_start = false;
                        self.start_trial();
                    }
                }
                SessionPhase::Debrief => {
                    self.finished = true;
                    events.push(DriverEvent::SessionFinished);
                }
            },
            KeyInput::Respond(letter) => {
                if self.phase.runs_trials() && !self.awaiting_start {
                    let now_ns = self.timer.now_ns();
                    if let Some(trial) = self.trial.as_mut() {
                        if let Some(outcome) = trial.respond(letter, now_ns, &self.config) {
                            let rt = trial.response_time_ms(&self.config);
                            println!("Response {letter:?}: {outcome:?}, rt {rt:.1} ms");
                            if outcome == Outcome::Incorrect {
                                self.cue.error_tone();
                            }
                        }
                    }
                }
            }
        }
        Ok(events)
    }

    /// One poll iteration. Quit unwinds before any deadline work; nothing
    /// beyond already-committed records survives an abort.
    pub fn update(&mut self) -> Result<Vec<DriverEvent>> {
        let mut events = Vec::new();
        if self.finished {
            return Ok(events);
        }
        if self.quit_requested {
            self.sink.finish()?;
            self.finished = true;
            println!("Session aborted by quit request.");
            events.push(DriverEvent::SessionFinished);
            return Ok(events);
        }
        if self.awaiting_start || !self.phase.runs_trials() {
            return Ok(events);
        }

        let now_ns = self.timer.now_ns();
        let event = match self.trial.as_mut() {
            Some(trial) => trial.tick(now_ns, &self.config),
            None => return Ok(events),
        };
        match event {
            Some(TrialEvent::TargetShown) => {
                println!("Target array shown at {now_ns} ns");
            }
            Some(TrialEvent::TimedOut) => {
                println!("No response within the window");
                self.cue.error_tone();
            }
            Some(TrialEvent::Finished) => {
                self.finish_trial(&mut events)?;
            }
            None => {}
        }
        Ok(events)
    }

    fn finish_trial(&mut self, events: &mut Vec<DriverEvent>) -> Result<()> {
        let trial = self.trial.take().expect("finished trial present");
        let record = trial.to_record(&self.config);
        println!(
            "Block {} trial {} done: {:?}, rt {:.1} ms",
            record.block_num, record.trial_num, record.response_error, record.response_time
        );
        if self.phase.records_data() {
            self.sink.commit(&record)?;
            self.records.push(record);
        } else {
            self.practice_total += 1;
            if record.response_error == Outcome::Correct {
                self.practice_correct += 1;
            }
        }
        events.push(DriverEvent::TrialFinished);

        let block_done = {
            let block = self.block.as_mut().expect("active block");
            block.next += 1;
            block.next >= block.table.len()
        };
        if block_done {
            let num = self.block.as_ref().map(|b| b.num).unwrap_or_default();
            println!("Block {num} complete.");
            self.blocks_done += 1;
            if self.blocks_done < self.phase_blocks() {
                self.prepare_next_block()?;
                events.push(DriverEvent::BlockReady);
            } else {
                self.advance_phase(events)?;
            }
        } else {
            self.start_trial();
        }
        Ok(())
    }

    fn advance_phase(&mut self, events: &mut Vec<DriverEvent>) -> Result<()> {
        let Some(next) = self.phase.next() else {
            self.finished = true;
            events.push(DriverEvent::SessionFinished);
            return Ok(());
        };
        if self.phase.is_practice() {
            println!(
                "Practice complete: {}/{} correct.",
                self.practice_correct, self.practice_total
            );
        }
        self.phase = next;
        self.blocks_done = 0;
        self.block = None;
        self.trial = None;
        events.push(DriverEvent::PhaseAdvanced);

        if next.runs_trials() {
            self.prepare_next_block()?;
            events.push(DriverEvent::BlockReady);
        } else if next == SessionPhase::Debrief {
            self.sink.finish()?;
            let summary = SessionSummary::from_records(&self.records);
            println!("Experiment results:\n{summary}");
            self.awaiting_start = false;
        }
        Ok(())
    }

    /// The draw-command set for the current state, handed to the render
    /// surface each frame.
    pub fn scene(&self) -> Vec<DrawCmd> {
        match self.phase {
            SessionPhase::Welcome => display::welcome_scene(&self.layout),
            SessionPhase::Practice | SessionPhase::Experiment => {
                if self.awaiting_start {
                    match &self.block {
                        Some(block) => display::block_intro_scene(
                            &self.layout,
                            self.phase,
                            block.hand,
                            block.num,
                            self.phase_blocks(),
                        ),
                        None => Vec::new(),
                    }
                } else {
                    match &self.trial {
                        Some(trial) => display::trial_scene(&self.layout, trial),
                        None => Vec::new(),
                    }
                }
            }
            SessionPhase::Debrief => display::debrief_scene(&self.layout),
        }
    }
}
