use crate::trial::TrialContext;
use flanker_core::scene::{DrawCmd, GUIDE_GRAY};
use flanker_core::{HandPlacement, Layout, SessionPhase, TrialState};

const BANNER_PX: f32 = 32.0;
const LINE_GAP: f32 = 56.0;

fn guide(layout: &Layout, hand: HandPlacement) -> DrawCmd {
    DrawCmd::GuideLine {
        at: layout.guide_pos(hand),
        length: layout.guide_length,
        thickness: layout.stroke,
        color: GUIDE_GRAY,
    }
}

fn banner(layout: &Layout, line: usize, text: &str) -> DrawCmd {
    let (cx, cy) = layout.center;
    DrawCmd::Banner {
        text: text.to_string(),
        at: (cx, cy - 2.0 * LINE_GAP + line as f32 * LINE_GAP),
        height: BANNER_PX,
    }
}

pub fn welcome_scene(layout: &Layout) -> Vec<DrawCmd> {
    vec![
        banner(layout, 0, "A letter will appear between two others."),
        banner(layout, 1, "Press H when the centre letter is H, S when it is S."),
        banner(layout, 2, "Respond as quickly and accurately as you can."),
        banner(layout, 4, "Press SPACE to begin practice."),
    ]
}

pub fn block_intro_scene(
    layout: &Layout,
    phase: SessionPhase,
    hand: HandPlacement,
    block_num: usize,
    total_blocks: usize,
) -> Vec<DrawCmd> {
    let heading = if phase.is_practice() {
        format!("Practice block {block_num} of {total_blocks}")
    } else {
        format!("Block {block_num} of {total_blocks}")
    };
    vec![
        guide(layout, hand),
        banner(layout, 0, &heading),
        banner(
            layout,
            1,
            &format!("Rest your {} hand along the grey line.", hand.label()),
        ),
        banner(layout, 4, "Press SPACE to start."),
    ]
}

/// The in-trial display for the current controller state. Feedback and the
/// inter-trial interval blank the target and redraw only the hand guide.
pub fn trial_scene(layout: &Layout, trial: &TrialContext) -> Vec<DrawCmd> {
    let hand = trial.hand();
    match trial.state() {
        TrialState::Fixation | TrialState::AwaitingOnset => vec![
            DrawCmd::FixationCross {
                at: layout.center,
                size: layout.fixation_size,
                thickness: layout.stroke,
            },
            guide(layout, hand),
        ],
        TrialState::Collecting => {
            let factors = trial.factors();
            vec![
                DrawCmd::StimulusLetter {
                    ch: factors.left_letter(),
                    at: layout.left_flank,
                    height: layout.stim_height,
                },
                DrawCmd::StimulusLetter {
                    ch: factors.target.as_char(),
                    at: layout.center,
                    height: layout.stim_height,
                },
                DrawCmd::StimulusLetter {
                    ch: factors.right_letter(),
                    at: layout.right_flank,
                    height: layout.stim_height,
                },
                guide(layout, hand),
            ]
        }
        TrialState::Feedback | TrialState::InterTrial | TrialState::Complete => {
            vec![guide(layout, hand)]
        }
    }
}

pub fn debrief_scene(layout: &Layout) -> Vec<DrawCmd> {
    vec![
        banner(layout, 0, "Task complete."),
        banner(layout, 1, "Thank you for taking part."),
        banner(layout, 4, "Press ESC to exit."),
    ]
}
