/// Stimulus color constants.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const GUIDE_GRAY: [u8; 4] = [90, 90, 96, 255];

/// Which part of the display a primitive belongs to. The feedback and
/// inter-trial redraws must never contain `Target` primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Fixation,
    Guide,
    Target,
    Ui,
}

/// One draw command for the render surface. Positions are center
/// registration anchors in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FixationCross {
        at: (f32, f32),
        size: f32,
        thickness: f32,
    },
    GuideLine {
        at: (f32, f32),
        length: f32,
        thickness: f32,
        color: [u8; 4],
    },
    StimulusLetter {
        ch: char,
        at: (f32, f32),
        height: f32,
    },
    Banner {
        text: String,
        at: (f32, f32),
        height: f32,
    },
}

impl DrawCmd {
    pub fn layer(&self) -> Layer {
        match self {
            DrawCmd::FixationCross { .. } => Layer::Fixation,
            DrawCmd::GuideLine { .. } => Layer::Guide,
            DrawCmd::StimulusLetter { .. } => Layer::Target,
            DrawCmd::Banner { .. } => Layer::Ui,
        }
    }
}
