use crate::conditions::HandPlacement;

const FLANK_OFFSET_DEG: f32 = 4.0;
const STIM_LENGTH_DEG: f32 = 1.0;
const STIM_GIRTH_DEG: f32 = 0.2;
const GUIDE_LENGTH_SCALE: f32 = 3.0;

/// Screen positions and sizes for the stimulus array, in pixels.
///
/// Locations are registration points relative to screen centre: flankers sit
/// 4 deg left and right of the target, and each hand guide sits midway
/// between the target and its flanker.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub center: (f32, f32),
    pub left_flank: (f32, f32),
    pub right_flank: (f32, f32),
    pub left_guide: (f32, f32),
    pub right_guide: (f32, f32),

    pub stim_height: f32,
    pub stroke: f32,
    pub guide_length: f32,
    pub fixation_size: f32,
}

impl Layout {
    pub fn new(width: u32, height: u32, px_per_degree: f32) -> Self {
        let center = (width as f32 / 2.0, height as f32 / 2.0);
        let offset = FLANK_OFFSET_DEG * px_per_degree;
        let stim_height = STIM_LENGTH_DEG * px_per_degree;

        Self {
            center,
            left_flank: (center.0 - offset, center.1),
            right_flank: (center.0 + offset, center.1),
            left_guide: (center.0 - offset / 2.0, center.1),
            right_guide: (center.0 + offset / 2.0, center.1),
            stim_height,
            stroke: STIM_GIRTH_DEG * px_per_degree,
            guide_length: stim_height * GUIDE_LENGTH_SCALE,
            fixation_size: stim_height,
        }
    }

    pub fn guide_pos(&self, hand: HandPlacement) -> (f32, f32) {
        match hand {
            HandPlacement::Left => self.left_guide,
            HandPlacement::Right => self.right_guide,
        }
    }
}
