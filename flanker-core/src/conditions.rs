use serde::{Deserialize, Serialize};

/// Target identity. Responses are given on the matching keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetLetter {
    H,
    S,
}

impl TargetLetter {
    pub const ALL: [TargetLetter; 2] = [TargetLetter::H, TargetLetter::S];

    pub fn as_char(&self) -> char {
        match self {
            TargetLetter::H => 'H',
            TargetLetter::S => 'S',
        }
    }

    /// The other member of the response set.
    pub fn opposite(&self) -> TargetLetter {
        match self {
            TargetLetter::H => TargetLetter::S,
            TargetLetter::S => TargetLetter::H,
        }
    }
}

/// Relationship between a flanker and the target. Varied per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Congruency {
    Congruent,
    Incongruent,
    Neutral,
}

impl Congruency {
    pub const ALL: [Congruency; 3] = [
        Congruency::Congruent,
        Congruency::Incongruent,
        Congruency::Neutral,
    ];
}

/// Resolve the letter drawn at a flanker position for a given target.
/// Neutral flankers are always 'X', unrelated to either response.
pub fn flanker_letter(congruency: Congruency, target: TargetLetter) -> char {
    match congruency {
        Congruency::Congruent => target.as_char(),
        Congruency::Incongruent => target.opposite().as_char(),
        Congruency::Neutral => 'X',
    }
}

/// Which side of the target the hand-guide line sits on, i.e. where the
/// participant rests the shielding hand for the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandPlacement {
    Left,
    Right,
}

impl HandPlacement {
    pub const ALL: [HandPlacement; 2] = [HandPlacement::Left, HandPlacement::Right];

    pub fn label(&self) -> &'static str {
        match self {
            HandPlacement::Left => "left",
            HandPlacement::Right => "right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn congruent_flanker_repeats_the_target() {
        assert_eq!(flanker_letter(Congruency::Congruent, TargetLetter::H), 'H');
        assert_eq!(flanker_letter(Congruency::Congruent, TargetLetter::S), 'S');
    }

    #[test]
    fn incongruent_flanker_is_the_opposite_response_letter() {
        assert_eq!(
            flanker_letter(Congruency::Incongruent, TargetLetter::H),
            'S'
        );
        assert_eq!(
            flanker_letter(Congruency::Incongruent, TargetLetter::S),
            'H'
        );
    }

    #[test]
    fn neutral_flanker_is_x_for_either_target() {
        for target in TargetLetter::ALL {
            assert_eq!(flanker_letter(Congruency::Neutral, target), 'X');
        }
    }

    #[test]
    fn condition_labels_serialize_lowercase() {
        let json = serde_json::to_value(Congruency::Incongruent).unwrap();
        assert_eq!(json, "incongruent");
        let json = serde_json::to_value(HandPlacement::Left).unwrap();
        assert_eq!(json, "left");
    }
}
