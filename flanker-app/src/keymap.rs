use flanker_core::TargetLetter;
use flanker_experiment::KeyInput;
use winit::keyboard::KeyCode;

/// Key-to-response-label mapping for the input listener.
pub struct KeyMap {
    bindings: Vec<(KeyCode, KeyInput)>,
}

impl KeyMap {
    pub fn standard() -> Self {
        Self {
            bindings: vec![
                (KeyCode::Space, KeyInput::Advance),
                (KeyCode::KeyH, KeyInput::Respond(TargetLetter::H)),
                (KeyCode::KeyS, KeyInput::Respond(TargetLetter::S)),
                (KeyCode::Escape, KeyInput::Quit),
            ],
        }
    }

    pub fn map(&self, key: KeyCode) -> Option<KeyInput> {
        self.bindings
            .iter()
            .find(|(code, _)| *code == key)
            .map(|(_, input)| *input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_map_covers_both_response_letters() {
        let map = KeyMap::standard();
        assert_eq!(
            map.map(KeyCode::KeyH),
            Some(KeyInput::Respond(TargetLetter::H))
        );
        assert_eq!(
            map.map(KeyCode::KeyS),
            Some(KeyInput::Respond(TargetLetter::S))
        );
        assert_eq!(map.map(KeyCode::Escape), Some(KeyInput::Quit));
        assert_eq!(map.map(KeyCode::KeyQ), None);
    }
}
