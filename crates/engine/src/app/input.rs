#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Quit,
}

const ACTION_COUNT: usize = 5;

/// Held state plus a press edge per action. The edge is set on the first
/// `Pressed` event after a release and survives until the next tick snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn set_pressed(&mut self, action: InputAction, pressed: bool) {
        self.pressed[action.index()] = pressed;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }

    pub(crate) fn clear_pressed(&mut self) {
        self.pressed = [false; ACTION_COUNT];
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Quit => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_press_sets_edge_and_held_repeat_does_not() {
        let mut states = ActionStates::default();
        states.set(InputAction::MoveUp, true);
        assert!(states.was_pressed(InputAction::MoveUp));

        states.clear_pressed();
        states.set(InputAction::MoveUp, true);
        assert!(states.is_down(InputAction::MoveUp));
        assert!(!states.was_pressed(InputAction::MoveUp));
    }

    #[test]
    fn release_then_press_sets_a_new_edge() {
        let mut states = ActionStates::default();
        states.set(InputAction::MoveLeft, true);
        states.clear_pressed();
        states.set(InputAction::MoveLeft, false);
        assert!(!states.is_down(InputAction::MoveLeft));

        states.set(InputAction::MoveLeft, true);
        assert!(states.was_pressed(InputAction::MoveLeft));
    }
}
