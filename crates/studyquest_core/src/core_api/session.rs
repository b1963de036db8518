use super::action::{Action, apply_action};
use super::types::CharacterState;

/// Single-owner handle around the character state.
///
/// Each applied action swaps in the engine's result and bumps `revision`,
/// so a host can tell whether anything needs saving.
#[derive(Debug, Clone)]
pub struct Session {
    state: CharacterState,
    revision: u64,
}

impl Session {
    pub fn new(state: CharacterState) -> Self {
        Self { state, revision: 0 }
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.revision > 0
    }

    pub fn apply(&mut self, action: &Action) -> &CharacterState {
        self.state = apply_action(self.state, action);
        self.revision += 1;
        &self.state
    }

    pub fn apply_all<'a, I>(&mut self, actions: I) -> &CharacterState
    where
        I: IntoIterator<Item = &'a Action>,
    {
        for action in actions {
            self.apply(action);
        }
        &self.state
    }

    pub fn into_state(self) -> CharacterState {
        self.state
    }
}
