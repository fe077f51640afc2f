use super::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Completed,
    Active,
    Pending,
}

/// Cursor over the fixed stage sequence. The index is always in range.
#[derive(Debug, Clone, Default)]
pub struct PhaseNavigator {
    current_index: usize,
}

impl PhaseNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_count(&self) -> usize {
        Stage::ALL.len()
    }

    pub fn current(&self) -> Stage {
        Stage::ALL[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.stage_count()
    }

    /// Returns true when the cursor moved.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_index += 1;
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_index -= 1;
        true
    }

    pub fn jump_to(&mut self, stage: Stage) {
        self.current_index = stage.position();
    }

    /// 1-based position and total, for "3 / 11" style display.
    pub fn progress_label(&self) -> (usize, usize) {
        (self.current_index + 1, self.stage_count())
    }

    pub fn completion_state(&self, stage: Stage) -> CompletionState {
        let position = stage.position();
        if position < self.current_index {
            CompletionState::Completed
        } else if position == self.current_index {
            CompletionState::Active
        } else {
            CompletionState::Pending
        }
    }
}
