//! Single-line title input for the add-task box.
//!
//! Typing stops at [`MAX_TITLE_CHARS`]; the store still validates whatever is
//! submitted, so blank input reaches it and gets the usual error.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklist_core::MAX_TITLE_CHARS;

/// Show the remaining-characters hint once the input is longer than this.
const HINT_THRESHOLD: usize = 80;

/// What the input wants the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Try to add a task with this raw title.
    Submit(String),
    /// Close the input without adding anything.
    Cancel,
}

#[derive(Debug, Default)]
pub struct TaskInput {
    text: String,
}

impl TaskInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// "N characters remaining" once the input gets close to the limit.
    pub fn remaining_hint(&self) -> Option<String> {
        let count = self.char_count();
        (count > HINT_THRESHOLD)
            .then(|| format!("{} characters remaining", MAX_TITLE_CHARS.saturating_sub(count)))
    }

    /// Feed a key event. `None` while the user is still editing.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<InputAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(InputAction::Cancel),
            KeyCode::Enter => Some(InputAction::Submit(self.text.clone())),
            KeyCode::Backspace => {
                self.text.pop();
                None
            }
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                if self.char_count() < MAX_TITLE_CHARS {
                    self.text.push(c);
                }
                None
            }
            _ => None,
        }
    }
}
