use crossterm::event::{KeyCode, KeyEvent};

use super::{App, Focus};

impl App {
    pub(super) fn on_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::Input;
            }
            KeyCode::Up => {
                self.history_current = self.history_current.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.history_current + 1 < self.widget.history().len() {
                    self.history_current += 1;
                }
            }
            KeyCode::Home => {
                self.history_current = 0;
            }
            KeyCode::End => {
                self.history_current = self.widget.history().len().saturating_sub(1);
            }
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Enter => {
                self.remove_current_history_entry();
            }
            _ => {}
        }
    }

    pub fn remove_current_history_entry(&mut self) {
        let title = self
            .widget
            .history()
            .entries()
            .get(self.history_current)
            .map(|e| e.title.clone());
        if let Some(title) = title {
            self.widget.remove_history_entry(&title);
        }
        if self.widget.history().is_empty() {
            self.focus = Focus::Input;
        }
        self.clamp_history_current();
    }

    pub(super) fn clamp_history_current(&mut self) {
        let len = self.widget.history().len();
        self.history_current = self.history_current.min(len.saturating_sub(1));
    }
}
