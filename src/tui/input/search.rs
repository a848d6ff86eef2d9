use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

/// Typing a log filter. The pattern highlights live; Enter applies it, Esc abandons it.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.mode = Mode::Command;
        }
        KeyCode::Enter => {
            let pattern = std::mem::take(&mut app.search_input);
            app.log_filter = if pattern.is_empty() {
                None
            } else {
                Some(pattern)
            };
            app.log_scroll = 0;
            app.mode = Mode::Command;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
}
