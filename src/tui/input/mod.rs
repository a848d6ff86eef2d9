mod command;
mod popup;
mod prompt;
mod search;
mod views;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

// Submodules reach each other's handlers through `use super::*;`
#[allow(unused_imports)]
use command::*;
#[allow(unused_imports)]
use popup::*;
#[allow(unused_imports)]
use prompt::*;
#[allow(unused_imports)]
use search::*;
#[allow(unused_imports)]
use views::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl-C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Command => handle_command(app, key),
        Mode::Off => handle_off(app, key),
        Mode::Input => handle_prompt(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Popup => handle_popup(app, key),
    }
}

/// Kitty-protocol terminals report `Char('r') + SHIFT` for `R`; map it to `Char('R')`.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Feed a string as individual key presses
    pub fn type_str(app: &mut crate::tui::app::App, s: &str) {
        for c in s.chars() {
            super::handle_key(app, ch(c));
        }
    }
}
