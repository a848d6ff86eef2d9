use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Mode, Popup};

pub(super) fn handle_popup(app: &mut App, key: KeyEvent) {
    let Some(popup) = app.popup.take() else {
        app.mode = Mode::Command;
        return;
    };

    match popup {
        Popup::Alert(_) => {
            if !matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.popup = Some(popup);
                return;
            }
            app.mode = Mode::Command;
        }
        Popup::Confirm { action, message } => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.mode = Mode::Command;
                match action {
                    ConfirmAction::Import(path) => app.import_from(&path),
                    ConfirmAction::Reset => app.reset_all(),
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => app.mode = Mode::Command,
            _ => app.popup = Some(Popup::Confirm { action, message }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_keys::*;
    use crate::model::{AppData, Config};
    use crate::tui::app::{App, Mode};
    use crate::tui::input::handle_key;
    use crossterm::event::KeyCode;

    #[test]
    fn alert_needs_explicit_dismiss() {
        let mut app = App::new(AppData::default(), Config::default());
        app.alert("boom");
        handle_key(&mut app, ch('n'));
        assert_eq!(app.mode, Mode::Popup);
        assert!(app.popup.is_some());
        assert!(app.prompt.is_none());
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Command);
        assert!(app.popup.is_none());
    }

    #[test]
    fn confirmed_import_of_missing_file_alerts() {
        let mut app = App::new(AppData::default(), Config::default());
        app.confirm(
            "import?",
            crate::tui::app::ConfirmAction::Import("/nonexistent/stacktree.json".into()),
        );
        handle_key(&mut app, ch('x'));
        assert!(app.popup.is_some());
        handle_key(&mut app, ch('y'));
        assert_eq!(app.mode, Mode::Popup);
        assert!(matches!(
            app.popup,
            Some(crate::tui::app::Popup::Alert(ref m)) if m.starts_with("Failed to import data")
        ));
    }
}
