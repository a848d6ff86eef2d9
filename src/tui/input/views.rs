use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::{stack_ops, stash_ops};
use crate::tui::app::{App, ConfirmAction, Mode, PromptKind, View};

use super::*;

/// Keys that only mean something in the current view
pub(super) fn handle_view_key(app: &mut App, key: KeyEvent) {
    let down = matches!(key.code, KeyCode::Char('j') | KeyCode::Down);
    let up = matches!(key.code, KeyCode::Char('k') | KeyCode::Up);

    match app.view {
        View::Home => {
            if down {
                move_focus(app, 1);
            } else if up {
                move_focus(app, -1);
            }
        }
        View::Tree => {
            let len = app.tree_stacks().len();
            step(&mut app.tree_cursor, len, down, up);
            if key.code == KeyCode::Char('x') {
                archive_cursor(app);
            }
        }
        View::Stash => {
            let len = app.data.stash.len();
            step(&mut app.stash_cursor, len, down, up);
            match key.code {
                KeyCode::Char('r') => restore_cursor(app),
                KeyCode::Char('d') => discard_cursor(app),
                _ => {}
            }
        }
        View::Logs => {
            let len = app.visible_logs().len();
            step(&mut app.log_scroll, len, down, up);
            match key.code {
                KeyCode::Char('/') => {
                    app.search_input = app.log_filter.clone().unwrap_or_default();
                    app.mode = Mode::Search;
                }
                KeyCode::Esc => {
                    app.log_filter = None;
                    app.log_scroll = 0;
                }
                _ => {}
            }
        }
        View::Archive => {
            let len = app.archived_stacks().len();
            step(&mut app.archive_cursor, len, down, up);
            if key.code == KeyCode::Char('u') {
                unarchive_cursor(app);
            }
        }
        View::System => match key.code {
            KeyCode::Char('E') => open_prompt(app, PromptKind::Export),
            KeyCode::Char('I') => open_prompt(app, PromptKind::Import),
            KeyCode::Char('X') => app.confirm(
                "Reset all data? Every stack, stash item and log entry will be deleted.",
                ConfirmAction::Reset,
            ),
            _ => {}
        },
    }
}

fn step(cursor: &mut usize, len: usize, down: bool, up: bool) {
    if down && *cursor + 1 < len {
        *cursor += 1;
    } else if up {
        *cursor = cursor.saturating_sub(1);
    }
}

/// Move the Home focus. The list shows the top of the stack first, so moving down
/// walks toward the bottom of the stack.
fn move_focus(app: &mut App, delta: isize) {
    let next_id = app.active_stack().and_then(|stack| {
        let current = stack.focused_index(app.focus_id())?;
        let next = if delta > 0 {
            current.checked_sub(1)
        } else {
            Some(current + 1).filter(|&i| i < stack.tasks.len())
        };
        next.map(|i| stack.tasks[i].id.clone())
    });
    if let Some(id) = next_id {
        app.focus = Some(id);
    }
}

fn archive_cursor(app: &mut App) {
    let Some(&idx) = app.tree_stacks().get(app.tree_cursor) else {
        return;
    };
    let id = app.data.parent_task.sub_stacks[idx].id.clone();
    let result = stack_ops::archive(&mut app.data, &id);
    if app.apply(result).is_some() {
        app.focus = None;
    }
}

pub(super) fn unarchive_cursor(app: &mut App) {
    let Some(&idx) = app.archived_stacks().get(app.archive_cursor) else {
        return;
    };
    let id = app.data.parent_task.sub_stacks[idx].id.clone();
    let result = stack_ops::unarchive(&mut app.data, &id);
    app.apply(result);
}

/// Restore the stash item under the cursor and return to Home
pub(super) fn restore_cursor(app: &mut App) {
    let Some(id) = app.data.stash.get(app.stash_cursor).map(|i| i.id.clone()) else {
        return;
    };
    let result = stash_ops::restore_stash(&mut app.data, &id);
    if app.apply(result).is_some() {
        app.focus = None;
        app.view = View::Home;
    }
}

fn discard_cursor(app: &mut App) {
    let Some(id) = app.data.stash.get(app.stash_cursor).map(|i| i.id.clone()) else {
        return;
    };
    let result = stash_ops::discard_stash(&mut app.data, &id);
    app.apply(result);
}

#[cfg(test)]
mod tests {
    use super::super::test_keys::*;
    use crate::model::{AppData, Config, SubStackStatus};
    use crate::ops::stack_ops::{add_sub_stack, archive};
    use crate::ops::stash_ops::stash_task;
    use crate::ops::task_ops::push_task;
    use crate::tui::app::{App, ConfirmAction, Mode, Popup, View};
    use crate::tui::input::handle_key;
    use crossterm::event::KeyCode;

    fn app_with(data: AppData) -> App {
        App::new(data, Config::default())
    }

    #[test]
    fn home_focus_walks_down_the_stack() {
        let mut data = AppData::default();
        add_sub_stack(&mut data, "s").unwrap();
        for name in ["bottom", "middle", "top"] {
            push_task(&mut data, name, None).unwrap();
        }
        let mut app = app_with(data);
        assert_eq!(app.focused_task().unwrap().name, "top");
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        assert_eq!(app.focused_task().unwrap().name, "bottom");
        handle_key(&mut app, ch('j'));
        assert_eq!(app.focused_task().unwrap().name, "bottom");
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.focused_task().unwrap().name, "middle");
    }

    #[test]
    fn stash_restore_returns_home() {
        let mut data = AppData::default();
        add_sub_stack(&mut data, "s").unwrap();
        stash_task(&mut data, "later").unwrap();
        let mut app = app_with(data);
        handle_key(&mut app, ch('3'));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.view, View::Home);
        assert!(app.data.stash.is_empty());
        assert_eq!(app.focused_task().unwrap().name, "later");
    }

    #[test]
    fn stash_discard() {
        let mut data = AppData::default();
        stash_task(&mut data, "one").unwrap();
        stash_task(&mut data, "two").unwrap();
        let mut app = app_with(data);
        handle_key(&mut app, ch('3'));
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('d'));
        assert_eq!(app.data.stash.len(), 1);
        assert_eq!(app.data.stash[0].name, "one");
        assert_eq!(app.stash_cursor, 0);
    }

    #[test]
    fn tree_archive_and_archive_restore() {
        let mut data = AppData::default();
        add_sub_stack(&mut data, "a").unwrap();
        add_sub_stack(&mut data, "b").unwrap();
        let mut app = app_with(data);
        handle_key(&mut app, ch('2'));
        handle_key(&mut app, ch('x'));
        assert_eq!(
            app.data.parent_task.sub_stacks[0].status,
            SubStackStatus::Archived
        );
        assert_eq!(app.active_stack().unwrap().name, "b");
        assert_eq!(app.tree_stacks().len(), 1);

        handle_key(&mut app, ch('5'));
        handle_key(&mut app, ch('u'));
        assert_eq!(
            app.data.parent_task.sub_stacks[0].status,
            SubStackStatus::Completed
        );
    }

    #[test]
    fn tree_enter_activates() {
        let mut data = AppData::default();
        add_sub_stack(&mut data, "a").unwrap();
        let b = add_sub_stack(&mut data, "b").unwrap();
        archive(&mut data, &b).unwrap();
        add_sub_stack(&mut data, "c").unwrap();
        let mut app = app_with(data);
        handle_key(&mut app, ch('2'));
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.active_stack().unwrap().name, "c");
    }

    #[test]
    fn system_reset_needs_confirmation() {
        let mut data = AppData::default();
        add_sub_stack(&mut data, "a").unwrap();
        let mut app = app_with(data);
        handle_key(&mut app, ch('6'));
        handle_key(&mut app, ch('X'));
        assert!(matches!(
            app.popup,
            Some(Popup::Confirm {
                action: ConfirmAction::Reset,
                ..
            })
        ));
        handle_key(&mut app, ch('n'));
        assert_eq!(app.mode, Mode::Command);
        assert_eq!(app.data.parent_task.sub_stacks.len(), 1);

        handle_key(&mut app, ch('X'));
        handle_key(&mut app, ch('y'));
        assert!(app.data.parent_task.sub_stacks.is_empty());
        assert_eq!(app.view, View::Home);
    }

    #[test]
    fn system_export_prompt_is_prefilled() {
        let mut app = app_with(AppData::default());
        handle_key(&mut app, ch('6'));
        handle_key(&mut app, ch('E'));
        let prompt = app.prompt.as_ref().unwrap();
        assert_eq!(prompt.label, "EXPORT FILE >");
        assert!(prompt.buffer.starts_with("stacktree-export-"));
    }
}
