use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::OpError;
use crate::ops::stack_ops::{self, Direction};
use crate::ops::task_ops;
use crate::tui::app::{App, Mode, Prompt, PromptKind, View};

use super::*;

/// Name shown in prompt brackets when there is nothing to name
const FALLBACK_NAME: &str = "ROOT";

pub(super) fn handle_off(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 'o') {
        app.mode = Mode::Command;
    }
}

pub(super) fn handle_command(app: &mut App, key: KeyEvent) {
    app.status_message = None;

    // Help overlay swallows everything but its own close keys
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    if is_ctrl(&key, 'o') {
        app.mode = Mode::Off;
        return;
    }

    match key.code {
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(view) = View::from_digit(c) {
                app.view = view;
            }
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('n') => open_prompt(app, PromptKind::NewStack),
        KeyCode::Char('i') => open_prompt(app, PromptKind::Interrupt),
        KeyCode::Char('a') => open_prompt(app, PromptKind::Queue),
        KeyCode::Char('b') => open_prompt(app, PromptKind::Breakdown),
        KeyCode::Char('s') => open_prompt(app, PromptKind::Stash),
        KeyCode::Char('R') => open_prompt(app, PromptKind::Rename),
        KeyCode::Char('f') => toggle_freeze(app),
        KeyCode::Char('[') => cycle(app, Direction::Prev),
        KeyCode::Char(']') => cycle(app, Direction::Next),
        KeyCode::Enter => match app.view {
            View::Home => complete_focused(app),
            View::Tree => activate_cursor(app),
            View::Stash => restore_cursor(app),
            View::Archive => unarchive_cursor(app),
            View::Logs | View::System => {}
        },
        _ => handle_view_key(app, key),
    }
}

/// Open the input modal for `kind`
pub(super) fn open_prompt(app: &mut App, kind: PromptKind) {
    let stack_name = app
        .active_stack()
        .map_or(FALLBACK_NAME, |s| s.name.as_str())
        .to_string();
    let (label, initial) = match kind {
        PromptKind::NewStack => ("NEW STACK >".to_string(), String::new()),
        PromptKind::Interrupt => (format!("INTERRUPT [{}] >", stack_name), String::new()),
        PromptKind::Queue => (format!("QUEUE NEXT [{}] >", stack_name), String::new()),
        PromptKind::Stash => ("STASH TASK >".to_string(), String::new()),
        PromptKind::Breakdown => {
            let task_name = app
                .focused_task()
                .map_or(FALLBACK_NAME, |t| t.name.as_str());
            (format!("BREAKDOWN [{}] >", task_name), String::new())
        }
        PromptKind::Rename => (
            "RENAME PROJECT >".to_string(),
            app.data.parent_task.name.clone(),
        ),
        PromptKind::Import => ("IMPORT FILE >".to_string(), String::new()),
        PromptKind::Export => (
            "EXPORT FILE >".to_string(),
            crate::util::time::export_file_name(),
        ),
    };
    app.prompt = Some(Prompt::new(kind, label, initial));
    app.mode = Mode::Input;
}

/// Freeze or thaw the stack under the Tree cursor, or the active stack elsewhere
fn toggle_freeze(app: &mut App) {
    let target = if app.view == View::Tree {
        app.tree_stacks()
            .get(app.tree_cursor)
            .map(|&i| app.data.parent_task.sub_stacks[i].id.clone())
    } else {
        app.active_stack().map(|s| s.id.clone())
    };
    let result = match target {
        Some(id) => stack_ops::toggle_freeze(&mut app.data, &id),
        None if app.data.parent_task.sub_stacks.is_empty() => Err(OpError::NoSubStacks),
        None => Err(OpError::NoActiveStack),
    };
    if app.apply(result).is_some() {
        app.focus = None;
    }
}

fn cycle(app: &mut App, direction: Direction) {
    if stack_ops::cycle(&mut app.data, direction).is_some() {
        app.focus = None;
        app.mark_changed();
    }
}

fn complete_focused(app: &mut App) {
    let focus = app.focus_id().map(str::to_string);
    let result = task_ops::complete_task(&mut app.data, focus.as_deref());
    if let Some(outcome) = app.apply(result) {
        app.focus = None;
        app.status_message = Some(match outcome.activated {
            Some(next) => format!("Stack completed. Now on \"{}\"", next),
            None if outcome.stack_completed => "Stack completed".to_string(),
            None => format!("Completed \"{}\"", outcome.task_name),
        });
    }
}

fn activate_cursor(app: &mut App) {
    let Some(&idx) = app.tree_stacks().get(app.tree_cursor) else {
        return;
    };
    let id = app.data.parent_task.sub_stacks[idx].id.clone();
    let result = stack_ops::activate(&mut app.data, &id);
    if app.apply(result).is_some() {
        app.focus = None;
    }
}
