use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::{stack_ops, stash_ops, task_ops};
use crate::tui::app::{App, ConfirmAction, Mode, Prompt, PromptKind};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary, word_boundary_left};

use super::*;

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        app.mode = Mode::Command;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.prompt = None;
            app.mode = Mode::Command;
        }
        KeyCode::Enter => {
            if prompt.buffer.trim().is_empty() {
                return;
            }
            if let Some(prompt) = app.prompt.take() {
                app.mode = Mode::Command;
                submit(app, prompt.kind, prompt.buffer.trim());
            }
        }
        _ => edit_line(prompt, key),
    }
}

/// Single-line editing. Cursor motion is by grapheme.
fn edit_line(prompt: &mut Prompt, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let buf = &mut prompt.buffer;
    match key.code {
        KeyCode::Char('a') if ctrl => prompt.cursor = 0,
        KeyCode::Char('e') if ctrl => prompt.cursor = buf.len(),
        KeyCode::Char('u') if ctrl => {
            buf.drain(..prompt.cursor);
            prompt.cursor = 0;
        }
        KeyCode::Char('w') if ctrl => {
            let start = word_boundary_left(buf, prompt.cursor);
            buf.drain(start..prompt.cursor);
            prompt.cursor = start;
        }
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => {
            buf.insert(prompt.cursor, c);
            prompt.cursor += c.len_utf8();
        }
        KeyCode::Backspace => {
            if let Some(prev) = prev_grapheme_boundary(buf, prompt.cursor) {
                buf.drain(prev..prompt.cursor);
                prompt.cursor = prev;
            }
        }
        KeyCode::Delete => {
            if let Some(next) = next_grapheme_boundary(buf, prompt.cursor) {
                buf.drain(prompt.cursor..next);
            }
        }
        KeyCode::Left => {
            if let Some(prev) = prev_grapheme_boundary(buf, prompt.cursor) {
                prompt.cursor = prev;
            }
        }
        KeyCode::Right => {
            if let Some(next) = next_grapheme_boundary(buf, prompt.cursor) {
                prompt.cursor = next;
            }
        }
        KeyCode::Home => prompt.cursor = 0,
        KeyCode::End => prompt.cursor = buf.len(),
        _ => {}
    }
}

fn submit(app: &mut App, kind: PromptKind, value: &str) {
    let focus = app.focus_id().map(str::to_string);
    match kind {
        PromptKind::NewStack => {
            let result = stack_ops::add_sub_stack(&mut app.data, value);
            app.apply(result);
        }
        PromptKind::Interrupt => {
            let result = task_ops::push_task(&mut app.data, value, focus.as_deref());
            if let Some(id) = app.apply(result) {
                app.focus = Some(id);
            }
        }
        PromptKind::Queue => {
            let result = task_ops::queue_task(&mut app.data, value, focus.as_deref());
            app.apply(result);
        }
        PromptKind::Breakdown => {
            let result = task_ops::breakdown_task(&mut app.data, value, focus.as_deref());
            if let Some(id) = app.apply(result) {
                app.focus = Some(id);
            }
        }
        PromptKind::Stash => {
            let result = stash_ops::stash_task(&mut app.data, value);
            if app.apply(result).is_some() {
                app.status_message = Some(format!("Stashed \"{}\"", value));
            }
        }
        PromptKind::Rename => {
            let result = stack_ops::rename_project(&mut app.data, value);
            app.apply(result);
        }
        PromptKind::Import => {
            let path = PathBuf::from(value);
            app.confirm(
                format!(
                    "Replace all current data with the contents of {}?",
                    path.display()
                ),
                ConfirmAction::Import(path),
            );
        }
        PromptKind::Export => app.export_to(&PathBuf::from(value)),
    }
}
