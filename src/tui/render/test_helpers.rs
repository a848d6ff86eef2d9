use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{AppData, Config};
use crate::ops::stack_ops::add_sub_stack;
use crate::ops::task_ops::{breakdown_task, push_task};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn empty_app() -> App {
    App::new(AppData::default(), Config::default())
}

/// Project "Launch" with stacks `backend` (active) and `docs`. `backend` holds
/// `deploy` at the bottom, then `write handler` broken down into `add route`.
pub fn sample_app() -> App {
    let mut data = AppData::default();
    data.parent_task.name = "Launch".into();
    add_sub_stack(&mut data, "backend").unwrap();
    add_sub_stack(&mut data, "docs").unwrap();
    push_task(&mut data, "deploy", None).unwrap();
    push_task(&mut data, "write handler", None).unwrap();
    breakdown_task(&mut data, "add route", None).unwrap();
    App::new(data, Config::default())
}
