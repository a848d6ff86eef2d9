use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::config_io::config_path;
use crate::io::logging::log_path;
use crate::tui::app::App;
use crate::util::time::format_datetime;

const LABEL_WIDTH: usize = 16;

/// Render the System view: storage locations, save state and data actions
pub fn render_system_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let row = |label: &str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("   {:<width$}", label, width = LABEL_WIDTH), label_style),
            Span::styled(value, style),
        ])
    };

    let data_file = app
        .state_path()
        .map_or_else(|| "(not persisted)".to_string(), |p| p.display().to_string());
    let log_file = app
        .store
        .as_ref()
        .map_or_else(|| "-".to_string(), |s| log_path(s.dir()).display().to_string());
    let last_save = app
        .last_saved_at
        .map_or_else(|| "never".to_string(), format_datetime);
    let (unsaved, unsaved_style) = if app.dirty {
        ("yes", Style::default().fg(app.theme.yellow).bg(bg))
    } else {
        ("no", value_style)
    };

    let stacks = &app.data.parent_task.sub_stacks;
    let task_count: usize = stacks.iter().map(|s| s.tasks.len()).sum();

    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let action = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("   [{}] ", key), key_style),
            Span::styled(desc, value_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(" Storage", header_style)),
        row("Data file", data_file, value_style),
        row("Log file", log_file, value_style),
        row("Config file", config_path().display().to_string(), value_style),
        row("Last saved", last_save, value_style),
        row("Unsaved changes", unsaved.to_string(), unsaved_style),
        Line::from(""),
        Line::from(Span::styled(" Contents", header_style)),
        row("Stacks", stacks.len().to_string(), value_style),
        row("Tasks", task_count.to_string(), value_style),
        row("Stashed", app.data.stash.len().to_string(), value_style),
        row("Log entries", app.data.logs.len().to_string(), value_style),
        Line::from(""),
        Line::from(Span::styled(" Data", header_style)),
        action("E", "Export to file"),
        action("I", "Import from file"),
        action("X", "Reset all data"),
    ];

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
