use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    let view_bindings: &[(&str, &str)] = match app.view {
        View::Home => &[(" jk", "Move focus down/up the stack")],
        View::Tree => &[
            (" jk", "Move cursor"),
            (" Enter", "Activate stack"),
            (" x", "Archive stack"),
        ],
        View::Stash => &[
            (" jk", "Move cursor"),
            (" Enter/r", "Restore to a stack"),
            (" d", "Discard"),
        ],
        View::Logs => &[
            (" jk", "Scroll"),
            (" /", "Filter by pattern"),
            (" Esc", "Clear filter"),
        ],
        View::Archive => &[(" jk", "Move cursor"), (" Enter/u", "Unarchive")],
        View::System => &[
            (" E", "Export to file"),
            (" I", "Import from file"),
            (" X", "Reset all data"),
        ],
    };
    lines.push(Line::from(Span::styled(
        format!(" {}", app.view.label()),
        header_style,
    )));
    for (key, desc) in view_bindings {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " n / R", "New stack / rename project", key_style, desc_style);
    add_binding(&mut lines, " i / a", "Interrupt / queue next", key_style, desc_style);
    add_binding(&mut lines, " b", "Break down focused task", key_style, desc_style);
    add_binding(&mut lines, " s", "Stash a task", key_style, desc_style);
    add_binding(&mut lines, " f", "Freeze / thaw stack", key_style, desc_style);
    add_binding(&mut lines, " Enter", "Complete focused task", key_style, desc_style);
    add_binding(&mut lines, " [ ]", "Cycle stacks", key_style, desc_style);
    add_binding(&mut lines, " 1-6", "Switch view", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+O", "Shortcuts on/off", key_style, desc_style);
    add_binding(&mut lines, " ? / q", "Toggle help / quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 12;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
