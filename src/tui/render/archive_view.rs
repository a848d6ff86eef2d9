use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::{render_empty, scroll_for};

/// Render the Archive view: archived stacks with their task counts
pub fn render_archive_view(frame: &mut Frame, app: &App, area: Rect) {
    let archived = app.archived_stacks();
    if archived.is_empty() {
        render_empty(frame, app, area, "No archived stacks.");
        return;
    }

    let bg = app.theme.background;
    let height = area.height as usize;
    let scroll = scroll_for(app.archive_cursor, height);
    let name_width = (area.width as usize).saturating_sub(20);

    let lines: Vec<Line> = archived
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(pos, &idx)| {
            let stack = &app.data.parent_task.sub_stacks[idx];
            let selected = pos == app.archive_cursor;
            let row_bg = if selected { app.theme.selection_bg } else { bg };
            let marker = if selected { "\u{25B6}" } else { " " };
            let name_style = if selected {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.dim).bg(row_bg)
            };
            Line::from(vec![
                Span::styled(
                    format!("{}{:>2} ", marker, pos + 1),
                    Style::default().fg(app.theme.dim).bg(row_bg),
                ),
                Span::styled(truncate_to_width(&stack.name, name_width), name_style),
                Span::styled(
                    format!(" ({} tasks)", stack.tasks.len()),
                    Style::default().fg(app.theme.purple).bg(row_bg),
                ),
            ])
            .style(Style::default().bg(row_bg))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
