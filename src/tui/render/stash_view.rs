use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::time::format_time;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

use super::{render_empty, scroll_for};

/// Render the Stash view: parked tasks, oldest first
pub fn render_stash_view(frame: &mut Frame, app: &App, area: Rect) {
    if app.data.stash.is_empty() {
        render_empty(frame, app, area, "Stash is empty. Press 's' to park a task.");
        return;
    }

    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;
    let scroll = scroll_for(app.stash_cursor, height);

    let lines: Vec<Line> = app
        .data
        .stash
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, item)| {
            let selected = i == app.stash_cursor;
            let row_bg = if selected { app.theme.selection_bg } else { bg };
            let number = format!(" {:>2} ", i + 1);
            let target = format!(" [{}] ", item.target_label());
            let time = format!(" {} ", format_time(item.timestamp));
            let fixed = display_width(&number) + display_width(&target) + display_width(&time);
            let name_width = width.saturating_sub(fixed);

            let target_color = if item.target_sub_stack_id.is_some() {
                app.theme.cyan
            } else {
                app.theme.dim
            };
            let name_style = if selected {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text).bg(row_bg)
            };

            Line::from(vec![
                Span::styled(number, Style::default().fg(app.theme.dim).bg(row_bg)),
                Span::styled(
                    pad_to_width(&truncate_to_width(&item.name, name_width), name_width),
                    name_style,
                ),
                Span::styled(target, Style::default().fg(target_color).bg(row_bg)),
                Span::styled(time, Style::default().fg(app.theme.dim).bg(row_bg)),
            ])
            .style(Style::default().bg(row_bg))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
