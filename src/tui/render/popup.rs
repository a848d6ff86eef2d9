use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::{App, Popup};
use crate::util::unicode::display_width;

use super::centered_rect_fixed;

const POPUP_WIDTH: u16 = 52;

/// Render an alert or confirm dialog over the current view
pub fn render_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(popup) = &app.popup else {
        return;
    };
    let (title, message, hint, accent): (&str, &str, &str, Color) = match popup {
        Popup::Alert(message) => (" ALERT ", message.as_str(), "Enter/Esc dismiss", app.theme.red),
        Popup::Confirm { message, .. } => {
            (" CONFIRM ", message.as_str(), "y confirm  n cancel", app.theme.yellow)
        }
    };
    let bg = app.theme.background;

    // Two border rows, a blank row and the hint row around the wrapped message
    let inner_width = POPUP_WIDTH.saturating_sub(4).max(1) as usize;
    let message_rows = display_width(message).div_ceil(inner_width).max(1);
    let height = message_rows as u16 + 4;
    let rect = centered_rect_fixed(POPUP_WIDTH, height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(accent)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg))),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, rect);
}
