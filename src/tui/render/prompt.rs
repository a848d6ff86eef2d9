use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::App;
use crate::util::unicode::{byte_offset_to_display_col, display_width};

use super::centered_rect_fixed;

const PROMPT_WIDTH: u16 = 64;

/// Render the input modal with its label, buffer and terminal cursor
pub fn render_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };
    let bg = app.theme.background;
    let rect = centered_rect_fixed(PROMPT_WIDTH, 3, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let label = format!(" {} ", prompt.label);
    let label_width = display_width(&label);
    let room = (inner.width as usize).saturating_sub(label_width + 1);

    // Drop leading graphemes until the cursor fits
    let cursor_col = byte_offset_to_display_col(&prompt.buffer, prompt.cursor);
    let mut skip_cols = 0;
    let mut start = 0;
    for (offset, g) in prompt.buffer.grapheme_indices(true) {
        if cursor_col - skip_cols <= room {
            break;
        }
        skip_cols += display_width(g);
        start = offset + g.len();
    }
    let visible = &prompt.buffer[start..];

    let line = Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            visible.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), inner);

    let x = inner.x + (label_width + cursor_col - skip_cols).min(inner.width as usize) as u16;
    frame.set_cursor_position(Position::new(x, inner.y));
}
