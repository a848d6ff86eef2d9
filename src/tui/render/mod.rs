pub mod archive_view;
pub mod help_overlay;
pub mod home_view;
pub mod log_view;
pub mod popup;
pub mod prompt;
pub mod stash_view;
pub mod status_row;
pub mod system_view;
pub mod tab_bar;
pub mod tree_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;

use super::app::{App, View};

/// Main render function, dispatching to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.view {
        View::Home => home_view::render_home_view(frame, app, chunks[1]),
        View::Tree => tree_view::render_tree_view(frame, app, chunks[1]),
        View::Stash => stash_view::render_stash_view(frame, app, chunks[1]),
        View::Logs => log_view::render_log_view(frame, app, chunks[1]),
        View::Archive => archive_view::render_archive_view(frame, app, chunks[1]),
        View::System => system_view::render_system_view(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);

    // Overlays, drawn over everything
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
    if app.prompt.is_some() {
        prompt::render_prompt(frame, app, area);
    }
    if app.popup.is_some() {
        popup::render_popup(frame, app, area);
    }
}

/// A dimmed one-line message for empty views
pub(super) fn render_empty(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let empty = Paragraph::new(format!(" {}", message))
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(empty, area);
}

/// First row to draw so that `cursor` stays inside a window of `height` rows
pub(super) fn scroll_for(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    cursor.saturating_sub(height - 1)
}

/// Center a fixed-size rectangle inside `area`
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use crate::ops::log_ops::compile_pattern;

    #[test]
    fn highlight_splits_on_matches() {
        let re = compile_pattern("stack").unwrap();
        let mut spans = Vec::new();
        push_highlighted_spans(
            &mut spans,
            "Froze Stack: stacks",
            Style::default(),
            Style::default(),
            Some(&re),
        );
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Froze ", "Stack", ": ", "stack", "s"]);
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_for(3, 10), 0);
        assert_eq!(scroll_for(12, 10), 3);
        assert_eq!(scroll_for(5, 0), 0);
    }

    #[test]
    fn full_frame_has_tabs_and_status() {
        let app = empty_app();
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(output.contains("[1] Home"));
        assert!(output.contains("[6] System"));
        assert!(output.contains("NORMAL"));
        assert!(output.contains("STACK EMPTY"));
    }

    #[test]
    fn overlays_draw_on_top() {
        let mut app = empty_app();
        app.alert("Please create a sub-stack first (press 'n')");
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(output.contains("ALERT"));
        assert!(output.contains("Please create a sub-stack first"));
    }
}
