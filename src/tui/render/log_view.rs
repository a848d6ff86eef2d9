use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::time::format_time;

use super::{push_highlighted_spans, render_empty};

/// Render the Logs view: newest first, filtered and highlighted by the active pattern
pub fn render_log_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let entries = app.visible_logs();

    if entries.is_empty() {
        let message = match app.active_log_pattern() {
            Some(p) => format!("No log entries match /{}/", p),
            None => "No activity yet.".to_string(),
        };
        render_empty(frame, app, area, &message);
        return;
    }

    let re = app.active_log_re();
    let highlight = Style::default()
        .fg(app.theme.background)
        .bg(app.theme.yellow)
        .add_modifier(Modifier::BOLD);
    let height = area.height as usize;

    let lines: Vec<Line> = entries
        .iter()
        .skip(app.log_scroll)
        .take(height)
        .map(|entry| {
            let mut spans = vec![
                Span::styled(
                    format!(" [{}] ", format_time(entry.timestamp)),
                    Style::default().fg(app.theme.dim).bg(bg),
                ),
                Span::styled(
                    format!("[{}] ", entry.kind),
                    Style::default()
                        .fg(app.theme.log_kind_color(entry.kind))
                        .bg(bg),
                ),
            ];
            push_highlighted_spans(
                &mut spans,
                &entry.message,
                Style::default().fg(app.theme.text).bg(bg),
                highlight,
                re.as_ref(),
            );
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Mode;
    use crate::tui::render::test_helpers::*;

    fn logs(app: &App) -> String {
        render_to_string(TERM_W, 10, |frame, area| render_log_view(frame, app, area))
    }

    #[test]
    fn newest_entry_first() {
        let app = sample_app();
        let out = logs(&app);
        let first = out.lines().next().unwrap();
        assert!(first.contains("[add] "));
        assert!(first.contains("add route"));
        assert!(out.lines().last().unwrap().contains("Added sub-stack: backend"));
    }

    #[test]
    fn filter_narrows_entries() {
        let mut app = sample_app();
        app.log_filter = Some("deploy".into());
        let out = logs(&app);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("deploy"));

        app.log_filter = Some("nothing-here".into());
        assert!(logs(&app).contains("No log entries match /nothing-here/"));
    }

    #[test]
    fn typed_pattern_previews_while_searching() {
        let mut app = sample_app();
        app.mode = Mode::Search;
        app.search_input = "docs".into();
        let out = logs(&app);
        assert!(out.lines().all(|l| l.to_lowercase().contains("docs")));
    }

    #[test]
    fn empty_log() {
        assert!(logs(&empty_app()).contains("No activity yet."));
    }
}
