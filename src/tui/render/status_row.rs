use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, View};
use crate::util::unicode::{display_width, truncate_to_width};

fn mode_badge(app: &App) -> (&'static str, Color) {
    match app.mode {
        Mode::Command | Mode::Popup => ("NORMAL", app.theme.green),
        Mode::Off => ("OFF", app.theme.dim),
        Mode::Input => ("-- INSERT --", app.theme.yellow),
        Mode::Search => ("SEARCH", app.theme.cyan),
    }
}

fn key_hints(app: &App) -> &'static str {
    match app.mode {
        Mode::Input => "Enter submit  Esc cancel",
        Mode::Search => "Enter apply  Esc cancel",
        Mode::Off => "Keys disabled  Ctrl-O enable",
        Mode::Popup => "",
        Mode::Command => match app.view {
            View::Home => "n new  i insert  a queue  b break  \u{21B5} done  ? help",
            View::Tree => "jk move  \u{21B5} activate  f freeze  x archive",
            View::Stash => "jk move  \u{21B5}/r restore  d discard",
            View::Logs => "jk scroll  / filter  Esc clear",
            View::Archive => "jk move  \u{21B5}/u restore",
            View::System => "E export  I import  X reset",
        },
    }
}

/// Render the status row (bottom of screen): mode badge, then a message or key hints
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (badge, badge_color) = mode_badge(app);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", badge),
            Style::default()
                .fg(bg)
                .bg(badge_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", Style::default().bg(bg)),
    ];
    let used = display_width(badge) + 3;

    if app.mode == Mode::Search {
        spans.push(Span::styled(
            format!("/{}", app.search_input),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    } else if let Some(message) = &app.status_message {
        spans.push(Span::styled(
            truncate_to_width(message, width.saturating_sub(used)),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    } else if let Some(filter) = app.log_filter.as_deref().filter(|_| app.view == View::Logs) {
        spans.push(Span::styled(
            format!("/{}", filter),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    // Key hints right-aligned when they fit
    let hint = key_hints(app);
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if app.config.ui.show_key_hints && !hint.is_empty() && content_width + hint_width + 1 < width {
        let padding = width - content_width - hint_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
