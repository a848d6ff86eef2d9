use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the tab bar: project name, view tabs, and a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "\u{25B6}",
        Style::default().fg(app.theme.green).bg(bg),
    ));
    spans.push(Span::styled(" ", bg_style));
    sep_cols.push(spans_width(&spans));
    spans.push(sep.clone());

    for (i, view) in View::ALL.iter().enumerate() {
        let style = tab_style(app, app.view == *view);
        spans.push(Span::styled(format!(" [{}] {} ", i + 1, view.label()), style));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| display_width(&s.content)).sum()
}

/// Separator line with the project name at its right end
fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let name = truncate_to_width(&app.data.parent_task.name, width.saturating_sub(6) / 2);
    let label = format!(" {} ", name);
    // one trailing rule cell after the label
    let rule_end = width.saturating_sub(display_width(&label) + 1);

    let rule: String = (0..rule_end)
        .map(|col| {
            if sep_cols.contains(&col) {
                '\u{2534}'
            } else {
                '\u{2500}'
            }
        })
        .collect();
    let mut spans = vec![Span::styled(rule, dim_style)];
    if rule_end > 0 {
        spans.push(Span::styled(
            label,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("\u{2500}", dim_style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(dim_style), area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn tabs_show_project_and_views() {
        let app = sample_app();
        let output = render_to_string(TERM_W, 2, |frame, area| render_tab_bar(frame, &app, area));
        let mut lines = output.lines();
        let tabs = lines.next().unwrap();
        for label in ["[1] Home", "[2] Tree", "[3] Stash", "[4] Logs", "[5] Archive", "[6] System"] {
            assert!(tabs.contains(label), "{label}");
        }
        let sep = lines.next().unwrap();
        assert!(sep.contains('\u{2534}'));
        assert!(sep.ends_with(" Launch \u{2500}"));
    }
}
