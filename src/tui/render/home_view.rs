use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::progress::render_progress_bar;
use crate::util::unicode::{display_width, truncate_to_width};

use super::scroll_for;

const BAR_WIDTH: usize = 20;

/// Render the Home view: active stack header, then its tasks top-down
pub fn render_home_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_header(frame, app, chunks[0]);

    match app.active_stack() {
        Some(stack) if !stack.tasks.is_empty() => render_tasks(frame, app, chunks[1]),
        _ => render_stack_empty(frame, app, chunks[1]),
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let (done, total) = app.data.parent_task.progress();

    let name_span = match app.active_stack() {
        Some(stack) => Span::styled(
            stack.name.clone(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("IDLE", Style::default().fg(app.theme.dim).bg(bg)),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Current Stack: ", Style::default().fg(app.theme.dim).bg(bg)),
            name_span,
        ]),
        Line::from(vec![
            Span::styled(
                format!(" {}/{} Stacks Done  ", done, total),
                Style::default().fg(app.theme.text).bg(bg),
            ),
            Span::styled(
                render_progress_bar(done, total, BAR_WIDTH),
                Style::default().fg(app.theme.green).bg(bg),
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        area,
    );
}

fn render_stack_empty(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let hint = if app.active_stack().is_some() {
        "Press 'i' to push a task"
    } else {
        "Press 'n' to create a sub-stack"
    };
    let top_pad = area.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        "STACK EMPTY",
        Style::default()
            .fg(app.theme.dim)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(bg)),
        area,
    );
}

fn render_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let Some(stack) = app.active_stack() else {
        return;
    };
    let bg = app.theme.background;
    let width = area.width as usize;
    let depths = stack.task_depths();
    let focused = stack.focused_index(app.focus_id());

    // Top of stack first
    let order: Vec<usize> = (0..stack.tasks.len()).rev().collect();
    let cursor_row = focused
        .and_then(|f| order.iter().position(|&i| i == f))
        .unwrap_or(0);
    let height = area.height as usize;
    let scroll = scroll_for(cursor_row, height);

    let mut lines: Vec<Line> = Vec::new();
    for &idx in order.iter().skip(scroll).take(height) {
        let task = &stack.tasks[idx];
        let is_focused = focused == Some(idx);
        let is_top = idx + 1 == stack.tasks.len();
        let row_bg = if is_focused { app.theme.selection_bg } else { bg };

        let indent = "  ".repeat(depths[idx]);
        let marker = if is_focused { "\u{25B8} " } else { "  " };
        let mut spans = vec![
            Span::styled(
                format!(" {}", indent),
                Style::default().bg(row_bg),
            ),
            Span::styled(
                marker,
                Style::default().fg(app.theme.highlight).bg(row_bg),
            ),
        ];

        let badge = if is_focused && task.parent_id.is_some() {
            Some(" SUBTASK")
        } else {
            None
        };
        let used = 1 + display_width(&indent) + 2 + badge.map_or(0, display_width);
        let name_style = if is_top {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else if is_focused {
            Style::default().fg(app.theme.text_bright).bg(row_bg)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };
        spans.push(Span::styled(
            truncate_to_width(&task.name, width.saturating_sub(used)),
            name_style,
        ));
        if let Some(badge) = badge {
            spans.push(Span::styled(
                badge,
                Style::default()
                    .fg(app.theme.purple)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let mut line = Line::from(spans);
        if is_focused {
            line = line.style(Style::default().bg(row_bg));
        }
        lines.push(line);
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn home(app: &App) -> String {
        render_to_string(TERM_W, 12, |frame, area| render_home_view(frame, app, area))
    }

    #[test]
    fn idle_without_stacks() {
        let out = home(&empty_app());
        assert!(out.contains("Current Stack: IDLE"));
        assert!(out.contains("0/0 Stacks Done"));
        assert!(out.contains("STACK EMPTY"));
        assert!(out.contains("Press 'n' to create a sub-stack"));
    }

    #[test]
    fn tasks_listed_top_first_with_depth() {
        let app = sample_app();
        let out = home(&app);
        assert!(out.contains("Current Stack: backend"));
        assert!(out.contains("0/2 Stacks Done"));

        let lines: Vec<&str> = out.lines().collect();
        let row = |name: &str| lines.iter().position(|l| l.contains(name)).unwrap();
        assert!(row("add route") < row("write handler"));
        assert!(row("write handler") < row("deploy"));

        // focused top task is a subtask, indented one level below its parent
        let top = lines[row("add route")];
        assert!(top.contains("\u{25B8} add route SUBTASK"));
        assert!(top.starts_with("   "));
        assert!(lines[row("deploy")].starts_with("   deploy"));
    }

    #[test]
    fn badge_follows_focus() {
        let mut app = sample_app();
        let deploy = app.active_stack().unwrap().tasks[0].id.clone();
        app.focus = Some(deploy);
        let out = home(&app);
        assert!(out.contains("\u{25B8} deploy"));
        assert!(!out.contains("SUBTASK"));
    }

    #[test]
    fn empty_active_stack_hints_push() {
        let mut app = empty_app();
        crate::ops::stack_ops::add_sub_stack(&mut app.data, "work").unwrap();
        let out = home(&app);
        assert!(out.contains("Current Stack: work"));
        assert!(out.contains("Press 'i' to push a task"));
    }
}
