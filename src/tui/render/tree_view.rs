use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{SubStack, SubStackStatus};
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::{render_empty, scroll_for};

/// Rows above the stack list
const HEADER_ROWS: usize = 3;

/// Render the Tree view: every non-archived stack followed by its tasks
pub fn render_tree_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let stacks = app.tree_stacks();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" ROOT: ", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled(
                app.data.parent_task.name.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            " Project Structure Mapping",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
        Line::from(""),
    ];

    if stacks.is_empty() {
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(bg)),
            area,
        );
        let rest = Rect {
            y: area.y + HEADER_ROWS as u16,
            height: area.height.saturating_sub(HEADER_ROWS as u16),
            ..area
        };
        render_empty(
            frame,
            app,
            rest,
            "No sub-stacks defined. Press 'n' to start planning.",
        );
        return;
    }

    // Flatten stacks and their tasks into rows, remembering the cursor's row
    let mut rows: Vec<Line> = Vec::new();
    let mut cursor_row = 0;
    for (pos, &idx) in stacks.iter().enumerate() {
        let stack = &app.data.parent_task.sub_stacks[idx];
        if pos == app.tree_cursor {
            cursor_row = rows.len();
        }
        rows.push(stack_line(app, stack, pos, pos == app.tree_cursor, area.width as usize));
        rows.extend(task_lines(app, stack, area.width as usize));
    }

    let height = (area.height as usize).saturating_sub(HEADER_ROWS);
    let scroll = scroll_for(cursor_row, height);
    lines.extend(rows.into_iter().skip(scroll).take(height));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        area,
    );
}

fn stack_line<'a>(app: &App, stack: &'a SubStack, pos: usize, selected: bool, width: usize) -> Line<'a> {
    let row_bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let is_current = stack.status == SubStackStatus::Active;
    let status_color = app.theme.status_color(stack.status);

    let count = if stack.status == SubStackStatus::Completed {
        "DONE".to_string()
    } else {
        match stack.tasks.len() {
            1 => "1 task".to_string(),
            n => format!("{} tasks", n),
        }
    };

    let marker = if selected { "\u{25B6}" } else { " " };
    let name_width = width.saturating_sub(40);
    let mut spans = vec![
        Span::styled(
            format!("{}[{}] ", marker, pos + 1),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ),
        Span::styled(
            truncate_to_width(&stack.name, name_width),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", Style::default().bg(row_bg)),
        Span::styled(
            stack.status.label(),
            Style::default().fg(status_color).bg(row_bg),
        ),
        Span::styled(
            format!(" {}", count),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ),
    ];
    if is_current {
        spans.push(Span::styled(
            " CURRENT",
            Style::default()
                .fg(app.theme.highlight)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans).style(Style::default().bg(row_bg))
}

/// Tasks of one stack, top first, drawn as tree branches
fn task_lines<'a>(app: &App, stack: &'a SubStack, width: usize) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    if stack.tasks.is_empty() {
        return vec![Line::from(Span::styled("    \u{2514}\u{2500}\u{2500} Empty stack", dim))];
    }

    let live = !matches!(
        stack.status,
        SubStackStatus::Frozen | SubStackStatus::Completed
    );
    let depths = stack.task_depths();
    let last = stack.tasks.len() - 1;

    (0..stack.tasks.len())
        .rev()
        .map(|idx| {
            let task = &stack.tasks[idx];
            let is_top = idx == last;
            let branch = if idx == 0 {
                "\u{2514}\u{2500}\u{2500} "
            } else {
                "\u{251C}\u{2500}\u{2500} "
            };
            let indent = "  ".repeat(depths[idx]);
            let mut spans = vec![
                Span::styled(format!("    {}", branch), dim),
                Span::styled(indent, dim),
            ];
            let name = truncate_to_width(&task.name, width.saturating_sub(24));
            if is_top && live {
                spans.push(Span::styled(
                    name,
                    Style::default()
                        .fg(app.theme.highlight)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(
                    " ACTIVE",
                    Style::default().fg(app.theme.green).bg(bg),
                ));
            } else {
                spans.push(Span::styled(
                    name,
                    Style::default().fg(app.theme.text).bg(bg),
                ));
            }
            Line::from(spans)
        })
        .collect()
}
