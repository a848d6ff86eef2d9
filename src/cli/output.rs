use serde::Serialize;

use crate::model::{AppData, LogEntry, StashItem, SubStack, SubStackStatus};
use crate::util::progress::render_progress_bar;
use crate::util::time::{format_datetime, format_time};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub depth: usize,
}

#[derive(Serialize)]
pub struct StackJson {
    pub id: String,
    pub name: String,
    pub status: SubStackStatus,
    pub priority: u32,
    /// Top task first
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct StatusJson {
    pub project: String,
    pub completed_stacks: usize,
    pub total_stacks: usize,
    pub active: Option<StackJson>,
}

#[derive(Serialize)]
pub struct TreeJson {
    pub project: String,
    pub stacks: Vec<StackJson>,
}

#[derive(Serialize)]
pub struct StashItemJson {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub target: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_stack_id: Option<String>,
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn stack_to_json(stack: &SubStack) -> StackJson {
    let depths = stack.task_depths();
    StackJson {
        id: stack.id.clone(),
        name: stack.name.clone(),
        status: stack.status,
        priority: stack.priority,
        tasks: stack
            .tasks
            .iter()
            .zip(depths)
            .rev()
            .map(|(t, depth)| TaskJson {
                id: t.id.clone(),
                name: t.name.clone(),
                parent_id: t.parent_id.clone(),
                depth,
            })
            .collect(),
    }
}

pub fn status_to_json(data: &AppData) -> StatusJson {
    let (completed_stacks, total_stacks) = data.parent_task.progress();
    StatusJson {
        project: data.parent_task.name.clone(),
        completed_stacks,
        total_stacks,
        active: data.parent_task.active().map(stack_to_json),
    }
}

pub fn tree_to_json(data: &AppData) -> TreeJson {
    TreeJson {
        project: data.parent_task.name.clone(),
        stacks: data
            .parent_task
            .sub_stacks
            .iter()
            .filter(|s| s.status != SubStackStatus::Archived)
            .map(stack_to_json)
            .collect(),
    }
}

pub fn stash_to_json(stash: &[StashItem]) -> Vec<StashItemJson> {
    stash
        .iter()
        .enumerate()
        .map(|(i, item)| StashItemJson {
            index: i + 1,
            id: item.id.clone(),
            name: item.name.clone(),
            target: item.target_label(),
            target_stack_id: item.target_sub_stack_id.clone(),
            timestamp: item.timestamp,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Tasks of one stack, top first, with 1-based positions and depth indentation
fn format_tasks(stack: &SubStack, out: &mut Vec<String>) {
    let depths = stack.task_depths();
    let len = stack.tasks.len();
    for (pos, idx) in (0..len).rev().enumerate() {
        let task = &stack.tasks[idx];
        let marker = if pos == 0 { ">" } else { " " };
        out.push(format!(
            "{} {:>2}  {}{}  {}",
            marker,
            pos + 1,
            "  ".repeat(depths[idx]),
            task.name,
            short_id(&task.id)
        ));
    }
}

pub fn format_status(data: &AppData) -> String {
    let (done, total) = data.parent_task.progress();
    let mut lines = vec![format!(
        "{}  {}/{} stacks done  {}",
        data.parent_task.name,
        done,
        total,
        render_progress_bar(done, total, 10)
    )];
    match data.parent_task.active() {
        None if data.parent_task.sub_stacks.is_empty() => {
            lines.push("no sub-stacks yet (stk new <name>)".to_string());
        }
        None => lines.push("no active stack (stk activate <stack>)".to_string()),
        Some(stack) => {
            lines.push(format!("stack: {}", stack.name));
            if stack.tasks.is_empty() {
                lines.push("  (empty)".to_string());
            } else {
                format_tasks(stack, &mut lines);
            }
        }
    }
    lines.join("\n")
}

pub fn format_tree(data: &AppData) -> String {
    let mut lines = vec![data.parent_task.name.clone()];
    let stacks = data
        .parent_task
        .sub_stacks
        .iter()
        .enumerate()
        .filter(|(_, s)| s.status != SubStackStatus::Archived);
    for (i, stack) in stacks {
        let current = if stack.status == SubStackStatus::Active {
            " *"
        } else {
            ""
        };
        lines.push(format!(
            "[{}] {} {} ({} tasks){}  {}",
            i + 1,
            stack.name,
            stack.status.label(),
            stack.tasks.len(),
            current,
            short_id(&stack.id)
        ));
        let depths = stack.task_depths();
        for idx in (0..stack.tasks.len()).rev() {
            let branch = if idx == 0 { "\u{2514}\u{2500}\u{2500}" } else { "\u{251C}\u{2500}\u{2500}" };
            lines.push(format!(
                "    {} {}{}",
                branch,
                "  ".repeat(depths[idx]),
                stack.tasks[idx].name
            ));
        }
    }
    let archived = data
        .parent_task
        .sub_stacks
        .iter()
        .filter(|s| s.status == SubStackStatus::Archived)
        .count();
    if archived > 0 {
        lines.push(format!("({} archived)", archived));
    }
    lines.join("\n")
}

pub fn format_stash(stash: &[StashItem]) -> String {
    if stash.is_empty() {
        return "stash is empty".to_string();
    }
    stash
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{:>2}  {}  [{}]  {}  {}",
                i + 1,
                item.name,
                item.target_label(),
                format_datetime(item.timestamp),
                short_id(&item.id)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] [{}] {}",
        format_time(entry.timestamp),
        entry.kind,
        entry.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::stack_ops::{add_sub_stack, archive};
    use crate::ops::task_ops::{breakdown_task, push_task};
    use pretty_assertions::assert_eq;

    fn sample() -> AppData {
        let mut data = AppData::default();
        data.parent_task.name = "Launch".into();
        add_sub_stack(&mut data, "backend").unwrap();
        add_sub_stack(&mut data, "docs").unwrap();
        push_task(&mut data, "deploy", None).unwrap();
        breakdown_task(&mut data, "tag release", None).unwrap();
        data
    }

    #[test]
    fn stack_json_lists_top_first() {
        let data = sample();
        let json = status_to_json(&data);
        let active = json.active.unwrap();
        let names: Vec<&str> = active.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["tag release", "deploy"]);
        assert_eq!(active.tasks[0].depth, 1);
        assert_eq!(json.total_stacks, 2);
    }

    #[test]
    fn status_text() {
        let data = sample();
        let text = format_status(&data);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Launch  0/2 stacks done"));
        assert_eq!(lines[1], "stack: backend");
        assert!(lines[2].starts_with(">  1    tag release"));
        assert!(lines[3].starts_with("   2  deploy"));

        assert!(format_status(&AppData::default()).contains("no sub-stacks yet"));
    }

    #[test]
    fn tree_text_hides_archived() {
        let mut data = sample();
        let docs = data.parent_task.sub_stacks[1].id.clone();
        archive(&mut data, &docs).unwrap();
        let text = format_tree(&data);
        assert!(text.contains("[1] backend ACTIVE (2 tasks) *"));
        assert!(text.contains("\u{251C}\u{2500}\u{2500}   tag release"));
        assert!(text.contains("\u{2514}\u{2500}\u{2500} deploy"));
        assert!(!text.contains("docs"));
        assert!(text.ends_with("(1 archived)"));
    }
}
