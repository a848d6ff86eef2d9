use crate::model::{AppData, LogKind, SubStack, SubStackStatus, Task};

use super::{OpError, clean_name, match_id};

/// What happened when a task was completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteOutcome {
    pub task_name: String,
    /// The stack ran empty and is now completed
    pub stack_completed: bool,
    /// Name of the stack activated in its place
    pub activated: Option<String>,
}

/// Index of the active stack, or the reason there is none
fn active_idx(data: &AppData) -> Result<usize, OpError> {
    match data.parent_task.active_index() {
        Some(idx) => Ok(idx),
        None if data.parent_task.sub_stacks.is_empty() => Err(OpError::NoSubStacks),
        None => Err(OpError::NoActiveStack),
    }
}

/// Interrupt: insert directly above the focused task (the top by default).
/// Returns the new task's ID.
pub fn push_task(data: &mut AppData, name: &str, focus: Option<&str>) -> Result<String, OpError> {
    let name = clean_name(name)?;
    let idx = active_idx(data)?;
    let stack = &mut data.parent_task.sub_stacks[idx];

    let task = Task::new(name.clone());
    let id = task.id.clone();
    let at = stack.focused_index(focus).map_or(0, |f| f + 1);
    stack.tasks.insert(at, task);

    let message = format!(
        "Interrupted: Pushed \"{}\" to top of \"{}\"",
        name, stack.name
    );
    data.log(LogKind::Add, message);
    Ok(id)
}

/// Queue next: insert directly below the focused task so it runs right after it.
/// The new task shares the focused task's parent. An empty stack behaves like push.
pub fn queue_task(data: &mut AppData, name: &str, focus: Option<&str>) -> Result<String, OpError> {
    let name = clean_name(name)?;
    let idx = active_idx(data)?;
    let stack = &mut data.parent_task.sub_stacks[idx];

    let (at, parent_id) = match stack.focused_index(focus) {
        Some(f) => (f, stack.tasks[f].parent_id.clone()),
        None => (0, None),
    };
    let task = Task::new(name.clone()).with_parent(parent_id);
    let id = task.id.clone();
    stack.tasks.insert(at, task);

    let message = format!(
        "Queued \"{}\" after current task in \"{}\"",
        name, stack.name
    );
    data.log(LogKind::Add, message);
    Ok(id)
}

/// Break the focused task down: the new child goes directly above it, so repeated
/// breakdowns run in the order they were entered.
pub fn breakdown_task(
    data: &mut AppData,
    name: &str,
    focus: Option<&str>,
) -> Result<String, OpError> {
    let name = clean_name(name)?;
    let idx = active_idx(data)?;
    let stack = &mut data.parent_task.sub_stacks[idx];
    let f = stack.focused_index(focus).ok_or(OpError::EmptyStack)?;

    let parent = &stack.tasks[f];
    let parent_name = parent.name.clone();
    let task = Task::new(name.clone()).with_parent(Some(parent.id.clone()));
    let id = task.id.clone();
    stack.tasks.insert(f + 1, task);

    data.log(
        LogKind::Add,
        format!("Broke down \"{}\": added \"{}\"", parent_name, name),
    );
    Ok(id)
}

/// Complete the focused task (the top by default). Emptying the stack completes it
/// and activates the next pending stack.
pub fn complete_task(data: &mut AppData, focus: Option<&str>) -> Result<CompleteOutcome, OpError> {
    let idx = active_idx(data)?;
    let stack = &mut data.parent_task.sub_stacks[idx];
    let f = stack.focused_index(focus).ok_or(OpError::EmptyStack)?;

    if stack.has_children(&stack.tasks[f].id) {
        return Err(OpError::OpenSubtasks(stack.tasks[f].name.clone()));
    }

    let mut task = stack.tasks.remove(f);
    task.complete();
    let stack_completed = stack.tasks.is_empty();
    let stack_name = stack.name.clone();
    if stack_completed {
        stack.status = SubStackStatus::Completed;
    }

    data.log(
        LogKind::StatusChange,
        format!("Completed task: {}", task.name),
    );

    let mut activated = None;
    if stack_completed {
        data.log(
            LogKind::StatusChange,
            format!("Stack completed: {}", stack_name),
        );
        if let Some(next) = data.parent_task.ensure_active() {
            let next_name = data.parent_task.sub_stacks[next].name.clone();
            data.log(
                LogKind::StatusChange,
                format!("Activated next stack: {}", next_name),
            );
            activated = Some(next_name);
        }
    }

    Ok(CompleteOutcome {
        task_name: task.name,
        stack_completed,
        activated,
    })
}

/// Find a task by exact ID, unique ID prefix, or 1-based position counted from the top.
/// Returns its index in `stack.tasks`.
pub fn resolve_task(stack: &SubStack, query: &str) -> Option<usize> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let len = stack.tasks.len();
    if let Ok(n) = query.parse::<usize>()
        && n >= 1
        && n <= len
    {
        return Some(len - n);
    }
    match_id(stack.tasks.iter().map(|t| t.id.as_str()), query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::stack_ops::add_sub_stack;
    use pretty_assertions::assert_eq;

    fn names(data: &AppData) -> Vec<String> {
        data.parent_task
            .active()
            .map(|s| s.tasks.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }

    fn data_with_stack() -> AppData {
        let mut data = AppData::default();
        add_sub_stack(&mut data, "work").unwrap();
        data
    }

    #[test]
    fn push_requires_a_stack() {
        let mut data = AppData::default();
        assert_eq!(push_task(&mut data, "x", None), Err(OpError::NoSubStacks));

        let id = add_sub_stack(&mut data, "only").unwrap();
        crate::ops::stack_ops::toggle_freeze(&mut data, &id).unwrap();
        assert_eq!(push_task(&mut data, "x", None), Err(OpError::NoActiveStack));
    }

    #[test]
    fn push_goes_on_top() {
        let mut data = data_with_stack();
        push_task(&mut data, "first", None).unwrap();
        push_task(&mut data, "second", None).unwrap();
        assert_eq!(names(&data), vec!["first", "second"]);
        assert_eq!(
            data.logs.last().unwrap().message,
            "Interrupted: Pushed \"second\" to top of \"work\""
        );
    }

    #[test]
    fn push_above_focused_task() {
        let mut data = data_with_stack();
        let bottom = push_task(&mut data, "bottom", None).unwrap();
        push_task(&mut data, "top", None).unwrap();
        push_task(&mut data, "urgent", Some(&bottom)).unwrap();
        assert_eq!(names(&data), vec!["bottom", "urgent", "top"]);
    }

    #[test]
    fn queue_slots_below_top() {
        let mut data = data_with_stack();
        queue_task(&mut data, "only", None).unwrap();
        assert_eq!(names(&data), vec!["only"]);

        push_task(&mut data, "current", None).unwrap();
        queue_task(&mut data, "next", None).unwrap();
        assert_eq!(names(&data), vec!["only", "next", "current"]);
        assert_eq!(
            data.logs.last().unwrap().message,
            "Queued \"next\" after current task in \"work\""
        );
    }

    #[test]
    fn queue_inherits_parent_of_focus() {
        let mut data = data_with_stack();
        push_task(&mut data, "parent", None).unwrap();
        let child = breakdown_task(&mut data, "child", None).unwrap();
        let sibling = queue_task(&mut data, "sibling", Some(&child)).unwrap();

        let stack = data.parent_task.active().unwrap();
        let parent_id = stack.tasks[0].id.clone();
        let sib = &stack.tasks[stack.task_index(&sibling).unwrap()];
        assert_eq!(sib.parent_id.as_deref(), Some(parent_id.as_str()));
        assert_eq!(names(&data), vec!["parent", "sibling", "child"]);
        assert_eq!(stack.task_depths(), vec![0, 1, 1]);
    }

    #[test]
    fn breakdown_preserves_entry_order() {
        let mut data = data_with_stack();
        let parent = push_task(&mut data, "ship release", None).unwrap();
        for step in ["build", "test", "tag"] {
            breakdown_task(&mut data, step, Some(&parent)).unwrap();
        }
        // Top of stack runs first
        assert_eq!(names(&data), vec!["ship release", "tag", "test", "build"]);
        let stack = data.parent_task.active().unwrap();
        assert!(
            stack.tasks[1..]
                .iter()
                .all(|t| t.parent_id.as_deref() == Some(parent.as_str()))
        );
    }

    #[test]
    fn breakdown_keeps_subtrees_contiguous() {
        let mut data = data_with_stack();
        let p = push_task(&mut data, "p", None).unwrap();
        let a = breakdown_task(&mut data, "a", Some(&p)).unwrap();
        breakdown_task(&mut data, "a1", Some(&a)).unwrap();
        breakdown_task(&mut data, "d", Some(&p)).unwrap();
        assert_eq!(names(&data), vec!["p", "d", "a", "a1"]);
        let stack = data.parent_task.active().unwrap();
        assert_eq!(stack.task_depths(), vec![0, 1, 1, 2]);
    }

    #[test]
    fn breakdown_needs_a_task() {
        let mut data = data_with_stack();
        assert_eq!(
            breakdown_task(&mut data, "x", None),
            Err(OpError::EmptyStack)
        );
    }

    #[test]
    fn complete_pops_top() {
        let mut data = data_with_stack();
        push_task(&mut data, "a", None).unwrap();
        push_task(&mut data, "b", None).unwrap();
        let outcome = complete_task(&mut data, None).unwrap();
        assert_eq!(outcome.task_name, "b");
        assert!(!outcome.stack_completed);
        assert_eq!(names(&data), vec!["a"]);
    }

    #[test]
    fn complete_blocks_on_open_subtasks() {
        let mut data = data_with_stack();
        let p = push_task(&mut data, "parent", None).unwrap();
        breakdown_task(&mut data, "child", None).unwrap();
        assert_eq!(
            complete_task(&mut data, Some(&p)),
            Err(OpError::OpenSubtasks("parent".into()))
        );
        complete_task(&mut data, None).unwrap();
        complete_task(&mut data, None).unwrap();
    }

    #[test]
    fn completing_last_task_completes_stack_and_activates_next() {
        let mut data = AppData::default();
        add_sub_stack(&mut data, "one").unwrap();
        add_sub_stack(&mut data, "two").unwrap();
        push_task(&mut data, "only", None).unwrap();

        let outcome = complete_task(&mut data, None).unwrap();
        assert!(outcome.stack_completed);
        assert_eq!(outcome.activated.as_deref(), Some("two"));
        assert_eq!(
            data.parent_task.sub_stacks[0].status,
            SubStackStatus::Completed
        );
        let messages: Vec<&str> = data.logs.iter().map(|l| l.message.as_str()).collect();
        assert!(messages.contains(&"Completed task: only"));
        assert!(messages.contains(&"Stack completed: one"));
        assert!(messages.contains(&"Activated next stack: two"));
        assert_eq!(data.parent_task.progress(), (1, 2));
    }

    #[test]
    fn complete_on_empty_stack_errors() {
        let mut data = data_with_stack();
        assert_eq!(complete_task(&mut data, None), Err(OpError::EmptyStack));
    }

    #[test]
    fn resolve_counts_from_top() {
        let mut data = data_with_stack();
        push_task(&mut data, "bottom", None).unwrap();
        push_task(&mut data, "top", None).unwrap();
        let stack = data.parent_task.active().unwrap();
        assert_eq!(resolve_task(stack, "1"), Some(1));
        assert_eq!(resolve_task(stack, "2"), Some(0));
        assert_eq!(resolve_task(stack, "3"), None);
        let id = stack.tasks[0].id.clone();
        assert_eq!(resolve_task(stack, &id[..10]), Some(0));
    }
}
